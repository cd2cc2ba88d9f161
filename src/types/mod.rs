use thiserror::Error;

mod cookies;
mod share_url;

pub use cookies::*;
pub use share_url::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Cookie string is empty")]
    EmptyCookieString,

    #[error("Cookie string has no '{field}' field; it is required for request signing")]
    MissingSeed { field: &'static str },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),
}
