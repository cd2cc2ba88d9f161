// src/error.rs
//! Application error types and the result contract of every network call.
//!
//! Two vocabularies live here. `AppError` covers faults raised while the
//! client is being put together or while one request is being prepared:
//! missing credentials, an unusable signing script, a client that will not
//! build. `Failure` is what a network operation hands back to its caller.
//! It is an ordinary value rather than a raised fault: every call below the
//! process boundary returns `Outcome<T>`, and an aggregation that sees one
//! `Failure` returns it unchanged.

use std::fmt;
use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Signing capability unavailable: {0}")]
    SignerUnavailable(String),

    #[error("Signing capability failed: {0}")]
    SignerFailed(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output delivery failed: {}", failures.join(", "))]
    DeliveryFailed { failures: Vec<String> },

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Whether the error is a configuration problem that must stop the process.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            AppError::MissingConfiguration(_) | AppError::ValidationError(_)
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Where a failed call broke down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The platform answered and its envelope reported `success = false`.
    Business,
    /// Timeout, connection error, or a body that was not the expected JSON.
    Transport,
    /// The signing capability could not produce a signature.
    Infrastructure,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Business => write!(f, "business"),
            Self::Transport => write!(f, "transport"),
            Self::Infrastructure => write!(f, "infrastructure"),
        }
    }
}

/// The failure half of the result contract.
///
/// A failure never carries a payload, and its message is never empty.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Failure {
    pub kind: FailureKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            format!("{} failure without a message", kind)
        } else {
            message
        };
        Self { kind, message }
    }

    pub fn business(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Business, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Transport, message)
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Infrastructure, message)
    }
}

impl From<AppError> for Failure {
    fn from(err: AppError) -> Self {
        let kind = match &err {
            AppError::SignerUnavailable(_) | AppError::SignerFailed(_) => {
                FailureKind::Infrastructure
            }
            AppError::NetworkFailure(_)
            | AppError::MalformedResponse(_)
            | AppError::InvalidRequest(_)
            | AppError::Io(_) => FailureKind::Transport,
            AppError::MissingConfiguration(_)
            | AppError::DeliveryFailed { .. }
            | AppError::ValidationError(_) => FailureKind::Infrastructure,
        };
        Failure::new(kind, err.to_string())
    }
}

/// The success half of the result contract: the platform's message plus the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub message: String,
    pub payload: T,
}

impl<T> Reply<T> {
    pub fn new(message: impl Into<String>, payload: T) -> Self {
        Self {
            message: message.into(),
            payload,
        }
    }

    /// Maps the payload while keeping the message.
    pub fn map<U, F>(self, f: F) -> Reply<U>
    where
        F: FnOnce(T) -> U,
    {
        Reply {
            message: self.message,
            payload: f(self.payload),
        }
    }
}

/// Result of every network operation: `Ok` is the success triple, `Err` the failure triple.
pub type Outcome<T> = std::result::Result<Reply<T>, Failure>;
