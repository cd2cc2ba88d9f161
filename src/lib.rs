// src/lib.rs
//! xhsfetch library: a signed client for the Xiaohongshu web API.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `Failure`, `Reply`, `Outcome`
//! - **Configuration**: `CommandLineInput`, `ClientConfig`, credential resolution
//! - **Session and links**: `SessionCredentials`, `ShareLink`
//! - **Signing**: `Signer`, `NodeSigner`, `StaticSigner`
//! - **API client**: `XhsHttpClient`, `Transport`, `XhsApi`, pagination rules
//! - **Model and output**: `NoteSummary`, `ResultDocument`, output plans

pub mod api;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod export;
pub mod media;
pub mod model;
pub mod output;
pub mod signing;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, Failure, FailureKind, Outcome, Reply};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{ClientConfig, Command, CommandLineInput, SignerConfig};
pub use crate::credentials::CredentialSources;

// --- Session and links ---
pub use crate::types::{parse_cookie_string, parse_resource_url, SessionCredentials, ShareLink};

// --- Signing ---
pub use crate::signing::{NodeSigner, SignatureTriple, Signer, SigningInput, StaticSigner};

// --- API Client ---
pub use crate::api::{
    ApiRequest, CursorRule, FeedCursor, FeedRule, Method, NoteSearch, PageNumberRule, PageRule,
    Paginator, SentinelPageRule, Transport, TransportOptions, XhsApi, XhsHttpClient,
};

// --- Model and Output ---
pub use crate::export::{export_notes, ExportReport, ExportRequest};
pub use crate::model::NoteSummary;
pub use crate::output::ResultDocument;
