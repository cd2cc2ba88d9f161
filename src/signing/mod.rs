// src/signing/mod.rs
//! Request signatures: the capability that makes a call look browser-made.
//!
//! The platform checks three headers (`x-s`, `x-t`, `x-s-common`) derived
//! from the request path, its body, the HTTP method and the session seed.
//! The transform itself is maintained outside this crate and changes with
//! the web client, so the rest of the code only sees the `Signer` trait:
//! a pure function of `(seed, path, method, body)` that is called afresh
//! for every request, plus a trace-id generator.

mod node;

pub use node::NodeSigner;

use crate::api::Method;
use crate::constants::{TRACE_ID_ALPHABET, TRACE_ID_LEN};
use crate::error::AppError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// The three signature header values for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureTriple {
    pub x_s: String,
    pub x_t: String,
    pub x_s_common: String,
}

/// What a signature is computed over.
///
/// `body` is empty for GET and the exact serialized JSON for POST; `path`
/// already carries the encoded query string for GET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningInput<'a> {
    pub seed: &'a str,
    pub path: &'a str,
    pub body: &'a str,
    pub method: Method,
}

/// The ability to sign a request.
///
/// Implementations must not cache: `x-t` is a timestamp and the platform
/// rejects stale signatures. Any error is fatal for the call being signed.
pub trait Signer: Send + Sync {
    fn sign(&self, input: &SigningInput<'_>) -> Result<SignatureTriple, AppError>;

    /// Produces the `x-xray-traceid` header value.
    fn trace_id(&self) -> Result<String, AppError>;
}

/// Random string over the lowercase hex alphabet.
pub fn random_hex(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| TRACE_ID_ALPHABET[rng.random_range(0..TRACE_ID_ALPHABET.len())] as char)
        .collect()
}

/// Value of the `x-b3-traceid` header.
pub fn b3_trace_id() -> String {
    random_hex(TRACE_ID_LEN)
}

/// A signing call captured by `StaticSigner`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSigning {
    pub seed: String,
    pub path: String,
    pub body: String,
    pub method: Method,
}

/// Signer returning fixed values and recording what it was asked to sign.
///
/// Stands in for the real capability wherever determinism matters.
#[derive(Debug)]
pub struct StaticSigner {
    signature: SignatureTriple,
    trace_id: String,
    calls: Mutex<Vec<RecordedSigning>>,
}

impl StaticSigner {
    pub fn new(signature: SignatureTriple, trace_id: impl Into<String>) -> Self {
        Self {
            signature,
            trace_id: trace_id.into(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Everything signed so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedSigning> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl Default for StaticSigner {
    fn default() -> Self {
        Self::new(
            SignatureTriple {
                x_s: "XYW_static".to_string(),
                x_t: "1700000000000".to_string(),
                x_s_common: "common_static".to_string(),
            },
            "xray_static",
        )
    }
}

impl Signer for StaticSigner {
    fn sign(&self, input: &SigningInput<'_>) -> Result<SignatureTriple, AppError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedSigning {
                seed: input.seed.to_string(),
                path: input.path.to_string(),
                body: input.body.to_string(),
                method: input.method,
            });
        }
        Ok(self.signature.clone())
    }

    fn trace_id(&self) -> Result<String, AppError> {
        Ok(self.trace_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_b3_trace_id_shape() {
        let id = b3_trace_id();
        assert_eq!(id.len(), 16);
        assert!(id.bytes().all(|b| TRACE_ID_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_trace_ids_differ_between_calls() {
        // 16^16 possibilities; a collision here means the generator is broken.
        assert_ne!(b3_trace_id(), b3_trace_id());
    }

    #[test]
    fn test_static_signer_records_calls() {
        let signer = StaticSigner::default();
        let input = SigningInput {
            seed: "seed",
            path: "/api/x?a=1",
            body: "",
            method: Method::Get,
        };
        let signature = signer.sign(&input).unwrap();
        assert_eq!(signature.x_s, "XYW_static");
        assert_eq!(signer.calls().len(), 1);
        assert_eq!(signer.calls()[0].path, "/api/x?a=1");
        assert_eq!(signer.trace_id().unwrap(), "xray_static");
    }
}
