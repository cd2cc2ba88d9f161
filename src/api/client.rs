// src/api/client.rs
//! HTTP transport for the platform API.
//!
//! This module wraps a blocking reqwest client. One `call` signs the
//! request, sends it, decodes the JSON envelope and folds every fault along
//! the way into a `Failure`, so callers only ever see an `Outcome`.

use super::envelope::into_outcome;
use super::headers::{assemble, SignedRequest};
use super::request::{ApiRequest, Method};
use crate::constants::{API_BASE_URL, ERROR_BODY_PREVIEW_LENGTH, REQUEST_TIMEOUT_SECS};
use crate::error::{AppError, Failure, Outcome};
use crate::signing::Signer;
use crate::types::SessionCredentials;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// The ability to execute one API call.
///
/// Implementations never raise: a timeout, a connection error, a signing
/// failure and a body that is not JSON all come back as `Err(Failure)`.
pub trait Transport {
    fn call(&self, request: &ApiRequest) -> Outcome<Value>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn call(&self, request: &ApiRequest) -> Outcome<Value> {
        (**self).call(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn call(&self, request: &ApiRequest) -> Outcome<Value> {
        (**self).call(request)
    }
}

/// Construction options for `XhsHttpClient`.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub base_url: String,
    pub timeout: Duration,
    /// When false, proxy variables in the environment are ignored.
    pub use_env_proxy: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            use_env_proxy: true,
        }
    }
}

/// Signed HTTP client for the platform API.
pub struct XhsHttpClient {
    client: Client,
    base_url: Url,
    credentials: SessionCredentials,
    signer: Box<dyn Signer>,
}

impl XhsHttpClient {
    /// Creates a client bound to one session and one signer.
    pub fn new(
        credentials: SessionCredentials,
        signer: Box<dyn Signer>,
        options: TransportOptions,
    ) -> Result<Self, AppError> {
        let base_url = Url::parse(&options.base_url).map_err(|e| {
            AppError::MissingConfiguration(format!("invalid API base URL '{}': {}", options.base_url, e))
        })?;

        let mut builder = Client::builder().timeout(options.timeout);
        if !options.use_env_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            base_url,
            credentials,
            signer,
        })
    }

    pub fn credentials(&self) -> &SessionCredentials {
        &self.credentials
    }

    /// Signs and prepares `request` without sending it.
    pub fn prepare(&self, request: &ApiRequest) -> Result<SignedRequest, AppError> {
        assemble(
            self.signer.as_ref(),
            &self.credentials,
            &self.base_url,
            request,
        )
    }

    fn send(&self, request: &ApiRequest) -> Result<Value, AppError> {
        let signed = self.prepare(request)?;
        log::debug!("{} {}", signed.method, signed.signed_path());

        let builder = match signed.method {
            Method::Get => self.client.get(signed.url.clone()),
            Method::Post => self.client.post(signed.url.clone()).body(signed.body),
        };
        let response = builder.headers(signed.headers).send()?;

        let status = response.status();
        let text = response.text()?;
        log::debug!("{} -> {} ({} bytes)", request.path, status, text.len());

        decode_envelope(&text)
    }
}

impl Transport for XhsHttpClient {
    fn call(&self, request: &ApiRequest) -> Outcome<Value> {
        match self.send(request) {
            Ok(envelope) => into_outcome(envelope),
            Err(err) => {
                log::warn!("{} {} failed: {}", request.method, request.path, err);
                Err(Failure::from(err))
            }
        }
    }
}

/// Decodes a response body, keeping a short preview for diagnostics.
pub fn decode_envelope(text: &str) -> Result<Value, AppError> {
    serde_json::from_str(text).map_err(|e| {
        AppError::MalformedResponse(format!(
            "{} (body starts with: {})",
            e,
            preview(text, ERROR_BODY_PREVIEW_LENGTH)
        ))
    })
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::signing::{SignatureTriple, SigningInput};

    struct BrokenSigner;

    impl Signer for BrokenSigner {
        fn sign(&self, _input: &SigningInput<'_>) -> Result<SignatureTriple, AppError> {
            Err(AppError::SignerFailed("script crashed".to_string()))
        }

        fn trace_id(&self) -> Result<String, AppError> {
            Ok("t".to_string())
        }
    }

    #[test]
    fn test_decode_rejects_html_with_preview() {
        let err = decode_envelope("<html>blocked</html>").unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse(_)));
        assert!(err.to_string().contains("<html>blocked"));
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("小红书笔记", 3), "小红书...");
        assert_eq!(preview("abc", 5), "abc");
    }

    #[test]
    fn test_signer_failure_is_infrastructure_and_sends_nothing() {
        let credentials = SessionCredentials::parse("a1=seed").unwrap();
        let options = TransportOptions {
            // Nothing listens here; the call must fail before dispatch.
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
            use_env_proxy: false,
        };
        let client = XhsHttpClient::new(credentials, Box::new(BrokenSigner), options).unwrap();

        let failure = client
            .call(&ApiRequest::get("/api/sns/web/v1/user/selfinfo"))
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::Infrastructure);
        assert!(failure.message.contains("script crashed"));
    }

    #[test]
    fn test_default_options() {
        let options = TransportOptions::default();
        assert_eq!(options.base_url, "https://edith.xiaohongshu.com");
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert!(options.use_env_proxy);
    }
}
