// src/api/request.rs
//! Request descriptors: what to call, described once and used for both
//! signing and sending.
//!
//! A GET's query string is encoded exactly once, into the `Url` that is
//! dispatched; the signed path is read back out of that same `Url`. A POST
//! body is serialized exactly once, and those bytes are both signed and sent.

use crate::error::AppError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;
use std::fmt;
use url::{Position, Url};

/// Bytes escaped in query keys and values: everything except
/// alphanumerics, `-._~` and `/`, matching what the web client sends.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// HTTP methods the platform API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One API call: path, method, query parameters or JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
        }
    }

    /// Appends a query parameter. Empty values are dropped when the URL is built.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Looks up a query parameter by name.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The body bytes to sign and send: compact JSON for POST, empty otherwise.
    pub fn serialized_body(&self) -> Result<String, AppError> {
        match (&self.method, &self.body) {
            (Method::Post, Some(body)) => serialize_body(body),
            _ => Ok(String::new()),
        }
    }

    /// Absolute URL of this request against `base`, query encoded for GET.
    pub fn resolve_url(&self, base: &Url) -> Result<Url, AppError> {
        let mut url = base
            .join(&self.path)
            .map_err(|e| AppError::InvalidRequest(format!("bad path '{}': {}", self.path, e)))?;

        if self.method == Method::Get {
            let query = encode_query(&self.query);
            if !query.is_empty() {
                url.set_query(Some(&query));
            }
        }

        Ok(url)
    }
}

/// `key=value` pairs joined by `&`, percent-encoded, empty values dropped.
pub fn encode_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_VALUE),
                utf8_percent_encode(value, QUERY_VALUE)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Serializes a body the way the web client does: compact, key order kept,
/// non-ASCII left as UTF-8.
pub fn serialize_body(body: &Value) -> Result<String, AppError> {
    Ok(serde_json::to_string(body)?)
}

/// The path-and-query portion of `url`, which is what gets signed.
pub fn signed_path(url: &Url) -> &str {
    &url[Position::BeforePath..]
}
