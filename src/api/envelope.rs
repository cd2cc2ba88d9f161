// src/api/envelope.rs
//! Reading the platform's response envelope.
//!
//! Every response is `{"success": bool, "msg": string, "data": {...}}`.
//! Business failures arrive inside HTTP 200 bodies, so success is read
//! from the envelope, never from the status code.

use crate::error::{Failure, Outcome, Reply};
use serde_json::Value;

static NULL: Value = Value::Null;

/// Turns a decoded envelope into the result contract.
pub fn into_outcome(envelope: Value) -> Outcome<Value> {
    let success = envelope
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let message = envelope
        .get("msg")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    if success {
        Ok(Reply::new(message, envelope))
    } else {
        let message = if message.is_empty() {
            match envelope.get("code") {
                Some(code) => format!("request rejected with code {}", code),
                None => "request rejected without a message".to_string(),
            }
        } else {
            message
        };
        log::warn!("Platform reported failure: {}", message);
        Err(Failure::business(message))
    }
}

/// The envelope's `data` object, or `null` when absent.
pub fn data(envelope: &Value) -> &Value {
    envelope.get("data").unwrap_or(&NULL)
}

/// The results batch stored under `key`; missing or non-array yields empty.
pub fn batch(data: &Value, key: &str) -> Vec<Value> {
    data.get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// The "more available" flag; absent means no.
pub fn has_more(data: &Value) -> bool {
    data.get("has_more").and_then(Value::as_bool).unwrap_or(false)
}

/// A scalar field rendered as text: strings verbatim, numbers and booleans
/// in their JSON form, anything else as empty.
pub fn text_field(data: &Value, key: &str) -> String {
    match data.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
