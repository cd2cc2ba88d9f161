// src/output/render.rs
//! Rendering an outcome as the `{"success","msg","data"}` document.

use crate::error::Outcome;
use serde::Serialize;
use serde_json::Value;

/// The printed form of a result triple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultDocument {
    pub success: bool,
    pub msg: String,
    pub data: Value,
}

impl ResultDocument {
    /// A failure carries no data.
    pub fn from_outcome<T: Serialize>(outcome: &Outcome<T>) -> Self {
        match outcome {
            Ok(reply) => match serde_json::to_value(&reply.payload) {
                Ok(data) => Self {
                    success: true,
                    msg: reply.message.clone(),
                    data,
                },
                Err(e) => Self {
                    success: false,
                    msg: format!("cannot serialize result: {}", e),
                    data: Value::Null,
                },
            },
            Err(failure) => Self {
                success: false,
                msg: failure.message.clone(),
                data: Value::Null,
            },
        }
    }

    /// Pretty-printed with two-space indentation and unescaped Unicode.
    pub fn to_pretty_string(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| {
            r#"{"success": false, "msg": "unrenderable result", "data": null}"#.to_string()
        })
    }

    /// Process exit code for this result.
    pub fn exit_code(&self) -> i32 {
        if self.success {
            0
        } else {
            1
        }
    }
}
