// src/signing/node.rs
//! Signer backed by the web client's own JavaScript, run under `node`.
//!
//! Each call spawns a fresh `node` process, feeds it the script source
//! followed by one function call on stdin, and reads the JSON result back
//! from stdout. The signing script must expose
//! `get_request_headers_params(path, data, a1, method)` returning
//! `{xs, xt, xs_common}`; the trace script must expose `traceId()`.

use super::{SignatureTriple, Signer, SigningInput};
use crate::error::AppError;
use serde_json::Value;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Marks the start of the result on stdout, past anything the script logs.
const RESULT_MARKER: &str = "__XHSFETCH_RESULT__";

/// Signer that delegates to the signing scripts through a `node` runtime.
#[derive(Debug, Clone)]
pub struct NodeSigner {
    node: PathBuf,
    sign_script: PathBuf,
    trace_script: PathBuf,
}

impl NodeSigner {
    /// Creates the signer, checking that both scripts exist.
    pub fn new(
        node: impl Into<PathBuf>,
        sign_script: impl Into<PathBuf>,
        trace_script: impl Into<PathBuf>,
    ) -> Result<Self, AppError> {
        let signer = Self {
            node: node.into(),
            sign_script: sign_script.into(),
            trace_script: trace_script.into(),
        };

        for script in [&signer.sign_script, &signer.trace_script] {
            if !script.is_file() {
                return Err(AppError::SignerUnavailable(format!(
                    "signing script not found at {}",
                    script.display()
                )));
            }
        }

        Ok(signer)
    }

    /// Runs `script` followed by `call` and decodes the JSON the call returns.
    fn evaluate(&self, script: &Path, call: &str) -> Result<Value, AppError> {
        let source = std::fs::read_to_string(script).map_err(|e| {
            AppError::SignerUnavailable(format!("cannot read {}: {}", script.display(), e))
        })?;
        let script_dir = script
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let program = compose_program(script_dir, &source, call)?;

        log::debug!("Evaluating {} via {}", call_name(call), self.node.display());

        let mut child = Command::new(&self.node)
            .arg("-")
            .current_dir(script_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => AppError::SignerUnavailable(format!(
                    "node runtime not found at '{}'",
                    self.node.display()
                )),
                _ => AppError::SignerUnavailable(format!("cannot start node: {}", e)),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(program.as_bytes())
                .map_err(|e| AppError::SignerFailed(format!("cannot feed script: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| AppError::SignerFailed(format!("node did not finish: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::SignerFailed(format!(
                "node exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_marked_output(&stdout)
    }
}

impl Signer for NodeSigner {
    fn sign(&self, input: &SigningInput<'_>) -> Result<SignatureTriple, AppError> {
        let data = if input.body.is_empty() {
            "\"\"".to_string()
        } else {
            // Parsed from the exact bytes that go on the wire.
            format!("JSON.parse({})", serde_json::to_string(input.body)?)
        };
        let call = format!(
            "get_request_headers_params({}, {}, {}, {})",
            serde_json::to_string(input.path)?,
            data,
            serde_json::to_string(input.seed)?,
            serde_json::to_string(input.method.as_str())?,
        );

        let value = self.evaluate(&self.sign_script, &call)?;
        signature_from_value(&value)
    }

    fn trace_id(&self) -> Result<String, AppError> {
        let value = self.evaluate(&self.trace_script, "traceId()")?;
        match value {
            Value::String(id) if !id.is_empty() => Ok(id),
            other => Err(AppError::SignerFailed(format!(
                "traceId() returned {} instead of a string",
                other
            ))),
        }
    }
}

/// Builds the program fed to `node`: working-directory bootstrap, the
/// script source, then the call whose result is printed after the marker.
fn compose_program(script_dir: &Path, source: &str, call: &str) -> Result<String, AppError> {
    let dir = serde_json::to_string(&script_dir.to_string_lossy())?;
    Ok(format!(
        "process.chdir({dir});\nglobalThis.__XHS_SKILL_JS_DIR={dir};\n{source}\n;process.stdout.write(\"\\n{marker}\" + JSON.stringify({call}));\n",
        dir = dir,
        source = source,
        marker = RESULT_MARKER,
        call = call,
    ))
}

fn parse_marked_output(stdout: &str) -> Result<Value, AppError> {
    let payload = stdout
        .rsplit_once(RESULT_MARKER)
        .map(|(_, payload)| payload.trim())
        .ok_or_else(|| AppError::SignerFailed("script produced no result".to_string()))?;
    serde_json::from_str(payload)
        .map_err(|e| AppError::SignerFailed(format!("script result is not JSON: {}", e)))
}

fn signature_from_value(value: &Value) -> Result<SignatureTriple, AppError> {
    let field = |name: &str| -> Result<String, AppError> {
        match value.get(name) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(AppError::SignerFailed(format!(
                "signature result is missing '{}'",
                name
            ))),
        }
    };

    Ok(SignatureTriple {
        x_s: field("xs")?,
        x_t: field("xt")?,
        x_s_common: field("xs_common")?,
    })
}

fn call_name(call: &str) -> &str {
    call.split('(').next().unwrap_or(call)
}
