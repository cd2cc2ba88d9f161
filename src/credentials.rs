// src/credentials.rs
//! Resolves the session cookie string from the places a user may keep it.
//!
//! Precedence, first match wins:
//! 1. the cookie string given explicitly (`--cookie`)
//! 2. a `COOKIES` variable already present in the process environment
//! 3. the credential file named explicitly (`--env-file`), or when none is
//!    named, `.env` in the working directory and then `.env` next to the
//!    executable
//!
//! Nothing found, or a jar without the `a1` seed, is a configuration error
//! raised before any network activity.

use crate::constants::{COOKIE_ENV_VAR, DEFAULT_ENV_FILE};
use crate::error::AppError;
use crate::types::SessionCredentials;
use std::fs;
use std::path::{Path, PathBuf};

/// Every place a cookie string may come from, in precedence order.
#[derive(Debug, Clone, Default)]
pub struct CredentialSources {
    pub explicit: Option<String>,
    pub environment: Option<String>,
    pub env_file: Option<PathBuf>,
    pub search_dirs: Vec<PathBuf>,
}

impl CredentialSources {
    /// Sources as seen by the running process: its environment, working
    /// directory and executable location.
    pub fn from_process(explicit: Option<String>, env_file: Option<PathBuf>) -> Self {
        let mut search_dirs = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            search_dirs.push(cwd);
        }
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            if !search_dirs.contains(&exe_dir) {
                search_dirs.push(exe_dir);
            }
        }

        Self {
            explicit,
            environment: std::env::var(COOKIE_ENV_VAR).ok(),
            env_file,
            search_dirs,
        }
    }

    /// Credential files to read, in order.
    fn candidate_files(&self) -> Vec<PathBuf> {
        match &self.env_file {
            Some(path) => vec![path.clone()],
            None => self
                .search_dirs
                .iter()
                .map(|dir| dir.join(DEFAULT_ENV_FILE))
                .collect(),
        }
    }
}

/// Finds the raw cookie string.
pub fn resolve_cookie_string(sources: &CredentialSources) -> Result<String, AppError> {
    if let Some(explicit) = non_empty(sources.explicit.as_deref()) {
        log::debug!("Using cookie string given on the command line");
        return Ok(explicit.to_string());
    }

    if let Some(from_env) = non_empty(sources.environment.as_deref()) {
        log::debug!("Using {} from the process environment", COOKIE_ENV_VAR);
        return Ok(from_env.to_string());
    }

    if let Some(path) = &sources.env_file {
        if !path.is_file() {
            return Err(AppError::MissingConfiguration(format!(
                "credential file {} does not exist",
                path.display()
            )));
        }
    }

    for path in sources.candidate_files() {
        if !path.is_file() {
            log::debug!("No credential file at {}", path.display());
            continue;
        }
        let contents = fs::read_to_string(&path)?;
        if let Some(value) = lookup_env_value(&contents, COOKIE_ENV_VAR) {
            if !value.trim().is_empty() {
                log::debug!("Using {} from {}", COOKIE_ENV_VAR, path.display());
                return Ok(value);
            }
        }
    }

    Err(AppError::MissingConfiguration(format!(
        "{} not found. Provide --cookie or set {} in .env",
        COOKIE_ENV_VAR, COOKIE_ENV_VAR
    )))
}

/// Resolves and validates the session credentials.
pub fn resolve(sources: &CredentialSources) -> Result<SessionCredentials, AppError> {
    let raw = resolve_cookie_string(sources)?;
    let credentials = SessionCredentials::parse(&raw)?;
    log::info!("Resolved session with {} cookies", credentials.len());
    Ok(credentials)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Reads one variable out of `KEY=VALUE` file contents.
///
/// Blank lines and `#` comments are skipped, an `export ` prefix is
/// allowed, and a value wrapped in matching single or double quotes is
/// unwrapped. The first definition wins.
pub fn lookup_env_value(contents: &str, key: &str) -> Option<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (name, value) = line.split_once('=')?;
            (name.trim() == key).then(|| unquote(value.trim()).to_string())
        })
        .next()
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
