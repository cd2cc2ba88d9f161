// src/export.rs
//! Note export in three stages: gather note links, fetch and summarize
//! each note, report.
//!
//! Links come from explicit URLs, a URL file and an optional search, in
//! that order. A note whose detail cannot be fetched is skipped and listed
//! in the report; a failed search fails the export.

use crate::api::{NoteSearch, Transport, XhsApi};
use crate::error::{AppError, Outcome, Reply};
use crate::model::NoteSummary;
use crate::types::ShareLink;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// What to export.
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    pub urls: Vec<String>,
    pub search: Option<(NoteSearch, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedNote {
    pub url: String,
    pub msg: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub count: usize,
    pub notes: Vec<NoteSummary>,
    pub skipped: Vec<SkippedNote>,
}

/// Reads note URLs from a file, one per line; blank lines and `#` comments are skipped.
pub fn load_url_file(path: &Path) -> Result<Vec<String>, AppError> {
    let contents = fs::read_to_string(path)?;
    Ok(parse_url_lines(&contents))
}

fn parse_url_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Note URL for a search result, when it carries both id and token.
pub fn link_from_search_item(item: &Value) -> Option<String> {
    let id = item["id"].as_str().filter(|s| !s.is_empty())?;
    let token = item["xsec_token"].as_str().filter(|s| !s.is_empty())?;
    Some(ShareLink::new(id, token, "").note_url())
}

/// Runs an export against `api`.
pub fn export_notes<T: Transport>(api: &XhsApi<T>, request: &ExportRequest) -> Outcome<ExportReport> {
    let mut urls = request.urls.clone();
    if let Some((search, count)) = &request.search {
        let found = api.search_notes(search, *count)?;
        urls.extend(found.payload.iter().filter_map(link_from_search_item));
    }
    log::info!("Exporting {} note(s)", urls.len());

    let mut notes = Vec::new();
    let mut skipped = Vec::new();
    for url in urls {
        match api.note_detail(&ShareLink::parse(&url)) {
            Ok(reply) => match reply.payload["data"]["items"].get(0) {
                Some(item) => notes.push(NoteSummary::from_item(item, &url)),
                None => skipped.push(SkippedNote {
                    url,
                    msg: "note detail has no items".to_string(),
                }),
            },
            Err(failure) => {
                log::warn!("Skipping {}: {}", url, failure);
                skipped.push(SkippedNote {
                    url,
                    msg: failure.message,
                });
            }
        }
    }

    Ok(Reply::new(
        crate::constants::SUCCESS_MESSAGE,
        ExportReport {
            count: notes.len(),
            notes,
            skipped,
        },
    ))
}
