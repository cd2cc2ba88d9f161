// src/media.rs
//! Original-quality media addresses.
//!
//! Image URLs are rewritten offline to the CDN host that serves originals.
//! Video addresses need the public note page, which advertises the stream
//! in an `og:video` meta tag; that page is unsigned and needs no cookies.

use crate::constants::{REQUEST_TIMEOUT_SECS, WEB_BASE_URL};
use crate::error::{AppError, Failure, Outcome, Reply};
use crate::types::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use std::time::Duration;

const ORIGINAL_IMAGE_HOST: &str = "https://sns-img-qc.xhscdn.com";
const SPECTRUM_IMAGE_HOST: &str = "http://sns-webpic.xhscdn.com";
const PAGE_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

static OG_VIDEO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<meta name="og:video" content="(.*?)">"#)
        .expect("og:video pattern is a valid regex")
});

/// Rewrites a CDN image URL to its watermark-free original.
pub fn no_watermark_image_url(img_url: &str) -> Result<String, ValidationError> {
    let trimmed = img_url.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("image url"));
    }

    let tail = |segments: usize| -> String {
        let parts: Vec<&str> = trimmed.split('/').collect();
        let start = parts.len().saturating_sub(segments);
        let joined = parts[start..].join("/");
        joined.split('!').next().unwrap_or_default().to_string()
    };

    let rewritten = if trimmed.contains(".jpg") {
        format!("{}/{}", ORIGINAL_IMAGE_HOST, tail(3))
    } else if trimmed.contains("spectrum") {
        format!("{}/{}?imageView2/2/w/format/jpg", SPECTRUM_IMAGE_HOST, tail(2))
    } else {
        format!("{}/{}", ORIGINAL_IMAGE_HOST, tail(1))
    };
    Ok(rewritten)
}

/// First `og:video` address advertised by a note page.
pub fn extract_og_video(html: &str) -> Option<String> {
    OG_VIDEO
        .captures(html)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}

/// Public page of a note.
pub fn note_page_url(note_id: &str) -> String {
    format!("{}/explore/{}", WEB_BASE_URL, note_id)
}

/// Fetches a note's public page and returns its video address.
pub fn resolve_video_url(note_id: &str, use_env_proxy: bool) -> Outcome<String> {
    let html = fetch_note_page(note_id, use_env_proxy).map_err(Failure::from)?;
    match extract_og_video(&html) {
        Some(url) => Ok(Reply::new(crate::constants::SUCCESS_MESSAGE, url)),
        None => Err(Failure::business("og:video not found")),
    }
}

fn fetch_note_page(note_id: &str, use_env_proxy: bool) -> Result<String, AppError> {
    let mut builder = Client::builder().timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS));
    if !use_env_proxy {
        builder = builder.no_proxy();
    }
    let url = note_page_url(note_id);
    log::debug!("GET {}", url);

    let text = builder
        .build()?
        .get(&url)
        .header(USER_AGENT, PAGE_USER_AGENT)
        .send()?
        .text()?;
    Ok(text)
}
