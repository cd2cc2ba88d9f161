// src/types/share_url.rs
//! Identifiers and access tokens carried by share URLs.
//!
//! Note links look like `https://www.xiaohongshu.com/explore/{id}?xsec_token=..&xsec_source=..`
//! and profile links like `https://www.xiaohongshu.com/user/profile/{id}?...`. The
//! token pair is optional; a missing source falls back to the platform default.

use crate::constants::DEFAULT_XSEC_SOURCE;
use serde::{Deserialize, Serialize};
use url::Url;

/// A resource reference extracted from a share URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLink {
    pub resource_id: String,
    pub xsec_token: String,
    pub xsec_source: String,
}

impl ShareLink {
    /// Builds a link from its parts, defaulting an empty source.
    pub fn new(
        resource_id: impl Into<String>,
        xsec_token: impl Into<String>,
        xsec_source: impl Into<String>,
    ) -> Self {
        let xsec_source = xsec_source.into();
        Self {
            resource_id: resource_id.into(),
            xsec_token: xsec_token.into(),
            xsec_source: if xsec_source.is_empty() {
                DEFAULT_XSEC_SOURCE.to_string()
            } else {
                xsec_source
            },
        }
    }

    /// Parses a share URL. Never fails: unparseable input yields empty fields.
    pub fn parse(input: &str) -> Self {
        let Ok(url) = Url::parse(input.trim()) else {
            log::debug!("Share URL did not parse, falling back to path split: {}", input);
            return Self::parse_lenient(input);
        };

        let resource_id = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
            .to_string();

        Self::from_query(resource_id, url.query_pairs())
    }

    /// Handles bare paths and ids (`explore/abc`, `abc?xsec_token=t`).
    fn parse_lenient(input: &str) -> Self {
        let (path, query) = input.trim().split_once('?').unwrap_or((input.trim(), ""));
        let resource_id = path.rsplit('/').next().unwrap_or_default().to_string();

        Self::from_query(resource_id, url::form_urlencoded::parse(query.as_bytes()))
    }

    /// Picks the first `xsec_token` and `xsec_source` out of decoded query pairs.
    fn from_query(resource_id: String, pairs: url::form_urlencoded::Parse<'_>) -> Self {
        let mut xsec_token = None;
        let mut xsec_source = None;
        for (key, value) in pairs {
            match key.as_ref() {
                "xsec_token" if xsec_token.is_none() => xsec_token = Some(value.into_owned()),
                "xsec_source" if xsec_source.is_none() => xsec_source = Some(value.into_owned()),
                _ => {}
            }
        }

        Self {
            resource_id,
            xsec_token: xsec_token.unwrap_or_default(),
            xsec_source: xsec_source.unwrap_or_else(|| DEFAULT_XSEC_SOURCE.to_string()),
        }
    }

    /// Canonical note URL for this link, carrying the encoded token when present.
    pub fn note_url(&self) -> String {
        let base = format!("{}/explore/{}", crate::constants::WEB_BASE_URL, self.resource_id);
        if self.xsec_token.is_empty() {
            base
        } else {
            let token: String = url::form_urlencoded::byte_serialize(self.xsec_token.as_bytes()).collect();
            format!("{}?xsec_token={}", base, token)
        }
    }
}

/// Parses a share URL into `(resource_id, xsec_token, xsec_source)`.
pub fn parse_resource_url(url: &str) -> (String, String, String) {
    let link = ShareLink::parse(url);
    (link.resource_id, link.xsec_token, link.xsec_source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_note_url_with_token_and_source() {
        let parsed =
            parse_resource_url("https://www.xiaohongshu.com/explore/abc123?xsec_token=tok&xsec_source=pc_feed");
        assert_eq!(
            parsed,
            ("abc123".to_string(), "tok".to_string(), "pc_feed".to_string())
        );
    }

    #[test]
    fn test_note_url_without_query_uses_default_source() {
        let parsed = parse_resource_url("https://www.xiaohongshu.com/explore/abc123");
        assert_eq!(
            parsed,
            ("abc123".to_string(), String::new(), "pc_search".to_string())
        );
    }

    #[test]
    fn test_profile_url() {
        let link = ShareLink::parse(
            "https://www.xiaohongshu.com/user/profile/5f00aa?xsec_token=AB%3D%3D&channel=x",
        );
        assert_eq!(link.resource_id, "5f00aa");
        assert_eq!(link.xsec_token, "AB==");
        assert_eq!(link.xsec_source, "pc_search");
    }

    #[test]
    fn test_malformed_input_never_panics() {
        let link = ShareLink::parse("");
        assert_eq!(link.resource_id, "");
        assert_eq!(link.xsec_token, "");

        let link = ShareLink::parse("explore/abc?xsec_token=t");
        assert_eq!(link.resource_id, "abc");
        assert_eq!(link.xsec_token, "t");
    }

    #[test]
    fn test_note_url_rendering() {
        assert_eq!(
            ShareLink::new("n1", "tok", "").note_url(),
            "https://www.xiaohongshu.com/explore/n1?xsec_token=tok"
        );
        let link = ShareLink::new("n1", "AB+c=", "");
        assert_eq!(ShareLink::parse(&link.note_url()).xsec_token, "AB+c=");
        assert_eq!(
            ShareLink::new("n1", "", "pc_feed").note_url(),
            "https://www.xiaohongshu.com/explore/n1"
        );
    }
}
