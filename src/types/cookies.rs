// src/types/cookies.rs
//! Session credentials parsed from a browser cookie string.

use super::ValidationError;
use crate::constants::SEED_COOKIE;
use indexmap::IndexMap;
use std::fmt;

/// Cookie jar of a logged-in browser session.
///
/// Parsed once per process and immutable afterwards. The `a1` field is the
/// seed every request signature is derived from, so a jar without it is
/// rejected at construction.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredentials {
    cookies: IndexMap<String, String>,
}

impl SessionCredentials {
    /// Parses a cookie string and checks that the seed field is present.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.trim().is_empty() {
            return Err(ValidationError::EmptyCookieString);
        }

        let cookies = parse_cookie_string(raw);
        match cookies.get(SEED_COOKIE) {
            Some(seed) if !seed.is_empty() => Ok(Self { cookies }),
            _ => Err(ValidationError::MissingSeed { field: SEED_COOKIE }),
        }
    }

    /// The session seed (`a1`) fed to the signing capability.
    pub fn seed(&self) -> &str {
        self.cookies
            .get(SEED_COOKIE)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Renders the jar as a `cookie` request header value.
    pub fn to_header_value(&self) -> String {
        self.cookies
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Debug for SessionCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Cookie values are session secrets; only the names are shown.
        f.debug_struct("SessionCredentials")
            .field("cookies", &self.cookies.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Splits a cookie string into name/value pairs.
///
/// The separator is `"; "` when the string contains it, `";"` otherwise.
/// Each segment splits once on its first `=`, so values such as base64
/// with padding survive intact. Segments without `=` are skipped.
pub fn parse_cookie_string(raw: &str) -> IndexMap<String, String> {
    let separator = if raw.contains("; ") { "; " } else { ";" };

    raw.split(separator)
        .filter(|segment| !segment.trim().is_empty())
        .filter_map(|segment| segment.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_with_spaced_separator() {
        let creds = SessionCredentials::parse("a1=X; b=Y").unwrap();
        let pairs: Vec<_> = creds.iter().collect();
        assert_eq!(pairs, vec![("a1", "X"), ("b", "Y")]);
        assert_eq!(creds.seed(), "X");
    }

    #[test]
    fn test_parse_with_tight_separator() {
        let cookies = parse_cookie_string("a1=X;web_session=abc;b=Y");
        assert_eq!(cookies.len(), 3);
        assert_eq!(cookies["web_session"], "abc");
    }

    #[test]
    fn test_values_keep_everything_after_first_equals() {
        for raw in ["a1=seed; token=YWJj==; q=k=v", "a1=seed;token=YWJj==;q=k=v"] {
            let cookies = parse_cookie_string(raw);
            assert_eq!(cookies["token"], "YWJj==");
            assert_eq!(cookies["q"], "k=v");
        }
    }

    #[test]
    fn test_empty_segments_and_bare_words_are_skipped() {
        let cookies = parse_cookie_string("a1=X;;;flag;b=");
        let keys: Vec<_> = cookies.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a1", "b"]);
        assert_eq!(cookies["a1"], "X");
        assert_eq!(cookies["b"], "");
    }

    #[test]
    fn test_spaced_separator_wins_over_bare_semicolons() {
        // Any "; " in the string selects it as the only separator.
        let cookies = parse_cookie_string("a1=X;;  ;flag;b=");
        let keys: Vec<_> = cookies.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a1", ";flag;b"]);
        assert_eq!(cookies["a1"], "X;");
        assert_eq!(cookies[";flag;b"], "");
    }

    #[test]
    fn test_missing_seed_is_rejected() {
        assert_eq!(
            SessionCredentials::parse("web_session=abc; b=Y"),
            Err(ValidationError::MissingSeed { field: "a1" })
        );
        assert_eq!(
            SessionCredentials::parse("a1=; b=Y"),
            Err(ValidationError::MissingSeed { field: "a1" })
        );
        assert_eq!(
            SessionCredentials::parse("   "),
            Err(ValidationError::EmptyCookieString)
        );
    }

    #[test]
    fn test_header_value_round_trip() {
        let creds = SessionCredentials::parse("a1=X;b=Y==").unwrap();
        assert_eq!(creds.to_header_value(), "a1=X; b=Y==");
    }

    #[test]
    fn test_debug_hides_values() {
        let creds = SessionCredentials::parse("a1=secretseed").unwrap();
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("a1"));
        assert!(!rendered.contains("secretseed"));
    }
}
