// src/api/headers.rs
//! Header assembly: a fixed desktop-browser header set plus the per-request
//! signature and trace ids.

use super::request::{signed_path, ApiRequest, Method};
use crate::error::AppError;
use crate::signing::{b3_trace_id, Signer, SigningInput};
use crate::types::SessionCredentials;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE};
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36 Edg/121.0.0.0";

/// Headers an Edge 121 on Windows tab sends to the API host, in order.
const BROWSER_HEADERS: &[(&str, &str)] = &[
    ("authority", "edith.xiaohongshu.com"),
    ("accept", "application/json, text/plain, */*"),
    (
        "accept-language",
        "zh-CN,zh;q=0.9,en;q=0.8,en-GB;q=0.7,en-US;q=0.6",
    ),
    ("cache-control", "no-cache"),
    ("content-type", "application/json;charset=UTF-8"),
    ("origin", "https://www.xiaohongshu.com"),
    ("pragma", "no-cache"),
    ("referer", "https://www.xiaohongshu.com/"),
    (
        "sec-ch-ua",
        "\"Not A(Brand\";v=\"99\", \"Microsoft Edge\";v=\"121\", \"Chromium\";v=\"121\"",
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-site"),
    ("user-agent", USER_AGENT),
    ("x-mns", "unload"),
];

/// A request ready for dispatch: signed, with the bytes to send.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: String,
}

impl SignedRequest {
    /// The path-and-query that was signed.
    pub fn signed_path(&self) -> &str {
        signed_path(&self.url)
    }
}

/// Builds the header set for one request.
///
/// Calls the signer once for `x-s`/`x-t`/`x-s-common` and once for the
/// x-ray trace id, and draws a fresh random `x-b3-traceid`.
pub fn build_headers(
    signer: &dyn Signer,
    seed: &str,
    path: &str,
    body: &str,
    method: Method,
) -> Result<HeaderMap, AppError> {
    let signature = signer.sign(&SigningInput {
        seed,
        path,
        body,
        method,
    })?;
    let xray_trace_id = signer.trace_id()?;

    let mut headers = HeaderMap::with_capacity(BROWSER_HEADERS.len() + 5);
    for (name, value) in BROWSER_HEADERS {
        headers.insert(*name, HeaderValue::from_static(*value));
    }

    insert(&mut headers, "x-b3-traceid", &b3_trace_id())?;
    insert(&mut headers, "x-s", &signature.x_s)?;
    insert(&mut headers, "x-s-common", &signature.x_s_common)?;
    insert(&mut headers, "x-t", &signature.x_t)?;
    insert(&mut headers, "x-xray-traceid", &xray_trace_id)?;

    Ok(headers)
}

/// Signs and assembles `request` for dispatch against `base`.
pub fn assemble(
    signer: &dyn Signer,
    credentials: &SessionCredentials,
    base: &Url,
    request: &ApiRequest,
) -> Result<SignedRequest, AppError> {
    let url = request.resolve_url(base)?;
    let body = request.serialized_body()?;
    let mut headers = build_headers(
        signer,
        credentials.seed(),
        signed_path(&url),
        &body,
        request.method,
    )?;

    let cookie = HeaderValue::from_bytes(credentials.to_header_value().as_bytes())
        .map_err(|e| AppError::InvalidRequest(format!("cookie header: {}", e)))?;
    headers.insert(COOKIE, cookie);

    Ok(SignedRequest {
        method: request.method,
        url,
        headers,
        body,
    })
}

fn insert(headers: &mut HeaderMap, name: &'static str, value: &str) -> Result<(), AppError> {
    let value = HeaderValue::from_str(value)
        .map_err(|e| AppError::InvalidRequest(format!("header {}: {}", name, e)))?;
    headers.insert(HeaderName::from_static(name), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signing::StaticSigner;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("https://edith.xiaohongshu.com").unwrap()
    }

    #[test]
    fn test_signature_headers_come_from_signer() {
        let signer = StaticSigner::default();
        for body in ["", "{\"a\":1}", "{\"keyword\":\"猫\"}"] {
            let headers = build_headers(&signer, "seed", "/api/x", body, Method::Post).unwrap();
            assert_eq!(headers["x-s"], "XYW_static");
            assert_eq!(headers["x-t"], "1700000000000");
            assert_eq!(headers["x-s-common"], "common_static");
            assert_eq!(headers["x-xray-traceid"], "xray_static");
            assert_eq!(headers["x-b3-traceid"].len(), 16);
        }
    }

    #[test]
    fn test_browser_template_is_complete() {
        let headers =
            build_headers(&StaticSigner::default(), "s", "/api/x", "", Method::Get).unwrap();
        assert_eq!(headers["origin"], "https://www.xiaohongshu.com");
        assert_eq!(headers["referer"], "https://www.xiaohongshu.com/");
        assert_eq!(headers["sec-ch-ua-platform"], "\"Windows\"");
        assert!(headers["user-agent"].to_str().unwrap().contains("Edg/121"));
        assert_eq!(headers.len(), BROWSER_HEADERS.len() + 5);
    }

    #[test]
    fn test_get_signs_the_dispatched_path() {
        let signer = StaticSigner::default();
        let credentials = SessionCredentials::parse("a1=seedvalue; web_session=ws").unwrap();
        let request = ApiRequest::get("/api/sns/web/v2/comment/page")
            .param("note_id", "n1")
            .param("cursor", "")
            .param("image_formats", "jpg,webp,avif");

        let signed = assemble(&signer, &credentials, &base(), &request).unwrap();
        let calls = signer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, signed.signed_path());
        assert_eq!(calls[0].seed, "seedvalue");
        assert_eq!(calls[0].body, "");
        assert_eq!(calls[0].method, Method::Get);
        assert_eq!(signed.headers[COOKIE], "a1=seedvalue; web_session=ws");
    }

    #[test]
    fn test_post_signs_the_sent_body() {
        let signer = StaticSigner::default();
        let credentials = SessionCredentials::parse("a1=seedvalue").unwrap();
        let request = ApiRequest::post(
            "/api/sns/web/v1/search/notes",
            json!({"keyword": "咖啡", "page": 1}),
        );

        let signed = assemble(&signer, &credentials, &base(), &request).unwrap();
        let calls = signer.calls();
        assert_eq!(calls[0].body, signed.body);
        assert_eq!(signed.body, "{\"keyword\":\"咖啡\",\"page\":1}");
        assert_eq!(calls[0].path, "/api/sns/web/v1/search/notes");
    }
}
