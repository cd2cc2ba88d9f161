// tests/end_to_end.rs
//! Full request path with a fixed signer: cookie jar, signing, headers,
//! envelope decoding and aggregation.

mod common;

use common::{items_page, LoopbackTransport};
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use serde_json::json;
use xhsfetch::output::ResultDocument;
use xhsfetch::{
    parse_cookie_string, parse_resource_url, Method, NoteSearch, Paginator, PageNumberRule,
    SessionCredentials, ShareLink, ValidationError, XhsApi,
};

#[test]
fn test_cookie_string_parses_to_ordered_jar() {
    let jar = parse_cookie_string("a1=X; b=Y");
    let pairs: Vec<(&str, &str)> = jar.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    assert_eq!(pairs, vec![("a1", "X"), ("b", "Y")]);

    let credentials = SessionCredentials::parse("a1=X; b=Y").unwrap();
    assert_eq!(credentials.seed(), "X");
    assert_eq!(credentials.to_header_value(), "a1=X; b=Y");
}

#[test]
fn test_cookie_without_seed_is_rejected() {
    assert_eq!(
        SessionCredentials::parse("web_session=abc").unwrap_err(),
        ValidationError::MissingSeed { field: "a1" }
    );
}

#[test]
fn test_single_page_listing_with_fixed_signer() {
    let transport = LoopbackTransport::new("a1=X; b=Y").respond(items_page([1, 2, 3], false));
    let api = XhsApi::new(&transport);

    let collected = Paginator::new("items")
        .collect(&PageNumberRule::default(), |page| {
            api.search_notes_page(&NoteSearch::new("tea"), *page)
        })
        .unwrap();

    assert_eq!(collected.payload, vec![json!(1), json!(2), json!(3)]);
    assert_eq!(collected.message, "ok");
    assert_eq!(transport.calls(), 1);

    let sent = &transport.sent()[0];
    assert_eq!(sent.headers["x-s"], "XYW_static");
    assert_eq!(sent.headers["x-t"], "1700000000000");
    assert_eq!(sent.headers["x-s-common"], "common_static");
    assert_eq!(sent.headers["x-xray-traceid"], "xray_static");
    assert_eq!(sent.headers["cookie"], "a1=X; b=Y");
    assert_eq!(sent.headers["x-b3-traceid"].len(), 16);
}

#[test]
fn test_get_signs_exactly_the_dispatched_path() {
    let transport = LoopbackTransport::new("a1=X")
        .respond(json!({"success": true, "msg": "ok", "data": {}}));
    let api = XhsApi::new(&transport);

    api.search_keyword("猫 咖啡").unwrap();

    let sent = &transport.sent()[0];
    let signed = transport.signer.calls();
    assert_eq!(signed.len(), 1);
    assert_eq!(signed[0].method, Method::Get);
    assert_eq!(signed[0].seed, "X");
    assert_eq!(signed[0].path, sent.signed_path());
    assert_eq!(signed[0].body, "");
    assert_eq!(
        sent.signed_path(),
        "/api/sns/web/v1/search/recommend?keyword=%E7%8C%AB%20%E5%92%96%E5%95%A1"
    );
    assert_eq!(sent.url.query(), Some("keyword=%E7%8C%AB%20%E5%92%96%E5%95%A1"));
}

#[test]
fn test_post_signs_exactly_the_sent_body() {
    let transport = LoopbackTransport::new("a1=X")
        .respond(json!({"success": true, "msg": "ok", "data": {"items": []}}));
    let api = XhsApi::new(&transport);

    api.note_detail(&ShareLink::new("n1", "tok", "pc_feed")).unwrap();

    let sent = &transport.sent()[0];
    let signed = transport.signer.calls();
    assert_eq!(signed[0].method, Method::Post);
    assert_eq!(signed[0].path, "/api/sns/web/v1/feed");
    assert_eq!(signed[0].body, sent.body);
    assert!(!sent.body.contains(": "));
}

#[test]
fn test_business_failure_renders_as_document() {
    let transport = LoopbackTransport::new("a1=X")
        .respond(json!({"success": false, "code": 300012, "msg": ""}));
    let api = XhsApi::new(&transport);

    let document = ResultDocument::from_outcome(&api.self_info());

    assert_eq!(document.exit_code(), 1);
    assert_snapshot!(document.to_pretty_string(), @r###"
    {
      "success": false,
      "msg": "request rejected with code 300012",
      "data": null
    }
    "###);
}

#[test]
fn test_share_url_examples() {
    assert_eq!(
        parse_resource_url("https://www.xiaohongshu.com/explore/64f1a2?xsec_token=ABC%3D&xsec_source=pc_user"),
        ("64f1a2".to_string(), "ABC=".to_string(), "pc_user".to_string())
    );
    assert_eq!(
        parse_resource_url("https://www.xiaohongshu.com/user/profile/5ff0?xsec_token=T"),
        ("5ff0".to_string(), "T".to_string(), "pc_search".to_string())
    );
    assert_eq!(
        parse_resource_url("explore/abc"),
        ("abc".to_string(), String::new(), "pc_search".to_string())
    );
}
