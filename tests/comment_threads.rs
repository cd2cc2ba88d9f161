// tests/comment_threads.rs
mod common;

use common::LoopbackTransport;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use xhsfetch::{FailureKind, ShareLink, XhsApi};

fn envelope(data: Value) -> Value {
    json!({"success": true, "msg": "ok", "data": data})
}

fn query(sent: &xhsfetch::api::SignedRequest, key: &str) -> Option<String> {
    sent.url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[test]
fn test_replies_are_expanded_in_order() {
    let transport = LoopbackTransport::new("a1=X")
        .respond(envelope(json!({
            "comments": [
                {"id": "c1", "note_id": "n1", "sub_comments": [{"id": "r1"}],
                 "sub_comment_has_more": true, "sub_comment_cursor": "r1"},
                {"id": "c2", "note_id": "n1", "sub_comments": [],
                 "sub_comment_has_more": false}
            ],
            "has_more": true,
            "cursor": "p2"
        })))
        .respond(envelope(json!({
            "comments": [{"id": "c3", "note_id": "n1", "sub_comment_has_more": false}],
            "has_more": false,
            "cursor": ""
        })))
        .respond(envelope(json!({
            "comments": [{"id": "r2"}, {"id": "r3"}],
            "has_more": true,
            "cursor": "r3"
        })))
        .respond(envelope(json!({
            "comments": [{"id": "r4"}],
            "has_more": false,
            "cursor": "r4"
        })));
    let api = XhsApi::new(&transport);

    let thread = api
        .all_comments(&ShareLink::new("n1", "tok", "pc_feed"))
        .unwrap();

    let ids: Vec<&str> = thread
        .payload
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["c1", "c2", "c3"]);

    let replies: Vec<&str> = thread.payload[0]["sub_comments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert_eq!(replies, vec!["r1", "r2", "r3", "r4"]);
    assert_eq!(thread.payload[1]["sub_comments"], json!([]));

    let sent = transport.sent();
    assert_eq!(sent.len(), 4);
    assert_eq!(sent[2].url.path(), "/api/sns/web/v2/comment/sub/page");
    assert_eq!(query(&sent[2], "root_comment_id").as_deref(), Some("c1"));
    assert_eq!(query(&sent[2], "cursor").as_deref(), Some("r1"));
    assert_eq!(query(&sent[3], "cursor").as_deref(), Some("r3"));
    assert_eq!(query(&sent[3], "xsec_token").as_deref(), Some("tok"));
}

#[test]
fn test_failed_reply_page_fails_the_thread() {
    let transport = LoopbackTransport::new("a1=X")
        .respond(envelope(json!({
            "comments": [{"id": "c1", "note_id": "n1", "sub_comment_has_more": true,
                          "sub_comment_cursor": "r1"}],
            "has_more": false,
            "cursor": ""
        })))
        .respond(json!({"success": false, "msg": "rate limited"}));
    let api = XhsApi::new(&transport);

    let failure = api
        .all_comments(&ShareLink::new("n1", "tok", ""))
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::Business);
    assert_eq!(failure.message, "rate limited");
}
