// src/api/comments.rs
//! Nested comment aggregation.
//!
//! Top-level comments page by cursor. Each one embeds a first slice of its
//! replies; when `sub_comment_has_more` is set, the remaining replies are
//! paged from `sub_comment_cursor` and appended to `sub_comments`. One
//! failed page at either level fails the whole thread listing.

use super::pagination::{CursorRule, Paginator};
use crate::error::{Outcome, Reply};
use serde_json::Value;

/// Identity of a top-level comment, as needed to page its replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRef {
    pub note_id: String,
    pub comment_id: String,
}

impl CommentRef {
    pub fn of(comment: &Value) -> Self {
        let field = |key: &str| {
            comment
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            note_id: field("note_id"),
            comment_id: field("id"),
        }
    }
}

/// Fills in the rest of one comment's replies, if it has more.
pub fn expand_replies<F>(comment: &mut Value, fetch: F) -> Outcome<()>
where
    F: FnMut(&CommentRef, &String) -> Outcome<Value>,
{
    let has_more = comment
        .get("sub_comment_has_more")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !has_more {
        return Ok(Reply::new("", ()));
    }

    let start = super::envelope::text_field(comment, "sub_comment_cursor");
    let target = CommentRef::of(comment);
    let mut fetch = fetch;
    let replies = Paginator::new("comments").collect_from(&CursorRule, start, |cursor| {
        fetch(&target, cursor)
    })?;

    let mut sub_comments = comment
        .get("sub_comments")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    log::debug!(
        "Comment {} gained {} repl(ies)",
        target.comment_id,
        replies.payload.len()
    );
    sub_comments.extend(replies.payload);

    if let Some(object) = comment.as_object_mut() {
        object.insert("sub_comments".to_string(), Value::Array(sub_comments));
    }
    Ok(Reply::new(replies.message, ()))
}

/// Collects every top-level comment and expands every reply thread.
pub fn collect_thread<O, I>(fetch_outer: O, mut fetch_inner: I) -> Outcome<Vec<Value>>
where
    O: FnMut(&String) -> Outcome<Value>,
    I: FnMut(&CommentRef, &String) -> Outcome<Value>,
{
    let outer = Paginator::new("comments").collect(&CursorRule, fetch_outer)?;
    let message = outer.message;
    let mut comments = outer.payload;

    for comment in comments.iter_mut() {
        expand_replies(comment, &mut fetch_inner)?;
    }

    Ok(Reply::new(message, comments))
}
