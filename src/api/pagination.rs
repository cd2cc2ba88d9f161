// src/api/pagination.rs
//! Cursor-driven aggregation over single-page calls.
//!
//! A `Paginator` repeatedly calls a one-page fetch with a continuation
//! token, appends each page's batch and stops on the first of:
//! an empty batch, a false "more available" flag (for rules that honor
//! it), a reached target, or a rule that has no next token. Any failed
//! page fails the whole aggregation and nothing collected so far is
//! returned.

use super::envelope;
use crate::constants::{HOMEFEED_PAGE_SIZE, SUCCESS_MESSAGE};
use crate::error::{Outcome, Reply};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

/// How one resource kind encodes and advances its continuation token.
pub trait PageRule {
    type Token: Clone + Debug;

    /// Token for the first page.
    fn first(&self) -> Self::Token;

    /// Token for the page after `current`, read from that page's `data`.
    /// `None` means the listing is exhausted.
    fn advance(&self, current: &Self::Token, data: &Value) -> Option<Self::Token>;

    /// Whether `has_more = false` ends the listing.
    fn honors_has_more(&self) -> bool {
        true
    }
}

/// Opaque string cursor, echoed back verbatim from `data.cursor`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorRule;

impl PageRule for CursorRule {
    type Token = String;

    fn first(&self) -> String {
        String::new()
    }

    fn advance(&self, current: &String, data: &Value) -> Option<String> {
        let next = envelope::text_field(data, "cursor");
        if next.is_empty() || next == *current {
            None
        } else {
            Some(next)
        }
    }
}

/// Page number starting at `start`, incremented after every page.
#[derive(Debug, Clone, Copy)]
pub struct PageNumberRule {
    pub start: u32,
}

impl Default for PageNumberRule {
    fn default() -> Self {
        Self { start: 1 }
    }
}

impl PageRule for PageNumberRule {
    type Token = u32;

    fn first(&self) -> u32 {
        self.start
    }

    fn advance(&self, current: &u32, _data: &Value) -> Option<u32> {
        current.checked_add(1)
    }
}

/// Numeric page read from `data.page`; `-1` both starts and ends the listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentinelPageRule;

impl SentinelPageRule {
    pub const SENTINEL: i64 = -1;
}

impl PageRule for SentinelPageRule {
    type Token = i64;

    fn first(&self) -> i64 {
        Self::SENTINEL
    }

    fn advance(&self, current: &i64, data: &Value) -> Option<i64> {
        let next = match data.get("page") {
            Some(Value::Number(n)) => n.as_i64(),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        }
        .unwrap_or(Self::SENTINEL);

        if next == Self::SENTINEL || next == *current {
            None
        } else {
            Some(next)
        }
    }

    fn honors_has_more(&self) -> bool {
        false
    }
}

/// Home feed continuation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedCursor {
    pub cursor_score: String,
    pub refresh_type: u8,
    pub note_index: u32,
}

impl FeedCursor {
    pub const INITIAL_REFRESH: u8 = 1;
    pub const CONTINUED_REFRESH: u8 = 3;
}

impl Default for FeedCursor {
    fn default() -> Self {
        Self {
            cursor_score: String::new(),
            refresh_type: Self::INITIAL_REFRESH,
            note_index: 0,
        }
    }
}

/// Feed cursor: score from `data.cursor_score`, refresh type 1 then 3,
/// note index advancing by the feed page size.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedRule;

impl PageRule for FeedRule {
    type Token = FeedCursor;

    fn first(&self) -> FeedCursor {
        FeedCursor::default()
    }

    fn advance(&self, current: &FeedCursor, data: &Value) -> Option<FeedCursor> {
        Some(FeedCursor {
            cursor_score: envelope::text_field(data, "cursor_score"),
            refresh_type: FeedCursor::CONTINUED_REFRESH,
            note_index: current.note_index.saturating_add(HOMEFEED_PAGE_SIZE),
        })
    }

    fn honors_has_more(&self) -> bool {
        false
    }
}

/// Aggregates the batch stored under `items_key` across pages.
#[derive(Debug, Clone, Copy)]
pub struct Paginator<'a> {
    items_key: &'a str,
    target: Option<usize>,
}

impl<'a> Paginator<'a> {
    pub fn new(items_key: &'a str) -> Self {
        Self {
            items_key,
            target: None,
        }
    }

    /// Stops once `target` items are collected and truncates to exactly that.
    pub fn with_target(mut self, target: usize) -> Self {
        self.target = Some(target);
        self
    }

    /// Collects from the rule's first token.
    pub fn collect<R, F>(&self, rule: &R, fetch: F) -> Outcome<Vec<Value>>
    where
        R: PageRule,
        F: FnMut(&R::Token) -> Outcome<Value>,
    {
        self.collect_from(rule, rule.first(), fetch)
    }

    /// Collects starting from an explicit token.
    pub fn collect_from<R, F>(&self, rule: &R, start: R::Token, mut fetch: F) -> Outcome<Vec<Value>>
    where
        R: PageRule,
        F: FnMut(&R::Token) -> Outcome<Value>,
    {
        if self.target == Some(0) {
            return Ok(Reply::new(SUCCESS_MESSAGE, Vec::new()));
        }

        let mut items = Vec::new();
        let mut message;
        let mut token = start;
        let mut pages = 0usize;

        loop {
            let reply = fetch(&token)?;
            pages += 1;
            message = reply.message;

            let data = envelope::data(&reply.payload);
            let batch = envelope::batch(data, self.items_key);
            if batch.is_empty() {
                break;
            }
            items.extend(batch);

            if self.target.is_some_and(|target| items.len() >= target) {
                break;
            }
            if rule.honors_has_more() && !envelope::has_more(data) {
                break;
            }
            match rule.advance(&token, data) {
                Some(next) => token = next,
                None => break,
            }
        }

        if let Some(target) = self.target {
            items.truncate(target);
        }
        log::info!(
            "Collected {} '{}' item(s) over {} page(s)",
            items.len(),
            self.items_key,
            pages
        );

        Ok(Reply::new(message, items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Failure;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn page(items: Vec<i64>, has_more: bool, cursor: &str) -> Outcome<Value> {
        Ok(Reply::new(
            "ok",
            json!({"success": true, "msg": "ok", "data": {
                "items": items, "has_more": has_more, "cursor": cursor
            }}),
        ))
    }

    #[test]
    fn test_cursor_rule_passes_cursor_verbatim() {
        let mut seen = Vec::new();
        let reply = Paginator::new("items")
            .collect(&CursorRule, |cursor: &String| {
                seen.push(cursor.clone());
                match cursor.as_str() {
                    "" => page(vec![1, 2], true, "c=1"),
                    "c=1" => page(vec![3], false, ""),
                    other => panic!("unexpected cursor {other}"),
                }
            })
            .unwrap();
        assert_eq!(seen, vec!["".to_string(), "c=1".to_string()]);
        assert_eq!(reply.payload, vec![json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_empty_batch_wins_over_has_more() {
        let mut calls = 0;
        let reply = Paginator::new("items")
            .collect(&CursorRule, |_: &String| {
                calls += 1;
                page(vec![], true, "next")
            })
            .unwrap();
        assert_eq!(calls, 1);
        assert!(reply.payload.is_empty());
    }

    #[test]
    fn test_repeated_cursor_stops() {
        let mut calls = 0;
        Paginator::new("items")
            .collect(&CursorRule, |_: &String| {
                calls += 1;
                page(vec![1], true, "same")
            })
            .unwrap();
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_zero_target_fetches_nothing() {
        let reply = Paginator::new("items")
            .with_target(0)
            .collect(&PageNumberRule::default(), |_: &u32| panic!("fetched"))
            .unwrap();
        assert!(reply.payload.is_empty());
    }

    #[test]
    fn test_failure_discards_collected_items() {
        let result = Paginator::new("items").collect(&PageNumberRule::default(), |page_no: &u32| {
            if *page_no == 2 {
                Err(Failure::business("频次异常"))
            } else {
                page(vec![1], true, "")
            }
        });
        assert_eq!(result.unwrap_err().message, "频次异常");
    }

    #[test]
    fn test_sentinel_rule_follows_page_field() {
        let rule = SentinelPageRule;
        assert_eq!(rule.first(), -1);
        assert_eq!(rule.advance(&-1, &json!({"page": 1})), Some(1));
        assert_eq!(rule.advance(&1, &json!({"page": "2"})), Some(2));
        assert_eq!(rule.advance(&2, &json!({"page": -1})), None);
        assert_eq!(rule.advance(&2, &json!({})), None);
        assert!(!rule.honors_has_more());
    }

    #[test]
    fn test_feed_rule_transitions() {
        let rule = FeedRule;
        let first = rule.first();
        assert_eq!(first.refresh_type, 1);
        let second = rule
            .advance(&first, &json!({"cursor_score": "1.7e9"}))
            .unwrap();
        assert_eq!(
            second,
            FeedCursor {
                cursor_score: "1.7e9".to_string(),
                refresh_type: 3,
                note_index: 20,
            }
        );
        let third = rule.advance(&second, &json!({})).unwrap();
        assert_eq!(third.note_index, 40);
        assert_eq!(third.cursor_score, "");
    }
}
