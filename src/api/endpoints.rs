// src/api/endpoints.rs
//! The endpoint catalog: one method per API path, plus the aggregations
//! built from them.

use super::client::Transport;
use super::comments::{collect_thread, CommentRef};
use super::pagination::{
    CursorRule, FeedCursor, FeedRule, PageNumberRule, Paginator, SentinelPageRule,
};
use super::request::ApiRequest;
use super::search::{user_search_body, NoteSearch};
use crate::constants::{
    HOMEFEED_PAGE_SIZE, IMAGE_FORMATS, MESSAGE_PAGE_SIZE, SUB_COMMENT_PAGE_SIZE,
    USER_NOTES_PAGE_SIZE,
};
use crate::error::Outcome;
use crate::types::ShareLink;
use serde_json::{json, Value};

/// Default home feed channel.
pub const RECOMMEND_CHANNEL: &str = "homefeed_recommend";

/// A user's note listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteShelf {
    Posted,
    Liked,
    Collected,
}

impl NoteShelf {
    fn path(&self) -> &'static str {
        match self {
            Self::Posted => "/api/sns/web/v1/user_posted",
            Self::Liked => "/api/sns/web/v1/note/like/page",
            Self::Collected => "/api/sns/web/v2/note/collect/page",
        }
    }
}

/// Notification listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFeed {
    Mentions,
    LikesAndCollects,
    Connections,
}

impl MessageFeed {
    fn path(&self) -> &'static str {
        match self {
            Self::Mentions => "/api/sns/web/v1/you/mentions",
            Self::LikesAndCollects => "/api/sns/web/v1/you/likes",
            Self::Connections => "/api/sns/web/v1/you/connections",
        }
    }
}

fn image_formats_param() -> String {
    IMAGE_FORMATS.join(",")
}

/// Platform API calls over any `Transport`.
pub struct XhsApi<T> {
    transport: T,
}

impl<T: Transport> XhsApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn call(&self, request: ApiRequest) -> Outcome<Value> {
        self.transport.call(&request)
    }

    // -- home feed ---------------------------------------------------------

    pub fn homefeed_channels(&self) -> Outcome<Value> {
        self.call(ApiRequest::get("/api/sns/web/v1/homefeed/category"))
    }

    pub fn homefeed_page(&self, category: &str, cursor: &FeedCursor) -> Outcome<Value> {
        self.call(ApiRequest::post(
            "/api/sns/web/v1/homefeed",
            json!({
                "cursor_score": cursor.cursor_score,
                "num": HOMEFEED_PAGE_SIZE,
                "refresh_type": cursor.refresh_type,
                "note_index": cursor.note_index,
                "unread_begin_note_id": "",
                "unread_end_note_id": "",
                "unread_note_count": 0,
                "category": category,
                "search_key": "",
                "need_num": 10,
                "image_formats": IMAGE_FORMATS,
                "need_filter_image": false,
            }),
        ))
    }

    /// Collects `count` feed items from `category`.
    pub fn homefeed(&self, category: &str, count: usize) -> Outcome<Vec<Value>> {
        Paginator::new("items")
            .with_target(count)
            .collect(&FeedRule, |cursor| self.homefeed_page(category, cursor))
    }

    // -- users -------------------------------------------------------------

    pub fn user_info(&self, user_id: &str) -> Outcome<Value> {
        self.call(ApiRequest::get("/api/sns/web/v1/user/otherinfo").param("target_user_id", user_id))
    }

    pub fn self_info(&self) -> Outcome<Value> {
        self.call(ApiRequest::get("/api/sns/web/v1/user/selfinfo"))
    }

    pub fn self_info_v2(&self) -> Outcome<Value> {
        self.call(ApiRequest::get("/api/sns/web/v2/user/me"))
    }

    pub fn user_notes_page(&self, shelf: NoteShelf, user: &ShareLink, cursor: &str) -> Outcome<Value> {
        self.call(
            ApiRequest::get(shelf.path())
                .param("num", USER_NOTES_PAGE_SIZE)
                .param("cursor", cursor)
                .param("user_id", &user.resource_id)
                .param("image_formats", image_formats_param())
                .param("xsec_token", &user.xsec_token)
                .param("xsec_source", &user.xsec_source),
        )
    }

    /// Every note on one of a user's shelves.
    pub fn user_notes(&self, shelf: NoteShelf, user: &ShareLink) -> Outcome<Vec<Value>> {
        Paginator::new("notes").collect(&CursorRule, |cursor| {
            self.user_notes_page(shelf, user, cursor)
        })
    }

    // -- notes and search --------------------------------------------------

    pub fn note_detail(&self, note: &ShareLink) -> Outcome<Value> {
        self.call(ApiRequest::post(
            "/api/sns/web/v1/feed",
            json!({
                "source_note_id": note.resource_id,
                "image_formats": IMAGE_FORMATS,
                "extra": {"need_body_topic": "1"},
                "xsec_source": note.xsec_source,
                "xsec_token": note.xsec_token,
            }),
        ))
    }

    pub fn search_keyword(&self, word: &str) -> Outcome<Value> {
        self.call(ApiRequest::get("/api/sns/web/v1/search/recommend").param("keyword", word))
    }

    pub fn search_notes_page(&self, search: &NoteSearch, page: u32) -> Outcome<Value> {
        self.call(ApiRequest::post(
            "/api/sns/web/v1/search/notes",
            search.page_body(page),
        ))
    }

    /// Collects `count` note search results.
    pub fn search_notes(&self, search: &NoteSearch, count: usize) -> Outcome<Vec<Value>> {
        Paginator::new("items")
            .with_target(count)
            .collect(&PageNumberRule::default(), |page| {
                self.search_notes_page(search, *page)
            })
    }

    pub fn search_users_page(&self, keyword: &str, page: u32) -> Outcome<Value> {
        self.call(ApiRequest::post(
            "/api/sns/web/v1/search/usersearch",
            user_search_body(keyword, page),
        ))
    }

    /// Collects `count` user search results.
    pub fn search_users(&self, keyword: &str, count: usize) -> Outcome<Vec<Value>> {
        Paginator::new("users")
            .with_target(count)
            .collect(&PageNumberRule::default(), |page| {
                self.search_users_page(keyword, *page)
            })
    }

    // -- comments ----------------------------------------------------------

    pub fn comment_page(&self, note_id: &str, cursor: &str, xsec_token: &str) -> Outcome<Value> {
        self.call(
            ApiRequest::get("/api/sns/web/v2/comment/page")
                .param("note_id", note_id)
                .param("cursor", cursor)
                .param("top_comment_id", "")
                .param("image_formats", image_formats_param())
                .param("xsec_token", xsec_token),
        )
    }

    pub fn reply_page(&self, comment: &CommentRef, cursor: &str, xsec_token: &str) -> Outcome<Value> {
        self.call(
            ApiRequest::get("/api/sns/web/v2/comment/sub/page")
                .param("note_id", &comment.note_id)
                .param("root_comment_id", &comment.comment_id)
                .param("num", SUB_COMMENT_PAGE_SIZE)
                .param("cursor", cursor)
                .param("image_formats", image_formats_param())
                .param("top_comment_id", "")
                .param("xsec_token", xsec_token),
        )
    }

    /// Every comment on a note with every reply thread expanded.
    pub fn all_comments(&self, note: &ShareLink) -> Outcome<Vec<Value>> {
        collect_thread(
            |cursor| self.comment_page(&note.resource_id, cursor, &note.xsec_token),
            |comment, cursor| self.reply_page(comment, cursor, &note.xsec_token),
        )
    }

    // -- messages ----------------------------------------------------------

    pub fn unread_count(&self) -> Outcome<Value> {
        self.call(ApiRequest::get("/api/sns/web/unread_count"))
    }

    pub fn messages_page(&self, feed: MessageFeed, cursor: &str) -> Outcome<Value> {
        self.call(
            ApiRequest::get(feed.path())
                .param("num", MESSAGE_PAGE_SIZE)
                .param("cursor", cursor),
        )
    }

    pub fn messages(&self, feed: MessageFeed) -> Outcome<Vec<Value>> {
        Paginator::new("message_list").collect(&CursorRule, |cursor| self.messages_page(feed, cursor))
    }

    // -- creator -----------------------------------------------------------

    /// One page of the creator's own notes; a negative page asks for the first.
    pub fn creator_posted_page(&self, page: i64) -> Outcome<Value> {
        let mut request = ApiRequest::get("/web_api/sns/v5/creator/note/user/posted").param("tab", 0);
        if page >= 0 {
            request = request.param("page", page);
        }
        self.call(request)
    }

    pub fn creator_posted(&self) -> Outcome<Vec<Value>> {
        Paginator::new("notes").collect(&SentinelPageRule, |page| self.creator_posted_page(*page))
    }
}
