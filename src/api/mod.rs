// src/api/mod.rs
//! Platform API interaction: signed requests, the transport, pagination
//! and the endpoint catalog.
//!
//! Everything above the transport depends only on the `Transport` trait,
//! never on HTTP details, so aggregations run unchanged against a scripted
//! transport in tests.

pub mod client;
pub mod comments;
pub mod endpoints;
pub mod envelope;
pub mod headers;
pub mod pagination;
pub mod request;
pub mod search;

pub use client::{Transport, TransportOptions, XhsHttpClient};
pub use comments::CommentRef;
pub use endpoints::{MessageFeed, NoteShelf, XhsApi, RECOMMEND_CHANNEL};
pub use headers::{assemble, SignedRequest};
pub use pagination::{
    CursorRule, FeedCursor, FeedRule, PageNumberRule, PageRule, Paginator, SentinelPageRule,
};
pub use request::{ApiRequest, Method};
pub use search::{
    DistanceFilter, Geo, NoteSearch, NoteTypeFilter, PublishTimeFilter, SortOrder,
    ViewedRangeFilter,
};
