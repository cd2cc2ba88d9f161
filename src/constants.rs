// src/constants.rs
//! Domain constants that define the operational boundaries of the client.
//!
//! Each constant is named for the platform concept it pins down. Reading
//! them top to bottom tells you where requests go, how large each page is,
//! and which defaults the platform expects when a caller leaves a field out.

// ---------------------------------------------------------------------------
// Hosts
// ---------------------------------------------------------------------------

/// Origin of the private JSON API. Every signed path is relative to this.
pub const API_BASE_URL: &str = "https://edith.xiaohongshu.com";

/// Origin of the public web pages (share URLs, note pages).
pub const WEB_BASE_URL: &str = "https://www.xiaohongshu.com";

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Cookie field the signing capability mixes into every signature.
pub const SEED_COOKIE: &str = "a1";

/// Variable name holding the cookie jar in a `KEY=VALUE` credential file.
pub const COOKIE_ENV_VAR: &str = "COOKIES";

/// File name searched for in the default credential locations.
pub const DEFAULT_ENV_FILE: &str = ".env";

// ---------------------------------------------------------------------------
// Share links
// ---------------------------------------------------------------------------

/// Access-token source assumed when a share URL carries none.
pub const DEFAULT_XSEC_SOURCE: &str = "pc_search";

// ---------------------------------------------------------------------------
// Page sizes
// ---------------------------------------------------------------------------

/// Notes per page on a user's posted/liked/collected listings.
pub const USER_NOTES_PAGE_SIZE: u32 = 30;

/// Notes per page of the home feed. The feed's note index advances by this.
pub const HOMEFEED_PAGE_SIZE: u32 = 20;

/// Results per page of note search.
pub const NOTE_SEARCH_PAGE_SIZE: u32 = 20;

/// Results per page of user search.
pub const USER_SEARCH_PAGE_SIZE: u32 = 15;

/// Replies per page when expanding a comment thread.
pub const SUB_COMMENT_PAGE_SIZE: u32 = 10;

/// Entries per page of the notification listings.
pub const MESSAGE_PAGE_SIZE: u32 = 20;

/// Image formats the web client advertises.
pub const IMAGE_FORMATS: [&str; 3] = ["jpg", "webp", "avif"];

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Per-request timeout. The aggregators impose no overall deadline.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Alphabet of the random `x-b3-traceid` header and of search ids.
pub const TRACE_ID_ALPHABET: &[u8] = b"abcdef0123456789";

/// Length of the `x-b3-traceid` header value.
pub const TRACE_ID_LEN: usize = 16;

/// Length of the `search_id` carried by search requests.
pub const SEARCH_ID_LEN: usize = 21;

/// Maximum characters shown when previewing an undecodable response body.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;

/// Message reported by an aggregation that succeeded without fetching.
pub const SUCCESS_MESSAGE: &str = "成功";
