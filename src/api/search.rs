// src/api/search.rs
//! Search request bodies and filter vocabulary.
//!
//! The web client sends note-search filters as a list of
//! `{"tags": [..], "type": ..}` objects whose tags are the display labels
//! shown in its filter panel, so the labels below are wire values.

use crate::constants::{IMAGE_FORMATS, NOTE_SEARCH_PAGE_SIZE, SEARCH_ID_LEN, USER_SEARCH_PAGE_SIZE};
use crate::signing::random_hex;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    General,
    TimeDescending,
    PopularityDescending,
    CommentDescending,
    CollectDescending,
}

impl SortOrder {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::TimeDescending => "time_descending",
            Self::PopularityDescending => "popularity_descending",
            Self::CommentDescending => "comment_descending",
            Self::CollectDescending => "collect_descending",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteTypeFilter {
    #[default]
    Any,
    Video,
    Normal,
}

impl NoteTypeFilter {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Any => "不限",
            Self::Video => "视频笔记",
            Self::Normal => "普通笔记",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishTimeFilter {
    #[default]
    Any,
    Day,
    Week,
    HalfYear,
}

impl PublishTimeFilter {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Any => "不限",
            Self::Day => "一天内",
            Self::Week => "一周内",
            Self::HalfYear => "半年内",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewedRangeFilter {
    #[default]
    Any,
    Viewed,
    NotViewed,
    Following,
}

impl ViewedRangeFilter {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Any => "不限",
            Self::Viewed => "已看过",
            Self::NotViewed => "未看过",
            Self::Following => "已关注",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceFilter {
    #[default]
    Any,
    SameCity,
    Nearby,
}

impl DistanceFilter {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Any => "不限",
            Self::SameCity => "同城",
            Self::Nearby => "附近",
        }
    }
}

/// Location hint for distance-filtered searches.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Geo {
    #[default]
    None,
    /// Sent as given.
    Raw(String),
    /// Serialized compactly into a string field.
    Object(Value),
}

impl Geo {
    /// Interprets user input: a JSON object becomes `Object`, anything else `Raw`.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::None;
        }
        match serde_json::from_str::<Value>(trimmed) {
            Ok(value @ Value::Object(_)) => Self::Object(value),
            _ => Self::Raw(input.to_string()),
        }
    }

    fn wire_value(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Raw(raw) => raw.clone(),
            Self::Object(value) => value.to_string(),
        }
    }
}

/// A note search: keyword plus filters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoteSearch {
    pub keyword: String,
    pub sort: SortOrder,
    pub note_type: NoteTypeFilter,
    pub publish_time: PublishTimeFilter,
    pub viewed_range: ViewedRangeFilter,
    pub distance: DistanceFilter,
    pub geo: Geo,
}

impl NoteSearch {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Self::default()
        }
    }

    /// Body of one note-search page, with a fresh `search_id`.
    pub fn page_body(&self, page: u32) -> Value {
        json!({
            "keyword": self.keyword,
            "page": page,
            "page_size": NOTE_SEARCH_PAGE_SIZE,
            "search_id": search_id(),
            "sort": "general",
            "note_type": 0,
            "ext_flags": [],
            "filters": [
                {"tags": [self.sort.tag()], "type": "sort_type"},
                {"tags": [self.note_type.tag()], "type": "filter_note_type"},
                {"tags": [self.publish_time.tag()], "type": "filter_note_time"},
                {"tags": [self.viewed_range.tag()], "type": "filter_note_range"},
                {"tags": [self.distance.tag()], "type": "filter_pos_distance"},
            ],
            "geo": self.geo.wire_value(),
            "image_formats": IMAGE_FORMATS,
        })
    }
}

/// Body of one user-search page.
pub fn user_search_body(keyword: &str, page: u32) -> Value {
    json!({
        "search_user_request": {
            "keyword": keyword,
            "search_id": search_id(),
            "page": page,
            "page_size": USER_SEARCH_PAGE_SIZE,
            "biz_type": "web_search_user",
            "request_id": format!("{}-{}", random_hex(8), random_hex(12)),
        }
    })
}

fn search_id() -> String {
    random_hex(SEARCH_ID_LEN)
}
