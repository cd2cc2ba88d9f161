// src/model/note.rs
//! `NoteSummary`: one note detail item reduced to the fields worth exporting.

use crate::constants::WEB_BASE_URL;
use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Title used when a note has none.
pub const UNTITLED: &str = "无标题";

const UNKNOWN_LOCATION: &str = "未知";
const VIDEO_HOST: &str = "https://sns-video-bd.xhscdn.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteKind {
    #[serde(rename = "图集")]
    Album,
    #[serde(rename = "视频")]
    Video,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteSummary {
    pub note_id: String,
    pub note_url: String,
    pub note_type: NoteKind,
    pub user_id: String,
    pub home_url: String,
    pub nickname: String,
    pub avatar: String,
    pub title: String,
    pub desc: String,
    /// Counts are kept as the platform sends them; large ones arrive as "1.2万".
    pub liked_count: Value,
    pub collected_count: Value,
    pub comment_count: Value,
    pub share_count: Value,
    pub video_cover: String,
    pub video_addr: String,
    pub image_list: Vec<String>,
    pub tags: Vec<String>,
    pub upload_time: String,
    pub ip_location: String,
}

impl NoteSummary {
    /// Builds a summary from one `data.items[]` entry of a note detail reply.
    pub fn from_item(item: &Value, note_url: &str) -> Self {
        let card = &item["note_card"];
        let user = &card["user"];
        let interact = &card["interact_info"];

        let note_type = if card["type"].as_str() == Some("normal") {
            NoteKind::Album
        } else {
            NoteKind::Video
        };

        let image_list: Vec<String> = card["image_list"]
            .as_array()
            .map(|images| images.iter().filter_map(pick_image_url).collect())
            .unwrap_or_default();

        let (video_cover, video_addr) = match note_type {
            NoteKind::Video => (
                image_list.first().cloned().unwrap_or_default(),
                pick_video_url(card),
            ),
            NoteKind::Album => (String::new(), String::new()),
        };

        let user_id = str_field(user, "user_id");
        let title = str_field(card, "title");
        let title = match title.trim() {
            "" => UNTITLED.to_string(),
            trimmed => trimmed.to_string(),
        };

        let tags = card["tag_list"]
            .as_array()
            .map(|tags| {
                tags.iter()
                    .filter_map(|tag| tag["name"].as_str())
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let upload_time = card["time"]
            .as_i64()
            .filter(|millis| *millis != 0)
            .map(format_upload_time)
            .unwrap_or_default();

        let ip_location = card["ip_location"]
            .as_str()
            .unwrap_or(UNKNOWN_LOCATION)
            .to_string();

        Self {
            note_id: str_field(item, "id"),
            note_url: note_url.to_string(),
            note_type,
            home_url: format!("{}/user/profile/{}", WEB_BASE_URL, user_id),
            user_id,
            nickname: str_field(user, "nickname"),
            avatar: str_field(user, "avatar"),
            title,
            desc: str_field(card, "desc"),
            liked_count: count(interact, "liked_count"),
            collected_count: count(interact, "collected_count"),
            comment_count: count(interact, "comment_count"),
            share_count: count(interact, "share_count"),
            video_cover,
            video_addr,
            image_list,
            tags,
            upload_time,
            ip_location,
        }
    }
}

/// Local-time rendering of a millisecond timestamp.
pub fn format_upload_time(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

fn str_field(value: &Value, key: &str) -> String {
    value[key].as_str().unwrap_or_default().to_string()
}

fn count(interact: &Value, key: &str) -> Value {
    match &interact[key] {
        Value::Null => Value::from(0),
        other => other.clone(),
    }
}

/// Prefers the second rendition (no watermark), then the first.
fn pick_image_url(image: &Value) -> Option<String> {
    let infos = image["info_list"].as_array()?;
    [infos.get(1), infos.first()]
        .into_iter()
        .flatten()
        .filter_map(|info| info["url"].as_str())
        .find(|url| !url.is_empty())
        .map(str::to_string)
}

fn pick_video_url(card: &Value) -> String {
    let video = &card["video"];
    let stream = &video["media"]["stream"]["h264"][0];
    if let Some(url) = ["master_url", "url"]
        .iter()
        .filter_map(|key| stream[*key].as_str())
        .find(|url| !url.is_empty())
    {
        return url.to_string();
    }

    match video["consumer"]["origin_video_key"].as_str() {
        Some(key) if !key.is_empty() => format!("{}/{}", VIDEO_HOST, key),
        _ => String::new(),
    }
}
