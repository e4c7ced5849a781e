use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use super::timestamp_to_datetime;
use super::value::ValueExt;

/// Flat view of one video (`aweme`) item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub aweme_id: Option<String>,
    pub desc: Option<String>,
    pub video_url: Option<String>,
    pub cover_url: Option<String>,
    pub music_url: Option<String>,
    /// Milliseconds
    pub duration: u64,
    pub play_count: u64,
    pub digg_count: u64,
    pub comment_count: u64,
    pub share_count: u64,
    pub collect_count: u64,
    /// Unix seconds as reported by the remote
    pub create_time: Option<i64>,
}

impl VideoRecord {
    pub fn from_value(item: &Value) -> Self {
        let video = item.field("video");
        let statistics = item.field("statistics");

        // An empty `cover` object counts as missing.
        let cover = match video.field("cover") {
            cover if cover.is_truthy() => cover,
            _ => video.field("origin_cover"),
        };

        Self {
            aweme_id: item.text("aweme_id"),
            desc: item.text("desc"),
            video_url: video.field("play_addr").first_url(),
            cover_url: cover.first_url(),
            music_url: item.field("music").field("play_url").first_url(),
            duration: video.count("duration"),
            play_count: statistics.count("play_count"),
            digg_count: statistics.count("digg_count"),
            comment_count: statistics.count("comment_count"),
            share_count: statistics.count("share_count"),
            collect_count: statistics.count("collect_count"),
            create_time: item.int("create_time"),
        }
    }

    pub fn created_at(&self) -> Option<OffsetDateTime> {
        self.create_time.and_then(timestamp_to_datetime)
    }
}
