//! Paginated list shapes

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::comment::CommentRecord;
use super::user::UserSummary;
use super::value::ValueExt;
use super::video::VideoRecord;

/// Where a list response keeps its continuation cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKey {
    /// `max_cursor`, used by a user's posts and likes
    MaxCursor,
    /// `cursor`
    Cursor,
    /// `offset`, used by following/follower lists
    Offset,
}

impl CursorKey {
    fn key(&self) -> &'static str {
        match self {
            CursorKey::MaxCursor => "max_cursor",
            CursorKey::Cursor => "cursor",
            CursorKey::Offset => "offset",
        }
    }

    fn read(&self, body: &Value) -> i64 {
        body.int(self.key()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoPage {
    pub videos: Vec<VideoRecord>,
    pub cursor: i64,
    pub has_more: bool,
}

impl VideoPage {
    /// Videos listed under `aweme_list`.
    pub fn from_aweme_list(body: &Value, cursor: CursorKey) -> Self {
        Self {
            videos: body.items("aweme_list").iter().map(VideoRecord::from_value).collect(),
            cursor: cursor.read(body),
            has_more: body.flag("has_more"),
        }
    }

    /// Search results wrap each video in `data[].aweme_info`; entries without
    /// one (users, topics) are skipped.
    pub fn from_search(body: &Value) -> Self {
        Self {
            videos: body
                .items("data")
                .iter()
                .map(|item| item.field("aweme_info"))
                .filter(|aweme| aweme.is_truthy())
                .map(VideoRecord::from_value)
                .collect(),
            cursor: CursorKey::Cursor.read(body),
            has_more: body.flag("has_more"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPage {
    pub users: Vec<UserSummary>,
    pub cursor: i64,
    pub has_more: bool,
}

impl UserPage {
    /// Following (`followings`) or follower (`followers`) lists.
    pub fn from_relation_list(body: &Value, list_key: &str) -> Self {
        Self {
            users: body.items(list_key).iter().map(UserSummary::from_value).collect(),
            cursor: CursorKey::Offset.read(body),
            has_more: body.flag("has_more"),
        }
    }

    pub fn from_search(body: &Value) -> Self {
        Self {
            users: body
                .items("user_list")
                .iter()
                .map(UserSummary::from_search_item)
                .collect(),
            cursor: CursorKey::Cursor.read(body),
            has_more: body.flag("has_more"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPage {
    pub comments: Vec<CommentRecord>,
    pub cursor: i64,
    pub has_more: bool,
    /// Remote total, or the number of comments on this page when unreported
    pub total: u64,
}

impl CommentPage {
    pub fn from_value(body: &Value) -> Self {
        let comments: Vec<CommentRecord> = body
            .items("comments")
            .iter()
            .map(CommentRecord::from_value)
            .collect();

        let total = match body.field("total") {
            Value::Null => comments.len() as u64,
            _ => body.count("total"),
        };

        Self {
            comments,
            cursor: CursorKey::Cursor.read(body),
            has_more: body.flag("has_more"),
            total,
        }
    }
}

/// Items passed through without flattening (mixes, live search results).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPage {
    pub items: Vec<Value>,
    pub cursor: i64,
    pub has_more: bool,
}

impl ItemPage {
    pub fn from_value(body: &Value, list_key: &str) -> Self {
        Self {
            items: body.items(list_key).to_vec(),
            cursor: CursorKey::Cursor.read(body),
            has_more: body.flag("has_more"),
        }
    }
}

/// Ranked entries under `data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingPage {
    pub items: Vec<Value>,
    pub total: usize,
}

impl RankingPage {
    pub fn from_value(body: &Value) -> Self {
        let items = body.items("data").to_vec();
        Self {
            total: items.len(),
            items,
        }
    }
}

/// Entries of one hot board (`data.word_list`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotList {
    pub board_type: String,
    pub items: Vec<Value>,
}

impl HotList {
    pub fn from_value(body: &Value, board_type: impl Into<String>) -> Self {
        Self {
            board_type: board_type.into(),
            items: word_list(body),
        }
    }
}

/// `data.word_list` of a hot-search response.
pub fn word_list(body: &Value) -> Vec<Value> {
    body.field("data").items("word_list").to_vec()
}
