use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::value::ValueExt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub uid: Option<String>,
    pub nickname: Option<String>,
}

/// Flat view of one comment or reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub cid: Option<String>,
    pub content: Option<String>,
    pub digg_count: u64,
    pub reply_count: u64,
    pub user: CommentAuthor,
    pub create_time: Option<i64>,
    pub ip_label: Option<String>,
}

impl CommentRecord {
    pub fn from_value(item: &Value) -> Self {
        let user = item.field("user");

        Self {
            cid: item.text("cid"),
            content: item.text("text"),
            digg_count: item.count("digg_count"),
            reply_count: item.count("reply_comment_total"),
            user: CommentAuthor {
                uid: user.text("uid"),
                nickname: user.text("nickname"),
            },
            create_time: item.int("create_time"),
            ip_label: item.text("ip_label"),
        }
    }
}
