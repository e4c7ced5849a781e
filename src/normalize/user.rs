use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::value::ValueExt;

/// Flat view of a user profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub sec_uid: Option<String>,
    pub uid: Option<String>,
    pub nickname: Option<String>,
    pub unique_id: Option<String>,
    pub signature: Option<String>,
    pub avatar_url: Option<String>,
    pub follower_count: u64,
    pub following_count: u64,
    pub total_favorited: u64,
    pub aweme_count: u64,
    pub is_verified: bool,
    pub verify_info: Option<String>,
    /// `ip_location` label shown on the profile
    pub region: Option<String>,
}

impl UserRecord {
    pub fn from_value(user: &Value) -> Self {
        let custom_verify = user.field("custom_verify");

        Self {
            sec_uid: user.text("sec_uid"),
            uid: user.text("uid"),
            nickname: user.text("nickname"),
            unique_id: user.text("unique_id"),
            signature: user.text("signature"),
            avatar_url: user.field("avatar_larger").first_url(),
            follower_count: user.count("follower_count"),
            following_count: user.count("following_count"),
            total_favorited: user.count("total_favorited"),
            aweme_count: user.count("aweme_count"),
            is_verified: !custom_verify.is_null(),
            verify_info: user.text("custom_verify"),
            region: user.text("ip_location"),
        }
    }
}

/// Entry of a following/follower list or a user search result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub sec_uid: Option<String>,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    /// Only reported by search results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follower_count: Option<u64>,
}

impl UserSummary {
    pub fn from_value(user: &Value) -> Self {
        Self {
            sec_uid: user.text("sec_uid"),
            nickname: user.text("nickname"),
            avatar_url: user.field("avatar_larger").first_url(),
            follower_count: None,
        }
    }

    /// Search results nest the user under `user_info`.
    pub fn from_search_item(item: &Value) -> Self {
        let user = item.field("user_info");
        Self {
            follower_count: Some(user.count("follower_count")),
            ..Self::from_value(user)
        }
    }
}
