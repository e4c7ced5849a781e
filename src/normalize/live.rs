use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::value::ValueExt;

/// Flat view of a live room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveRecord {
    pub room_id: Option<String>,
    pub title: Option<String>,
    pub cover_url: Option<String>,
    /// Not exposed by the room endpoint; always absent.
    pub stream_url: Option<String>,
    /// Viewer count as the display string the remote renders (`"1.2万"`)
    pub user_count: Option<String>,
    pub status: Option<i64>,
}

impl LiveRecord {
    /// Build from a `room` object.
    pub fn from_room(room: &Value) -> Self {
        Self {
            room_id: room.text("id_str"),
            title: room.text("title"),
            cover_url: room.field("cover").first_url(),
            stream_url: None,
            user_count: room.text("user_count_str"),
            status: room.int("status"),
        }
    }

    /// Build from a full room-enter response (`data.room`).
    pub fn from_response(body: &Value) -> Self {
        Self::from_room(body.field("data").field("room"))
    }
}
