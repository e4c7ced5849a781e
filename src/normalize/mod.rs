//! Response normalization
//!
//! Turns raw decoded responses into flat records. Extraction never fails:
//! absent substructures read as empty, counters default to 0 and URLs to
//! `None`.

mod comment;
mod live;
mod page;
mod user;
mod value;
mod video;

pub use comment::{CommentAuthor, CommentRecord};
pub use live::LiveRecord;
pub use page::{
    CommentPage, CursorKey, HotList, ItemPage, RankingPage, UserPage, VideoPage, word_list,
};
pub use user::{UserRecord, UserSummary};
pub use value::ValueExt;
pub use video::VideoRecord;

use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

/// Timestamps above this are taken to be milliseconds.
const MILLIS_THRESHOLD: i64 = 10_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Video,
    User,
    Comment,
    Live,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CanonicalRecord {
    Video(VideoRecord),
    User(UserRecord),
    Comment(CommentRecord),
    Live(LiveRecord),
}

/// Flatten one entity object of the given kind.
///
/// `Live` expects the `room` object itself.
pub fn normalize(kind: RecordKind, value: &Value) -> CanonicalRecord {
    match kind {
        RecordKind::Video => CanonicalRecord::Video(VideoRecord::from_value(value)),
        RecordKind::User => CanonicalRecord::User(UserRecord::from_value(value)),
        RecordKind::Comment => CanonicalRecord::Comment(CommentRecord::from_value(value)),
        RecordKind::Live => CanonicalRecord::Live(LiveRecord::from_room(value)),
    }
}

/// Unix seconds or milliseconds to a UTC datetime.
pub fn timestamp_to_datetime(ts: i64) -> Option<OffsetDateTime> {
    if ts > MILLIS_THRESHOLD {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(ts) * 1_000_000).ok()
    } else {
        OffsetDateTime::from_unix_timestamp(ts).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn test_normalize_dispatches_on_kind() {
        let video = normalize(RecordKind::Video, &json!({"aweme_id": "1"}));
        assert!(matches!(video, CanonicalRecord::Video(ref v) if v.aweme_id.as_deref() == Some("1")));

        let live = normalize(RecordKind::Live, &json!({"title": "t"}));
        assert!(matches!(live, CanonicalRecord::Live(ref l) if l.title.as_deref() == Some("t")));

        let rendered = serde_json::to_value(normalize(RecordKind::Comment, &json!({}))).unwrap();
        assert_eq!(rendered["kind"], "comment");
    }

    #[test]
    fn test_normalize_tolerates_non_objects() {
        for value in [Value::Null, json!([]), json!("x"), json!(3)] {
            normalize(RecordKind::Video, &value);
            normalize(RecordKind::User, &value);
            normalize(RecordKind::Comment, &value);
            normalize(RecordKind::Live, &value);
        }
    }

    #[test]
    fn test_timestamp_seconds_and_millis() {
        assert_eq!(
            timestamp_to_datetime(1_700_000_000),
            Some(datetime!(2023-11-14 22:13:20 UTC))
        );
        assert_eq!(
            timestamp_to_datetime(1_700_000_000_500),
            Some(datetime!(2023-11-14 22:13:20.5 UTC))
        );
    }
}
