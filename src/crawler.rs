//! Caller-facing operations
//!
//! Each method issues one logical call and flattens the response. Every
//! outcome other than a signing failure is "value or absence": attempts
//! exhausted, a non-zero `status_code` and an empty body all yield `Ok(None)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::dispatch::RequestDispatcher;
use crate::endpoints::Endpoint;
use crate::error::Result;
use crate::ids;
use crate::normalize::{
    CommentPage, CursorKey, HotList, ItemPage, LiveRecord, RankingPage, UserPage, UserRecord,
    ValueExt, VideoPage, VideoRecord, word_list,
};
use crate::params::ParameterSet;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_RANKING_SIZE: u32 = 50;

/// Hot boards served by the hot-search endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HotBoard {
    HotSearch,
    HotVideo,
}

impl HotBoard {
    pub fn as_str(&self) -> &'static str {
        match self {
            HotBoard::HotSearch => "hot_search",
            HotBoard::HotVideo => "hot_video",
        }
    }

    fn endpoint(&self) -> Endpoint {
        match self {
            HotBoard::HotSearch => Endpoint::HotSearch,
            HotBoard::HotVideo => Endpoint::HotVideo,
        }
    }
}

impl fmt::Display for HotBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any board name other than `hot_search` selects the video board.
impl FromStr for HotBoard {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "hot_search" => HotBoard::HotSearch,
            _ => HotBoard::HotVideo,
        })
    }
}

/// Video search filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// 0 relevance, 1 most liked, 2 newest
    pub sort_type: u32,
    /// 0 any time, otherwise a window in days
    pub publish_time: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DownloadStatus {
    Ready,
    Failed,
}

/// Where to fetch a video's media from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadInfo {
    pub status: DownloadStatus,
    pub aweme_id: String,
    pub video_url: Option<String>,
    pub message: String,
}

pub struct Crawler {
    dispatcher: RequestDispatcher,
}

impl Crawler {
    pub fn new(dispatcher: RequestDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Crawler with the default reqwest transport.
    pub fn from_config(config: &Config) -> Result<Self> {
        let dispatcher = RequestDispatcher::builder().config(config).build()?;
        Ok(Self::new(dispatcher))
    }

    pub fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    /// Body of a successful call whose `status_code` is 0.
    async fn fetch(&self, endpoint: Endpoint, params: ParameterSet) -> Result<Option<Value>> {
        let Some(body) = self.fetch_raw(endpoint, params).await? else {
            return Ok(None);
        };

        match body.int("status_code") {
            Some(0) => Ok(Some(body)),
            status_code => {
                warn!(
                    endpoint = %endpoint,
                    status_code = ?status_code,
                    status_msg = ?body.text("status_msg"),
                    "Remote rejected request"
                );
                Ok(None)
            }
        }
    }

    /// Body of a successful call without the `status_code` check. Empty
    /// bodies still count as absent.
    async fn fetch_raw(&self, endpoint: Endpoint, params: ParameterSet) -> Result<Option<Value>> {
        let body = self.dispatcher.call(endpoint, &params).await?;
        Ok(body.filter(|body| {
            let present = body.is_truthy();
            if !present {
                debug!(endpoint = %endpoint, "Empty response body");
            }
            present
        }))
    }

    // User operations

    pub async fn get_user_profile(&self, sec_uid: &str) -> Result<Option<UserRecord>> {
        let params = ParameterSet::new().with("sec_user_id", sec_uid);
        let body = self.fetch(Endpoint::UserProfile, params).await?;

        Ok(body.map(|body| UserRecord {
            sec_uid: Some(sec_uid.to_string()),
            ..UserRecord::from_value(body.field("user"))
        }))
    }

    pub async fn get_user_posts(
        &self,
        sec_uid: &str,
        cursor: i64,
        count: u32,
    ) -> Result<Option<VideoPage>> {
        let params = ParameterSet::new()
            .with("sec_user_id", sec_uid)
            .with("max_cursor", cursor)
            .with("count", count);
        let body = self.fetch(Endpoint::UserPosts, params).await?;

        Ok(body.map(|body| VideoPage::from_aweme_list(&body, CursorKey::MaxCursor)))
    }

    pub async fn get_user_likes(
        &self,
        sec_uid: &str,
        cursor: i64,
        count: u32,
    ) -> Result<Option<VideoPage>> {
        let params = ParameterSet::new()
            .with("sec_user_id", sec_uid)
            .with("max_cursor", cursor)
            .with("count", count);
        let body = self.fetch(Endpoint::UserLikes, params).await?;

        Ok(body.map(|body| VideoPage::from_aweme_list(&body, CursorKey::MaxCursor)))
    }

    pub async fn get_user_following(
        &self,
        sec_uid: &str,
        cursor: i64,
        count: u32,
    ) -> Result<Option<UserPage>> {
        let body = self
            .fetch(Endpoint::UserFollowing, relation_params(sec_uid, cursor, count))
            .await?;

        Ok(body.map(|body| UserPage::from_relation_list(&body, "followings")))
    }

    pub async fn get_user_followers(
        &self,
        sec_uid: &str,
        cursor: i64,
        count: u32,
    ) -> Result<Option<UserPage>> {
        let body = self
            .fetch(Endpoint::UserFollowers, relation_params(sec_uid, cursor, count))
            .await?;

        Ok(body.map(|body| UserPage::from_relation_list(&body, "followers")))
    }

    pub async fn get_user_mixes(
        &self,
        sec_uid: &str,
        cursor: i64,
        count: u32,
    ) -> Result<Option<ItemPage>> {
        let params = ParameterSet::new()
            .with("sec_user_id", sec_uid)
            .with("cursor", cursor)
            .with("count", count);
        let body = self.fetch(Endpoint::UserMixes, params).await?;

        Ok(body.map(|body| ItemPage::from_value(&body, "mix_infos")))
    }

    // Video operations

    pub async fn get_video_detail(&self, aweme_id: &str) -> Result<Option<VideoRecord>> {
        let params = ParameterSet::new().with("aweme_id", aweme_id);
        let body = self.fetch(Endpoint::VideoDetail, params).await?;

        Ok(body.map(|body| VideoRecord::from_value(body.field("aweme_detail"))))
    }

    pub async fn get_video_comments(
        &self,
        aweme_id: &str,
        cursor: i64,
        count: u32,
    ) -> Result<Option<CommentPage>> {
        let params = ParameterSet::new()
            .with("aweme_id", aweme_id)
            .with("cursor", cursor)
            .with("count", count);
        let body = self.fetch(Endpoint::VideoComments, params).await?;

        Ok(body.as_ref().map(CommentPage::from_value))
    }

    pub async fn get_comment_replies(
        &self,
        comment_id: &str,
        cursor: i64,
        count: u32,
    ) -> Result<Option<CommentPage>> {
        let params = ParameterSet::new()
            .with("comment_id", comment_id)
            .with("cursor", cursor)
            .with("count", count);
        let body = self.fetch(Endpoint::CommentReplies, params).await?;

        Ok(body.as_ref().map(CommentPage::from_value))
    }

    pub async fn get_related_videos(
        &self,
        aweme_id: &str,
        count: u32,
    ) -> Result<Option<Vec<VideoRecord>>> {
        let params = ParameterSet::new()
            .with("aweme_id", aweme_id)
            .with("count", count);
        let body = self.fetch(Endpoint::RelatedVideos, params).await?;

        Ok(body.map(|body| VideoPage::from_aweme_list(&body, CursorKey::Cursor).videos))
    }

    /// Videos of one mix, served by the mix list endpoint keyed on `mix_id`.
    pub async fn get_mix_videos(
        &self,
        mix_id: &str,
        cursor: i64,
        count: u32,
    ) -> Result<Option<VideoPage>> {
        let params = ParameterSet::new()
            .with("mix_id", mix_id)
            .with("cursor", cursor)
            .with("count", count);
        let body = self.fetch(Endpoint::UserMixes, params).await?;

        Ok(body.map(|body| VideoPage::from_aweme_list(&body, CursorKey::Cursor)))
    }

    /// Resolve a share URL to its video. URLs without an aweme id are absent
    /// without any remote call.
    pub async fn parse_video_url(&self, url: &str) -> Result<Option<VideoRecord>> {
        match ids::extract_aweme_id(url) {
            Some(aweme_id) => self.get_video_detail(aweme_id).await,
            None => {
                debug!(url, "No aweme id in URL");
                Ok(None)
            }
        }
    }

    pub async fn download_info(&self, aweme_id: &str) -> Result<DownloadInfo> {
        let video_url = self
            .get_video_detail(aweme_id)
            .await?
            .and_then(|video| video.video_url);

        Ok(match video_url {
            Some(url) => DownloadInfo {
                status: DownloadStatus::Ready,
                aweme_id: aweme_id.to_string(),
                video_url: Some(url),
                message: "Video URL retrieved".to_string(),
            },
            None => DownloadInfo {
                status: DownloadStatus::Failed,
                aweme_id: aweme_id.to_string(),
                video_url: None,
                message: "Could not get video URL".to_string(),
            },
        })
    }

    // Live operations

    pub async fn get_live_info(&self, room_id: &str) -> Result<Option<LiveRecord>> {
        let params = ParameterSet::new()
            .with("web_rid", room_id)
            .with("room_id_str", room_id);
        let body = self.fetch(Endpoint::LiveRoom, params).await?;

        Ok(body.map(|body| LiveRecord {
            room_id: Some(room_id.to_string()),
            ..LiveRecord::from_response(&body)
        }))
    }

    /// The ranking endpoint reports no `status_code`; any decoded body counts.
    pub async fn get_live_ranking(&self, count: u32) -> Result<Option<RankingPage>> {
        let params = ParameterSet::new().with("count", count);
        let body = self.fetch_raw(Endpoint::LiveRanking, params).await?;

        Ok(body.as_ref().map(RankingPage::from_value))
    }

    // Search operations

    pub async fn search_video(
        &self,
        keyword: &str,
        cursor: i64,
        count: u32,
        filters: SearchFilters,
    ) -> Result<Option<VideoPage>> {
        let params = ParameterSet::new()
            .with("keyword", keyword)
            .with("offset", cursor)
            .with("count", count)
            .with("sort_type", filters.sort_type)
            .with("publish_time", filters.publish_time)
            .with("search_source", "normal_search");
        let body = self.fetch(Endpoint::SearchVideo, params).await?;

        Ok(body.as_ref().map(VideoPage::from_search))
    }

    pub async fn search_user(
        &self,
        keyword: &str,
        cursor: i64,
        count: u32,
    ) -> Result<Option<UserPage>> {
        let params = ParameterSet::new()
            .with("keyword", keyword)
            .with("offset", cursor)
            .with("count", count)
            .with("search_source", "normal_search");
        let body = self.fetch(Endpoint::SearchUser, params).await?;

        Ok(body.as_ref().map(UserPage::from_search))
    }

    pub async fn search_live(
        &self,
        keyword: &str,
        cursor: i64,
        count: u32,
    ) -> Result<Option<ItemPage>> {
        let params = ParameterSet::new()
            .with("keyword", keyword)
            .with("offset", cursor)
            .with("count", count);
        let body = self.fetch(Endpoint::SearchLive, params).await?;

        Ok(body.map(|body| ItemPage::from_value(&body, "data")))
    }

    pub async fn get_search_suggest(&self, keyword: &str) -> Result<Option<Vec<Value>>> {
        let params = ParameterSet::new().with("keyword", keyword);
        let body = self.fetch(Endpoint::SearchSuggest, params).await?;

        Ok(body.map(|body| body.items("sug_list").to_vec()))
    }

    pub async fn get_trending_searches(&self) -> Result<Option<Vec<Value>>> {
        let body = self.fetch(Endpoint::HotSearch, ParameterSet::new()).await?;
        Ok(body.as_ref().map(word_list))
    }

    // Hot lists

    pub async fn get_hot_list(&self, board: HotBoard) -> Result<Option<HotList>> {
        let body = self.fetch(board.endpoint(), ParameterSet::new()).await?;
        Ok(body.map(|body| HotList::from_value(&body, board.as_str())))
    }

    pub async fn get_video_ranking(&self, count: u32) -> Result<Option<RankingPage>> {
        let params = ParameterSet::new().with("count", count);
        let body = self.fetch(Endpoint::HotVideo, params).await?;

        Ok(body.as_ref().map(RankingPage::from_value))
    }
}

fn relation_params(sec_uid: &str, cursor: i64, count: u32) -> ParameterSet {
    ParameterSet::new()
        .with("sec_user_id", sec_uid)
        .with("offset", cursor)
        .with("count", count)
        .with("source_type", "1")
}
