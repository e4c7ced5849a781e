//! Registry of remote operations
//!
//! Every operation the crawler issues is named by an [`Endpoint`]. The
//! [`EndpointCatalog`] resolves those names against the configured API bases
//! once at startup; descriptors are immutable afterwards.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::config::EndpointsConfig;

#[derive(Debug, Error)]
#[error("Unknown endpoint: {0}")]
pub struct UnknownEndpoint(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which configured base an endpoint hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Base {
    Web,
    Live,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Endpoint {
    UserProfile,
    UserPosts,
    UserLikes,
    UserFollowing,
    UserFollowers,
    UserMixes,
    VideoDetail,
    VideoComments,
    CommentReplies,
    RelatedVideos,
    LiveRoom,
    LiveRanking,
    SearchVideo,
    SearchUser,
    SearchLive,
    SearchSuggest,
    HotSearch,
    HotVideo,
}

impl Endpoint {
    pub const ALL: [Endpoint; 18] = [
        Endpoint::UserProfile,
        Endpoint::UserPosts,
        Endpoint::UserLikes,
        Endpoint::UserFollowing,
        Endpoint::UserFollowers,
        Endpoint::UserMixes,
        Endpoint::VideoDetail,
        Endpoint::VideoComments,
        Endpoint::CommentReplies,
        Endpoint::RelatedVideos,
        Endpoint::LiveRoom,
        Endpoint::LiveRanking,
        Endpoint::SearchVideo,
        Endpoint::SearchUser,
        Endpoint::SearchLive,
        Endpoint::SearchSuggest,
        Endpoint::HotSearch,
        Endpoint::HotVideo,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::UserProfile => "user_profile",
            Endpoint::UserPosts => "user_posts",
            Endpoint::UserLikes => "user_likes",
            Endpoint::UserFollowing => "user_following",
            Endpoint::UserFollowers => "user_followers",
            Endpoint::UserMixes => "user_mixes",
            Endpoint::VideoDetail => "video_detail",
            Endpoint::VideoComments => "video_comments",
            Endpoint::CommentReplies => "comment_replies",
            Endpoint::RelatedVideos => "related_videos",
            Endpoint::LiveRoom => "live_room",
            Endpoint::LiveRanking => "live_ranking",
            Endpoint::SearchVideo => "search_video",
            Endpoint::SearchUser => "search_user",
            Endpoint::SearchLive => "search_live",
            Endpoint::SearchSuggest => "search_suggest",
            Endpoint::HotSearch => "hot_search",
            Endpoint::HotVideo => "hot_video",
        }
    }

    fn base(&self) -> Base {
        match self {
            Endpoint::LiveRoom | Endpoint::LiveRanking => Base::Live,
            _ => Base::Web,
        }
    }

    /// Path appended to the endpoint's base, always with a trailing slash.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::UserProfile => "/user/profile/other/",
            Endpoint::UserPosts => "/aweme/post/",
            Endpoint::UserLikes => "/aweme/favorite/",
            Endpoint::UserFollowing => "/user/following/list/",
            Endpoint::UserFollowers => "/user/follower/list/",
            Endpoint::UserMixes => "/mix/list/",
            Endpoint::VideoDetail => "/aweme/detail/",
            Endpoint::VideoComments => "/comment/list/",
            Endpoint::CommentReplies => "/comment/list/reply/",
            Endpoint::RelatedVideos => "/aweme/related/",
            Endpoint::LiveRoom => "/room/web/enter/",
            Endpoint::LiveRanking => "/ranklist/hot/",
            Endpoint::SearchVideo => "/general/search/single/",
            Endpoint::SearchUser => "/search/user/",
            Endpoint::SearchLive => "/search/live/",
            Endpoint::SearchSuggest => "/search/suggest/",
            Endpoint::HotSearch => "/hot/search/list/",
            Endpoint::HotVideo => "/hot/search/video/list/",
        }
    }

    pub fn url_template(&self) -> String {
        let base = match self.base() {
            Base::Web => "{web_api}",
            Base::Live => "{live_api}",
        };
        format!("{base}{}", self.path())
    }

    /// The live webcast API is called without an X-Bogus token.
    pub fn requires_signature(&self) -> bool {
        self.base() == Base::Web
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Endpoint {
    type Err = UnknownEndpoint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Endpoint::ALL
            .into_iter()
            .find(|endpoint| endpoint.name() == s)
            .ok_or_else(|| UnknownEndpoint(s.to_string()))
    }
}

/// One resolved remote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub endpoint: Endpoint,
    pub name: &'static str,
    pub url_template: String,
    pub url: String,
    pub verb: Verb,
    pub requires_signature: bool,
}

#[derive(Debug, Clone)]
pub struct EndpointCatalog {
    descriptors: Vec<EndpointDescriptor>,
}

impl EndpointCatalog {
    pub fn new(config: &EndpointsConfig) -> Self {
        let web_api = config.web_api.trim_end_matches('/');
        let live_api = config.live_api.trim_end_matches('/');

        let descriptors = Endpoint::ALL
            .into_iter()
            .map(|endpoint| {
                let base = match endpoint.base() {
                    Base::Web => web_api,
                    Base::Live => live_api,
                };
                EndpointDescriptor {
                    endpoint,
                    name: endpoint.name(),
                    url_template: endpoint.url_template(),
                    url: format!("{base}{}", endpoint.path()),
                    verb: Verb::Get,
                    requires_signature: endpoint.requires_signature(),
                }
            })
            .collect();

        Self { descriptors }
    }

    pub fn get(&self, endpoint: Endpoint) -> &EndpointDescriptor {
        // Descriptors are built from `Endpoint::ALL`, in the same order.
        &self.descriptors[endpoint as usize]
    }

    pub fn by_name(&self, name: &str) -> Result<&EndpointDescriptor, UnknownEndpoint> {
        name.parse::<Endpoint>().map(|endpoint| self.get(endpoint))
    }

    pub fn iter(&self) -> impl Iterator<Item = &EndpointDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for EndpointCatalog {
    fn default() -> Self {
        Self::new(&EndpointsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_urls() {
        let catalog = EndpointCatalog::default();

        assert_eq!(
            catalog.get(Endpoint::VideoDetail).url,
            "https://www.douyin.com/aweme/v1/web/aweme/detail/"
        );
        assert_eq!(
            catalog.get(Endpoint::LiveRoom).url,
            "https://live.douyin.com/webcast/room/web/enter/"
        );
        assert_eq!(
            catalog.get(Endpoint::HotVideo).url,
            "https://www.douyin.com/aweme/v1/web/hot/search/video/list/"
        );
    }

    #[test]
    fn test_descriptor_order_matches_enum() {
        let catalog = EndpointCatalog::default();
        assert_eq!(catalog.len(), Endpoint::ALL.len());
        for endpoint in Endpoint::ALL {
            assert_eq!(catalog.get(endpoint).endpoint, endpoint);
        }
    }

    #[test]
    fn test_only_live_endpoints_are_unsigned() {
        let catalog = EndpointCatalog::default();
        let unsigned: Vec<_> = catalog
            .iter()
            .filter(|d| !d.requires_signature)
            .map(|d| d.name)
            .collect();
        assert_eq!(unsigned, vec!["live_room", "live_ranking"]);
        assert!(catalog.iter().all(|d| d.verb == Verb::Get));
    }

    #[test]
    fn test_custom_bases_trim_trailing_slash() {
        let config = EndpointsConfig {
            web_api: "http://127.0.0.1:9000/web/".to_string(),
            live_api: "http://127.0.0.1:9000/live".to_string(),
            referer: "http://127.0.0.1:9000/".to_string(),
        };
        let catalog = EndpointCatalog::new(&config);

        assert_eq!(
            catalog.get(Endpoint::SearchUser).url,
            "http://127.0.0.1:9000/web/search/user/"
        );
        assert_eq!(
            catalog.get(Endpoint::LiveRanking).url,
            "http://127.0.0.1:9000/live/ranklist/hot/"
        );
        assert_eq!(
            catalog.get(Endpoint::LiveRanking).url_template,
            "{live_api}/ranklist/hot/"
        );
    }

    #[test]
    fn test_lookup_by_name() {
        let catalog = EndpointCatalog::default();
        assert_eq!(
            catalog.by_name("comment_replies").unwrap().endpoint,
            Endpoint::CommentReplies
        );
        assert!(catalog.by_name("user_collections").is_err());
        assert_eq!("hot_search".parse::<Endpoint>().unwrap(), Endpoint::HotSearch);
    }
}
