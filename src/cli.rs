use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use dyfetch::crawler::{DEFAULT_PAGE_SIZE, DEFAULT_RANKING_SIZE};

#[derive(Parser, Debug)]
#[command(name = "dyfetch")]
#[command(about = "Signed Douyin web API client", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $DYFETCH_CONFIG or config/dyfetch.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the X-Bogus token for a query string
    Sign(SignArgs),
    /// Fetch a video by id or share URL
    Video(VideoArgs),
    /// Fetch a user's profile or one of their lists
    User(UserArgs),
    /// List a video's comments, or the replies to one comment
    Comments(CommentsArgs),
    /// Fetch a live room by id or URL
    Live(LiveArgs),
    /// Search videos, users, live rooms or suggestions
    Search(SearchArgs),
    /// Trending searches or a hot board
    Trending(TrendingArgs),
    /// Live or video ranking
    Ranking(RankingArgs),
    /// Print the effective configuration (cookie redacted)
    Config,
}

#[derive(clap::Args, Debug)]
pub struct SignArgs {
    /// URL-encoded query string to sign
    pub query: String,

    /// User agent to sign for (defaults to the configured one)
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Unix seconds to sign at (defaults to now)
    #[arg(long)]
    pub timestamp: Option<i64>,
}

#[derive(clap::Args, Debug)]
pub struct VideoArgs {
    /// Aweme id or video URL
    pub input: String,

    /// Print download info instead of the video record
    #[arg(long)]
    pub download: bool,

    /// Print related videos instead of the video record
    #[arg(long, conflicts_with = "download")]
    pub related: bool,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub count: u32,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserView {
    Profile,
    Posts,
    Likes,
    Following,
    Followers,
    Mixes,
}

#[derive(clap::Args, Debug)]
pub struct UserArgs {
    /// sec_uid or profile URL
    pub input: String,

    #[arg(long, value_enum, default_value_t = UserView::Profile)]
    pub view: UserView,

    #[arg(long, default_value_t = 0)]
    pub cursor: i64,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub count: u32,
}

#[derive(clap::Args, Debug)]
pub struct CommentsArgs {
    /// Aweme id or video URL
    pub input: String,

    /// List replies to this comment instead
    #[arg(long)]
    pub replies_to: Option<String>,

    #[arg(long, default_value_t = 0)]
    pub cursor: i64,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub count: u32,
}

#[derive(clap::Args, Debug)]
pub struct LiveArgs {
    /// Room id or live URL
    pub input: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchKind {
    Video,
    User,
    Live,
    Suggest,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    pub keyword: String,

    #[arg(long, value_enum, default_value_t = SearchKind::Video)]
    pub kind: SearchKind,

    #[arg(long, default_value_t = 0)]
    pub cursor: i64,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub count: u32,

    /// 0 relevance, 1 most liked, 2 newest (video search only)
    #[arg(long, default_value_t = 0)]
    pub sort_type: u32,

    /// Publish window in days, 0 for any (video search only)
    #[arg(long, default_value_t = 0)]
    pub publish_time: u32,
}

#[derive(clap::Args, Debug)]
pub struct TrendingArgs {
    /// Hot board (`hot_search` or `hot_video`); omit for trending keywords
    #[arg(long)]
    pub board: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankingKind {
    Live,
    Video,
}

#[derive(clap::Args, Debug)]
pub struct RankingArgs {
    #[arg(value_enum)]
    pub kind: RankingKind,

    #[arg(long, default_value_t = DEFAULT_RANKING_SIZE)]
    pub count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_user_view() {
        let cli = Cli::parse_from(["dyfetch", "user", "MS4wLjABAAAAx", "--view", "followers"]);
        match cli.command {
            Commands::User(args) => {
                assert_eq!(args.view, UserView::Followers);
                assert_eq!(args.count, DEFAULT_PAGE_SIZE);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_sign_with_global_config() {
        let cli = Cli::parse_from([
            "dyfetch",
            "sign",
            "aweme_id=123",
            "--timestamp",
            "1700000000",
            "--config",
            "custom.toml",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(
            cli.command,
            Commands::Sign(SignArgs { timestamp: Some(1_700_000_000), .. })
        ));
    }
}
