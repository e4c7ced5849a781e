use serde::Serialize;
use serde_json::json;
use tracing::warn;

use dyfetch::config::Config;
use dyfetch::crawler::{Crawler, HotBoard, SearchFilters};
use dyfetch::ids;
use dyfetch::signature::XBogus;

use crate::cli::{
    Commands, CommentsArgs, RankingArgs, RankingKind, SearchArgs, SearchKind, SignArgs,
    TrendingArgs, UserArgs, UserView, VideoArgs,
};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Whether the command produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Found,
    Absent,
}

pub async fn run(command: Commands, config: &Config) -> Result<Outcome, AnyError> {
    match command {
        Commands::Sign(args) => sign(args, config),
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config.redacted())?);
            Ok(Outcome::Found)
        }
        command => {
            let crawler = Crawler::from_config(config)?;
            fetch(&crawler, command).await
        }
    }
}

fn sign(args: SignArgs, config: &Config) -> Result<Outcome, AnyError> {
    let user_agent = args
        .user_agent
        .unwrap_or_else(|| config.client.user_agent.clone());
    let signer = XBogus::new(user_agent)?;

    let signed = match args.timestamp {
        Some(ts) => signer.sign_at(&args.query, ts)?,
        None => signer.sign(&args.query)?,
    };

    emit(&json!({"query": signed.query, "token": signed.token}))
}

async fn fetch(crawler: &Crawler, command: Commands) -> Result<Outcome, AnyError> {
    match command {
        Commands::Video(args) => video(crawler, args).await,
        Commands::User(args) => user(crawler, args).await,
        Commands::Comments(args) => comments(crawler, args).await,
        Commands::Live(args) => {
            let Some(room_id) = ids::extract_and_validate_room_id(&args.input) else {
                return unrecognized("room id", &args.input);
            };
            emit_optional(crawler.get_live_info(room_id).await?)
        }
        Commands::Search(args) => search(crawler, args).await,
        Commands::Trending(args) => trending(crawler, args).await,
        Commands::Ranking(args) => ranking(crawler, args).await,
        Commands::Sign(_) | Commands::Config => Ok(Outcome::Absent),
    }
}

async fn video(crawler: &Crawler, args: VideoArgs) -> Result<Outcome, AnyError> {
    let Some(aweme_id) = ids::extract_and_validate_aweme_id(&args.input) else {
        return unrecognized("aweme id", &args.input);
    };

    if args.download {
        emit(&crawler.download_info(aweme_id).await?)
    } else if args.related {
        emit_optional(crawler.get_related_videos(aweme_id, args.count).await?)
    } else {
        emit_optional(crawler.get_video_detail(aweme_id).await?)
    }
}

async fn user(crawler: &Crawler, args: UserArgs) -> Result<Outcome, AnyError> {
    let Some(sec_uid) = ids::extract_and_validate_sec_uid(&args.input) else {
        return unrecognized("sec_uid", &args.input);
    };
    let (cursor, count) = (args.cursor, args.count);

    match args.view {
        UserView::Profile => emit_optional(crawler.get_user_profile(sec_uid).await?),
        UserView::Posts => emit_optional(crawler.get_user_posts(sec_uid, cursor, count).await?),
        UserView::Likes => emit_optional(crawler.get_user_likes(sec_uid, cursor, count).await?),
        UserView::Following => {
            emit_optional(crawler.get_user_following(sec_uid, cursor, count).await?)
        }
        UserView::Followers => {
            emit_optional(crawler.get_user_followers(sec_uid, cursor, count).await?)
        }
        UserView::Mixes => emit_optional(crawler.get_user_mixes(sec_uid, cursor, count).await?),
    }
}

async fn comments(crawler: &Crawler, args: CommentsArgs) -> Result<Outcome, AnyError> {
    if let Some(comment_id) = &args.replies_to {
        return emit_optional(
            crawler
                .get_comment_replies(comment_id, args.cursor, args.count)
                .await?,
        );
    }

    let Some(aweme_id) = ids::extract_and_validate_aweme_id(&args.input) else {
        return unrecognized("aweme id", &args.input);
    };
    emit_optional(
        crawler
            .get_video_comments(aweme_id, args.cursor, args.count)
            .await?,
    )
}

async fn search(crawler: &Crawler, args: SearchArgs) -> Result<Outcome, AnyError> {
    let keyword = ids::sanitize_search_keyword(&args.keyword);
    if keyword.is_empty() {
        return unrecognized("keyword", &args.keyword);
    }
    let (cursor, count) = (args.cursor, args.count);

    match args.kind {
        SearchKind::Video => {
            let filters = SearchFilters {
                sort_type: args.sort_type,
                publish_time: args.publish_time,
            };
            emit_optional(crawler.search_video(&keyword, cursor, count, filters).await?)
        }
        SearchKind::User => emit_optional(crawler.search_user(&keyword, cursor, count).await?),
        SearchKind::Live => emit_optional(crawler.search_live(&keyword, cursor, count).await?),
        SearchKind::Suggest => emit_optional(crawler.get_search_suggest(&keyword).await?),
    }
}

async fn trending(crawler: &Crawler, args: TrendingArgs) -> Result<Outcome, AnyError> {
    match args.board {
        Some(board) => {
            let board: HotBoard = board.parse()?;
            emit_optional(crawler.get_hot_list(board).await?)
        }
        None => emit_optional(crawler.get_trending_searches().await?),
    }
}

async fn ranking(crawler: &Crawler, args: RankingArgs) -> Result<Outcome, AnyError> {
    match args.kind {
        RankingKind::Live => emit_optional(crawler.get_live_ranking(args.count).await?),
        RankingKind::Video => emit_optional(crawler.get_video_ranking(args.count).await?),
    }
}

fn unrecognized(what: &str, input: &str) -> Result<Outcome, AnyError> {
    warn!(input, "Could not find a valid {what} in input");
    Ok(Outcome::Absent)
}

fn emit<T: Serialize>(value: &T) -> Result<Outcome, AnyError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(Outcome::Found)
}

fn emit_optional<T: Serialize>(value: Option<T>) -> Result<Outcome, AnyError> {
    match value {
        Some(value) => emit(&value),
        None => {
            println!("null");
            Ok(Outcome::Absent)
        }
    }
}
