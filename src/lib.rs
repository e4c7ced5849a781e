//! Signed request engine and crawler for the Douyin web API
//!
//! ```rust,ignore
//! use dyfetch::{config::Config, crawler::Crawler};
//!
//! let config = Config::load()?;
//! let crawler = Crawler::from_config(&config)?;
//! if let Some(video) = crawler.get_video_detail("7300000000000000000").await? {
//!     println!("{:?}", video.video_url);
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod dispatch;
pub mod endpoints;
pub mod error;
pub mod humanize;
pub mod ids;
pub mod normalize;
pub mod observability;
pub mod params;
pub mod signature;

pub use error::{Error, Result};
