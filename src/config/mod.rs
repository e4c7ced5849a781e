//! Runtime settings for the signer, dispatcher and CLI
//!
//! Values are merged in rising precedence: struct defaults, the TOML file,
//! `.env`, then process environment. A file is optional; a missing one only
//! logs a warning.
//!
//! ```no_run
//! use dyfetch::config::Config;
//!
//! let config = Config::load().expect("config");
//! assert!(config.client.max_retries >= 1);
//! ```
//!
//! Environment keys take the form `DYFETCH__<SECTION>__<KEY>`, for example
//! `DYFETCH__CLIENT__REQUEST_TIMEOUT=10s` or
//! `DYFETCH__ENDPOINTS__WEB_API=http://127.0.0.1:9000/aweme/v1/web`.
//! `DOUYIN_COOKIE` and `DOUYIN_USER_AGENT` are applied last.
//!
//! The file is `config/dyfetch.toml` unless `DYFETCH_CONFIG` or `--config`
//! names another.

mod models;
mod sources;
mod validation;

pub use crate::humanize::HumanDuration;
pub use models::{ClientConfig, Config, DEFAULT_USER_AGENT, EndpointsConfig, LoggingConfig};
pub use validation::ValidationError;

use thiserror::Error;

const REDACTED: &str = "<redacted>";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

impl Config {
    /// Merge every source and validate the result.
    ///
    /// Fails on an unparsable file or on values the dispatcher cannot use
    /// (empty user agent, zero attempts, non-http endpoint bases).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_file(None)
    }

    /// Same as [`Config::load`], reading `path` instead of the default file.
    pub fn load_with_file(path: Option<std::path::PathBuf>) -> Result<Self, ConfigError> {
        let config = sources::load(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// `path` plus `DYFETCH__*` variables only; `.env` and the `DOUYIN_*`
    /// variables are not consulted.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        let config = sources::load_from_sources(path)?;
        validation::validate(&config)?;
        Ok(config)
    }

    /// Copy safe to print: the cookie is masked when set.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.client.cookie.is_empty() {
            copy.client.cookie = REDACTED.to_string();
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_config(contents: &str) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dyfetch.toml");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_minimal_config() {
        let (_dir, path) = write_config(
            r#"
[client]
max_retries = 2
        "#,
        );

        let config = Config::load_from_path(path).unwrap();
        assert_eq!(config.client.max_retries, 2);
        assert_eq!(config.client.request_timeout.as_duration(), Duration::from_secs(30));
    }

    #[test]
    fn test_validation_catches_zero_attempts() {
        let (_dir, path) = write_config(
            r#"
[client]
max_retries = 0
        "#,
        );

        assert!(matches!(
            Config::load_from_path(path),
            Err(ConfigError::ValidationError(ValidationError::ZeroAttempts))
        ));
    }

    #[test]
    fn test_malformed_file_is_load_error() {
        let (_dir, path) = write_config("[client\nmax_retries = ");

        let result = Config::load_from_path(path);
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_full_config_example() {
        let (_dir, path) = write_config(
            r#"
[client]
user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)"
cookie = "ttwid=abc; sessionid=xyz"
request_timeout = "15s"
max_retries = 5
retry_delay = "2s"

[endpoints]
web_api = "http://127.0.0.1:9000/aweme/v1/web"
live_api = "http://127.0.0.1:9000/webcast"
referer = "http://127.0.0.1:9000/"

[fingerprint]
browser_version = "131.0.0.0"
os_name = "Mac OS"

[logging]
level = "dyfetch=debug"
        "#,
        );

        let config = Config::load_from_path(path).unwrap();

        assert_eq!(config.client.max_retries, 5);
        assert_eq!(config.client.retry_delay.as_duration(), Duration::from_secs(2));
        assert_eq!(config.endpoints.live_api, "http://127.0.0.1:9000/webcast");
        assert_eq!(config.fingerprint.len(), 2);
        assert_eq!(config.logging.level, "dyfetch=debug");

        let redacted = config.redacted();
        assert_eq!(redacted.client.cookie, "<redacted>");
        assert_eq!(redacted.client.user_agent, config.client.user_agent);
    }

    #[test]
    fn test_redacted_leaves_empty_cookie() {
        let config = Config::default();
        assert!(config.redacted().client.cookie.is_empty());
    }
}
