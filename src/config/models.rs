use crate::humanize::HumanDuration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// Overrides for the built-in browser fingerprint fields
    #[serde(default)]
    pub fingerprint: BTreeMap<String, String>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Session cookie string (prefer the `DOUYIN_COOKIE` environment variable)
    #[serde(default)]
    pub cookie: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: HumanDuration,
    /// Total attempts per logical call, including the first one
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base of the linear backoff (`retry_delay * attempt`)
    #[serde(default = "default_retry_delay")]
    pub retry_delay: HumanDuration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            cookie: String::new(),
            request_timeout: default_request_timeout(),
            max_retries: default_max_retries(),
            retry_delay: default_retry_delay(),
        }
    }
}

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_request_timeout() -> HumanDuration {
    HumanDuration::from_secs(30)
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> HumanDuration {
    HumanDuration::from_secs(1)
}

/// Remote API base URLs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_web_api")]
    pub web_api: String,
    #[serde(default = "default_live_api")]
    pub live_api: String,
    #[serde(default = "default_referer")]
    pub referer: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            web_api: default_web_api(),
            live_api: default_live_api(),
            referer: default_referer(),
        }
    }
}

fn default_web_api() -> String {
    "https://www.douyin.com/aweme/v1/web".to_string()
}

fn default_live_api() -> String {
    "https://live.douyin.com/webcast".to_string()
}

fn default_referer() -> String {
    "https://www.douyin.com/".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.client.user_agent, DEFAULT_USER_AGENT);
        assert!(config.client.cookie.is_empty());
        assert_eq!(config.client.request_timeout.as_duration(), Duration::from_secs(30));
        assert_eq!(config.client.max_retries, 3);
        assert_eq!(config.client.retry_delay.as_duration(), Duration::from_secs(1));
        assert_eq!(config.endpoints.web_api, "https://www.douyin.com/aweme/v1/web");
        assert!(config.fingerprint.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
[client]
max_retries = 5
retry_delay = "250ms"
            "#,
        )
        .unwrap();

        assert_eq!(config.client.max_retries, 5);
        assert_eq!(config.client.retry_delay.as_duration(), Duration::from_millis(250));
        assert_eq!(config.client.request_timeout.as_duration(), Duration::from_secs(30));
        assert_eq!(config.endpoints.referer, "https://www.douyin.com/");
    }
}
