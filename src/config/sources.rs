use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "DYFETCH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/dyfetch.toml";
const ENV_PREFIX: &str = "DYFETCH";
const ENV_SEPARATOR: &str = "__";
const COOKIE_ENV_VAR: &str = "DOUYIN_COOKIE";
const USER_AGENT_ENV_VAR: &str = "DOUYIN_USER_AGENT";

/// Full load: `.env` is merged into the process environment first, then the
/// file and `DYFETCH__*` variables, then the session secrets.
///
/// `config_path` wins over `DYFETCH_CONFIG`, which wins over the default.
pub fn load(config_path: Option<PathBuf>) -> Result<Config, ConfigError> {
    // A missing .env is normal
    let _ = dotenvy::dotenv();

    let config_path = config_path.unwrap_or_else(|| {
        env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    });

    let mut config = load_from_sources(config_path)?;

    load_secrets(&mut config);

    Ok(config)
}

/// Session credentials live in the environment, not in TOML files
fn load_secrets(config: &mut Config) {
    if let Ok(cookie) = env::var(COOKIE_ENV_VAR) {
        config.client.cookie = cookie;
    }
    if let Ok(user_agent) = env::var(USER_AGENT_ENV_VAR) {
        if !user_agent.trim().is_empty() {
            config.client.user_agent = user_agent;
        }
    }
}

/// File at `config_path` (optional) layered under `DYFETCH__*` variables.
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!(path = %config_path.display(), "Reading config file");
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            path = %config_path.display(),
            "Config file not found, using defaults and environment"
        );
    }

    // DYFETCH__CLIENT__MAX_RETRIES -> client.max_retries
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
