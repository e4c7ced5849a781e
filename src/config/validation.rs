use super::models::Config;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("User agent must not be empty")]
    EmptyUserAgent,

    #[error("User agent must be ISO-8859-1 encodable: {0}")]
    NonLatin1UserAgent(String),

    #[error("max_retries must be at least 1")]
    ZeroAttempts,

    #[error("request_timeout must be positive")]
    ZeroTimeout,

    #[error("Endpoint base '{field}' is not an absolute http(s) URL: {value}")]
    InvalidEndpointBase { field: String, value: String },

    #[error("Fingerprint override '{0}' must not be empty")]
    EmptyFingerprintField(String),
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_client(config)?;
    validate_endpoints(config)?;
    validate_fingerprint(config)?;
    Ok(())
}

fn validate_client(config: &Config) -> Result<(), ValidationError> {
    let user_agent = &config.client.user_agent;
    if user_agent.trim().is_empty() {
        return Err(ValidationError::EmptyUserAgent);
    }
    if user_agent.chars().any(|c| u32::from(c) > 0xff) {
        return Err(ValidationError::NonLatin1UserAgent(user_agent.clone()));
    }

    if config.client.max_retries == 0 {
        return Err(ValidationError::ZeroAttempts);
    }

    if config.client.request_timeout.is_zero() {
        return Err(ValidationError::ZeroTimeout);
    }

    Ok(())
}

/// Ensure API bases are absolute http(s) URLs
fn validate_endpoints(config: &Config) -> Result<(), ValidationError> {
    let bases = [
        ("web_api", &config.endpoints.web_api),
        ("live_api", &config.endpoints.live_api),
        ("referer", &config.endpoints.referer),
    ];

    for (field, value) in bases {
        let valid = Url::parse(value)
            .map(|url| matches!(url.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !valid {
            return Err(ValidationError::InvalidEndpointBase {
                field: field.to_string(),
                value: value.clone(),
            });
        }
    }

    Ok(())
}

fn validate_fingerprint(config: &Config) -> Result<(), ValidationError> {
    for (key, value) in &config.fingerprint {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyFingerprintField(key.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_empty_user_agent() {
        let mut config = Config::default();
        config.client.user_agent = "   ".to_string();

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::EmptyUserAgent)));
    }

    #[test]
    fn test_non_latin1_user_agent() {
        let mut config = Config::default();
        config.client.user_agent = "Mozilla/5.0 抖音".to_string();

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::NonLatin1UserAgent(_))));
    }

    #[test]
    fn test_zero_attempts() {
        let mut config = Config::default();
        config.client.max_retries = 0;

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::ZeroAttempts)));
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = Config::default();
        config.client.request_timeout = crate::humanize::HumanDuration::from_secs(0);

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::ZeroTimeout)));
    }

    #[test]
    fn test_invalid_endpoint_base() {
        let mut config = Config::default();
        config.endpoints.live_api = "ftp://live.douyin.com".to_string();

        let result = validate(&config);
        assert!(matches!(
            result,
            Err(ValidationError::InvalidEndpointBase { ref field, .. }) if field == "live_api"
        ));
    }

    #[test]
    fn test_empty_fingerprint_override() {
        let mut config = Config::default();
        config.fingerprint.insert("aid".to_string(), String::new());

        let result = validate(&config);
        assert!(matches!(result, Err(ValidationError::EmptyFingerprintField(_))));
    }
}
