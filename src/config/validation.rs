use super::models::Config;
use axum::http::HeaderName;
use thiserror::Error;

/// Hard ceiling for request bodies; a subscription record is tiny
const MAX_BODY_LIMIT: u64 = 1024 * 1024;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("max_body_bytes must be between 1 and {limit} bytes, got {actual}")]
    InvalidBodyLimit { actual: u64, limit: u64 },

    #[error("request_timeout_secs must be positive")]
    InvalidRequestTimeout,

    #[error("Invalid user id header name '{header}'")]
    InvalidUserIdHeader { header: String },

    #[error("store_path must not be empty")]
    EmptyStorePath,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_server(config)?;
    validate_auth(config)?;
    Ok(())
}

fn validate_server(config: &Config) -> Result<(), ValidationError> {
    let actual = config.server.max_body_bytes.as_u64();
    if actual == 0 || actual > MAX_BODY_LIMIT {
        return Err(ValidationError::InvalidBodyLimit {
            actual,
            limit: MAX_BODY_LIMIT,
        });
    }

    if config.server.request_timeout_secs == 0 {
        return Err(ValidationError::InvalidRequestTimeout);
    }

    if config.server.store_path.as_os_str().is_empty() {
        return Err(ValidationError::EmptyStorePath);
    }

    Ok(())
}

fn validate_auth(config: &Config) -> Result<(), ValidationError> {
    let header = &config.auth.user_id_header;
    if HeaderName::from_bytes(header.as_bytes()).is_err() {
        return Err(ValidationError::InvalidUserIdHeader {
            header: header.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::humanize::ByteSize;
    use std::path::PathBuf;

    #[test]
    fn test_valid_config() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_body_limit() {
        let mut config = Config::default();
        config.server.max_body_bytes = ByteSize(0);

        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidBodyLimit { actual: 0, .. }));
    }

    #[test]
    fn test_body_limit_ceiling() {
        let mut config = Config::default();
        config.server.max_body_bytes = ByteSize(2 * 1024 * 1024);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = Config::default();
        config.server.request_timeout_secs = 0;

        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidRequestTimeout));
    }

    #[test]
    fn test_invalid_header_name() {
        let mut config = Config::default();
        config.auth.user_id_header = "user id".to_string();

        let err = validate(&config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidUserIdHeader { .. }));
    }

    #[test]
    fn test_empty_store_path() {
        let mut config = Config::default();
        config.server.store_path = PathBuf::new();
        assert!(matches!(validate(&config), Err(ValidationError::EmptyStorePath)));
    }
}
