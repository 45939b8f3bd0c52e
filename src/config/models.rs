use crate::humanize::ByteSize;
use crate::subscription::SubscriptionPolicy;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub subscriptions: SubscriptionPolicy,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Directory of the fjall keyspace holding subscriptions
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Upper bound on Add/Delete request bodies
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: ByteSize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            store_path: default_store_path(),
            max_body_bytes: default_max_body_bytes(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data/subscriptions")
}

fn default_max_body_bytes() -> ByteSize {
    ByteSize(64 * 1024) // 64 KB
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Caller identity injection
///
/// The upstream gateway authenticates the caller and forwards the identity in
/// this header; it must strip any client-supplied copy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default = "default_user_id_header")]
    pub user_id_header: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_id_header: default_user_id_header(),
        }
    }
}

fn default_user_id_header() -> String {
    "x-hub-user-id".to_string()
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::DuplicatePolicy;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.server.max_body_bytes.as_u64(), 64 * 1024);
        assert_eq!(config.server.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.auth.user_id_header, "x-hub-user-id");
        assert_eq!(config.subscriptions.duplicate_policy, DuplicatePolicy::Ignore);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn test_parse_toml() {
        let config: Config = toml::from_str(
            r#"
[server]
max_body_bytes = "16KB"

[subscriptions]
duplicate_policy = "reject"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.max_body_bytes.as_u64(), 16 * 1024);
        assert_eq!(config.subscriptions.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(config.server.store_path, PathBuf::from("data/subscriptions"));
    }
}
