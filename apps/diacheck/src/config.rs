//! # Configuration
//!
//! Where the prediction service lives and how long to wait for it.
//!
//! Every setting comes from a command-line flag with an environment variable
//! fallback (`DIACHECK_*`), then a built-in default. There is no config file.

use clap::Args;
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

/// Default prediction service root.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default path of the prediction endpoint.
pub const DEFAULT_PREDICT_PATH: &str = "/api/predict";

/// Default path of the health probe.
pub const DEFAULT_HEALTH_PATH: &str = "/api/health";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("timeout must be at least one second")]
    ZeroTimeout,
}

/// Connection flags shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Root URL of the prediction service
    #[arg(long, global = true, env = "DIACHECK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Path of the prediction endpoint
    #[arg(long, global = true, env = "DIACHECK_PREDICT_PATH", default_value = DEFAULT_PREDICT_PATH)]
    pub predict_path: String,

    /// Path of the health probe
    #[arg(long, global = true, env = "DIACHECK_HEALTH_PATH", default_value = DEFAULT_HEALTH_PATH)]
    pub health_path: String,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "DIACHECK_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

/// Validated application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Service root, without a trailing slash.
    pub base_url: String,
    pub predict_path: String,
    pub health_path: String,
    pub timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            predict_path: DEFAULT_PREDICT_PATH.to_string(),
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// Build the configuration for a service rooted at `base_url`.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            ..Self::default()
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the prediction endpoint.
    pub fn predict_url(&self) -> String {
        join(&self.base_url, &self.predict_path)
    }

    /// Full URL of the health probe.
    pub fn health_url(&self) -> String {
        join(&self.base_url, &self.health_path)
    }
}

impl TryFrom<&ConnectionArgs> for AppConfig {
    type Error = ConfigError;

    fn try_from(args: &ConnectionArgs) -> Result<Self, Self::Error> {
        if args.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(Self {
            base_url: parse_base_url(&args.base_url)?,
            predict_path: args.predict_path.clone(),
            health_path: args.health_path.clone(),
            timeout: Duration::from_secs(args.timeout_secs),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        });
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base, path.trim_start_matches('/'))
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args(base_url: &str, timeout_secs: u64) -> ConnectionArgs {
        ConnectionArgs {
            base_url: base_url.to_string(),
            predict_path: DEFAULT_PREDICT_PATH.to_string(),
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            timeout_secs,
        }
    }

    #[test]
    fn defaults_point_at_local_service() {
        let config = AppConfig::default();
        assert_eq!(config.predict_url(), "http://localhost:5000/api/predict");
        assert_eq!(config.health_url(), "http://localhost:5000/api/health");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn join_handles_slashes() {
        let mut config = AppConfig::for_base_url("http://10.0.0.2:8080/").unwrap();
        config.predict_path = "predict".to_string();
        assert_eq!(config.predict_url(), "http://10.0.0.2:8080/predict");
    }

    #[test]
    fn base_url_with_prefix_is_kept() {
        let config = AppConfig::for_base_url("https://example.org/diabetes").unwrap();
        assert_eq!(
            config.predict_url(),
            "https://example.org/diabetes/api/predict"
        );
    }

    #[test]
    fn rejects_bad_urls_and_zero_timeout() {
        assert!(matches!(
            AppConfig::try_from(&args("not a url", 10)),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            AppConfig::try_from(&args("ftp://example.org", 10)),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            AppConfig::try_from(&args(DEFAULT_BASE_URL, 0)),
            Err(ConfigError::ZeroTimeout)
        ));
    }

    #[test]
    fn args_become_config() {
        let config = AppConfig::try_from(&args("http://127.0.0.1:9000", 3)).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.health_url(), "http://127.0.0.1:9000/api/health");
    }
}
