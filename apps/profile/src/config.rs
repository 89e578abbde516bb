use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_DIR: &str = ".resumecraft";

/// Client configuration loaded from environment variables.
/// Every variable is optional and falls back to a local development default.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub request_timeout: Duration,
    pub cache_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let timeout_secs = match std::env::var("RESUMECRAFT_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("RESUMECRAFT_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(ClientConfig {
            api_url: std::env::var("RESUMECRAFT_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            cache_dir: std::env::var("RESUMECRAFT_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CACHE_DIR)),
        })
    }

    /// Same configuration pointed at another backend.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_with_api_url_overrides_only_url() {
        let config = ClientConfig::default().with_api_url("http://10.0.0.2:8080");
        assert_eq!(config.api_url, "http://10.0.0.2:8080");
        assert_eq!(config.cache_dir, PathBuf::from(".resumecraft"));
    }
}
