// ABOUTME: Client configuration: backend origin and HTTP timeouts
// ABOUTME: Loads from environment variables with validated defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

use anyhow::{Context, Result};
use std::time::Duration;
use url::Url;

/// Default backend origin when `PLATEWISE_API_URL` is not set
const DEFAULT_API_URL: &str = "https://api.platewise.app";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the Platewise API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend origin, without a trailing slash
    pub base_url: String,
    /// Overall request timeout
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables and defaults
    ///
    /// # Errors
    ///
    /// Returns an error if `PLATEWISE_TIMEOUT_SECS` is not a number or the
    /// configured base URL is not a valid absolute URL.
    pub fn load() -> Result<Self> {
        let base_url =
            std::env::var("PLATEWISE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout_secs: u64 = std::env::var("PLATEWISE_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .context("PLATEWISE_TIMEOUT_SECS must be a valid number")?;

        let config = Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        config.validate()?;
        Ok(config)
    }

    /// Build a configuration for a specific origin, keeping default timeouts
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid absolute URL.
    pub fn for_origin(base_url: impl Into<String>) -> Result<Self> {
        let config = Self {
            base_url: base_url.into(),
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let parsed = Url::parse(&self.base_url)
            .with_context(|| format!("invalid base URL: {}", self.base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("base URL must use http or https: {}", self.base_url);
        }
        if self.timeout.is_zero() {
            anyhow::bail!("request timeout must be greater than 0");
        }
        Ok(())
    }

    /// Backend origin with any trailing slash removed, for path joining
    #[must_use]
    pub fn origin(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn rejects_malformed_base_url() {
        assert!(ClientConfig::for_origin("not a url").is_err());
        assert!(ClientConfig::for_origin("ftp://example.com").is_err());
    }

    #[test]
    fn origin_strips_trailing_slash() {
        let config = ClientConfig::for_origin("https://api.platewise.app/").unwrap();
        assert_eq!(config.origin(), "https://api.platewise.app");
    }

    #[test]
    #[serial]
    fn load_honors_environment() {
        std::env::set_var("PLATEWISE_API_URL", "http://localhost:4000");
        std::env::set_var("PLATEWISE_TIMEOUT_SECS", "5");

        let config = ClientConfig::load().unwrap();
        assert_eq!(config.base_url, "http://localhost:4000");
        assert_eq!(config.timeout, Duration::from_secs(5));

        std::env::remove_var("PLATEWISE_API_URL");
        std::env::remove_var("PLATEWISE_TIMEOUT_SECS");
    }

    #[test]
    #[serial]
    fn load_rejects_non_numeric_timeout() {
        std::env::set_var("PLATEWISE_TIMEOUT_SECS", "soon");
        assert!(ClientConfig::load().is_err());
        std::env::remove_var("PLATEWISE_TIMEOUT_SECS");
    }
}
