use anyhow::{Context, Result, bail};
use std::env;
use std::time::Duration;

use crate::shipment::DEFAULT_BASE_URL;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub dhl_api_key: String,
    pub tracking_url: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Environment Variables
    /// - `DHL_API_KEY`: Required - API key sent as `DHL-API-Key`
    /// - `DHL_TRACKING_URL`: Optional - Tracking API base URL (default: "https://api-eu.dhl.com/track")
    /// - `REQUEST_TIMEOUT_SECS`: Optional - HTTP timeout in seconds (default: 30)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Parse API key (required)
        let dhl_api_key = lookup("DHL_API_KEY").context("DHL_API_KEY not set")?;

        if dhl_api_key.trim().is_empty() {
            bail!("DHL_API_KEY cannot be empty");
        }

        // Parse tracking URL (optional, has default)
        let tracking_url = lookup("DHL_TRACKING_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        // Parse request timeout (optional, has default)
        let timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("REQUEST_TIMEOUT_SECS is not a number: {raw}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        if timeout_secs == 0 {
            bail!("REQUEST_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            dhl_api_key,
            tracking_url,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config = load(&[("DHL_API_KEY", "demo-key")]).unwrap();

        assert_eq!(config.dhl_api_key, "demo-key");
        assert_eq!(config.tracking_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            ("DHL_API_KEY", "demo-key"),
            ("DHL_TRACKING_URL", "http://localhost:8080/track"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ])
        .unwrap();

        assert_eq!(config.tracking_url, "http://localhost:8080/track");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_or_blank_key_is_rejected() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("DHL_API_KEY not set"));

        let err = load(&[("DHL_API_KEY", "  ")]).unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        assert!(load(&[("DHL_API_KEY", "k"), ("REQUEST_TIMEOUT_SECS", "soon")]).is_err());
        assert!(load(&[("DHL_API_KEY", "k"), ("REQUEST_TIMEOUT_SECS", "0")]).is_err());
    }
}
