use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use customerio_client::{CustomerIoClient, DEFAULT_TIMEOUT, DEFAULT_TRACK_URL};
use tracing::info;

/// Customer.io credentials and transport settings, loaded from the environment.
#[derive(Clone)]
pub struct Config {
    pub site_id: String,
    pub api_key: String,
    pub track_url: String,
    pub timeout: Duration,
}

impl Config {
    /// Reads `CUSTOMERIO_SITE_ID`, `CUSTOMERIO_API_KEY`, and optionally
    /// `CUSTOMERIO_TRACK_URL` and `CUSTOMERIO_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("{key} environment variable is required"))
        };

        let timeout = match lookup("CUSTOMERIO_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("CUSTOMERIO_TIMEOUT_SECS must be a number, got {raw:?}"))?,
            ),
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            site_id: required("CUSTOMERIO_SITE_ID")?,
            api_key: required("CUSTOMERIO_API_KEY")?,
            track_url: lookup("CUSTOMERIO_TRACK_URL").unwrap_or_else(|| DEFAULT_TRACK_URL.to_string()),
            timeout,
        })
    }

    pub fn client(&self) -> Result<CustomerIoClient> {
        let client = CustomerIoClient::new(&self.site_id, &self.api_key)
            .and_then(|c| c.with_base_url(&self.track_url))
            .and_then(|c| c.with_timeout(self.timeout))
            .context("Failed to build Customer.io client")?;
        Ok(client)
    }

    pub fn log_redacted(&self) {
        info!(
            site_id = %self.site_id,
            api_key = %redact(&self.api_key),
            track_url = %self.track_url,
            timeout_secs = self.timeout.as_secs(),
            "Customer.io config loaded"
        );
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("site_id", &self.site_id)
            .field("api_key", &redact(&self.api_key))
            .field("track_url", &self.track_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn redact(secret: &str) -> String {
    let len = secret.chars().count();
    if len <= 8 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(len - 4).collect();
    format!("****{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_vars_missing() {
        let config = Config::from_vars(vars(&[
            ("CUSTOMERIO_SITE_ID", "site"),
            ("CUSTOMERIO_API_KEY", "key"),
        ]))
        .unwrap();

        assert_eq!(config.track_url, DEFAULT_TRACK_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn missing_api_key_is_reported_by_name() {
        let err = Config::from_vars(vars(&[("CUSTOMERIO_SITE_ID", "site")])).unwrap_err();
        assert!(err.to_string().contains("CUSTOMERIO_API_KEY"));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = Config::from_vars(vars(&[
            ("CUSTOMERIO_SITE_ID", "site"),
            ("CUSTOMERIO_API_KEY", "key"),
            ("CUSTOMERIO_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("CUSTOMERIO_TIMEOUT_SECS"));
    }

    #[test]
    fn client_uses_configured_track_url() {
        let config = Config::from_vars(vars(&[
            ("CUSTOMERIO_SITE_ID", "site"),
            ("CUSTOMERIO_API_KEY", "key"),
            ("CUSTOMERIO_TRACK_URL", "https://track-eu.customer.io/api/v1"),
        ]))
        .unwrap();

        let client = config.client().unwrap();
        assert_eq!(client.base_url(), "https://track-eu.customer.io/api/v1");
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = Config::from_vars(vars(&[
            ("CUSTOMERIO_SITE_ID", "site"),
            ("CUSTOMERIO_API_KEY", "abcdefghijkl1234"),
        ]))
        .unwrap();

        let rendered = format!("{config:?}");
        assert!(rendered.contains("****1234"));
        assert!(!rendered.contains("abcdefghijkl"));
    }
}
