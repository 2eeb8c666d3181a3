//! Remote store configuration, read from the environment.

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

/// Variable naming the store's API base URL.
pub const API_URL_VAR: &str = "SCRIPTWRIGHT_API_URL";

/// Variable naming the request timeout in seconds.
pub const TIMEOUT_SECS_VAR: &str = "SCRIPTWRIGHT_TIMEOUT_SECS";

/// Base URL used when `SCRIPTWRIGHT_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Timeout used when `SCRIPTWRIGHT_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A configuration variable is set but unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The base URL does not parse as an http(s) URL.
    #[error("SCRIPTWRIGHT_API_URL must be an http(s) URL: {0}")]
    InvalidApiUrl(String),

    /// The timeout is not a positive whole number of seconds.
    #[error("SCRIPTWRIGHT_TIMEOUT_SECS must be a positive number of seconds: {0}")]
    InvalidTimeout(String),
}

/// Where the document store lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl RemoteConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, falling back to defaults
    /// for unset variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = match lookup(API_URL_VAR) {
            Some(raw) => parse_base_url(&raw)?,
            None => DEFAULT_API_URL.to_owned(),
        };
        let timeout = match lookup(TIMEOUT_SECS_VAR) {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        Ok(Self { base_url, timeout })
    }

    /// Overrides the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidApiUrl` if `base_url` is not an http(s)
    /// URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }
}

fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(trimmed.to_owned()),
        _ => Err(ConfigError::InvalidApiUrl(raw.to_owned())),
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = RemoteConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, RemoteConfig::default());
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_reads_both_variables() {
        let config = RemoteConfig::from_lookup(lookup(&[
            (API_URL_VAR, "https://stories.example.org/api/"),
            (TIMEOUT_SECS_VAR, "5"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://stories.example.org/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let err = RemoteConfig::from_lookup(lookup(&[(API_URL_VAR, "ftp://stories/api")]))
            .unwrap_err();

        assert_eq!(err, ConfigError::InvalidApiUrl("ftp://stories/api".to_owned()));
    }

    #[test]
    fn test_rejects_unparseable_timeout() {
        for raw in ["soon", "0", "-3"] {
            let err =
                RemoteConfig::from_lookup(lookup(&[(TIMEOUT_SECS_VAR, raw)])).unwrap_err();

            assert_eq!(err, ConfigError::InvalidTimeout(raw.to_owned()));
        }
    }

    #[test]
    fn test_with_base_url_overrides() {
        let config = RemoteConfig::default()
            .with_base_url("http://127.0.0.1:9000/api")
            .unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:9000/api");
        assert!(RemoteConfig::default().with_base_url("not a url").is_err());
    }
}
