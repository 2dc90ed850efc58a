//! Configuration structures for Statuspage clients.
//!
//! A [`StatusPageConfig`] identifies one status page and the credentials used
//! to manage it. Services receive it explicitly; nothing is read from global
//! state, so several pages or API keys can be used from one process.

use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Public Statuspage API base URL.
pub const DEFAULT_API_URL: &str = "https://api.statuspage.io/v1/";

/// Configuration for a Statuspage client instance.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StatusPageConfig {
    /// API base URL
    #[validate(url)]
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Identifier of the page whose incidents and components are managed
    #[validate(length(min = 1))]
    pub page_id: String,

    /// API key, sent by the transport as an `Authorization: OAuth` header
    pub api_key: SecretString,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

impl StatusPageConfig {
    /// Create a new configuration for the public Statuspage API.
    ///
    /// # Errors
    ///
    /// Returns an error if the page id is empty.
    pub fn new(page_id: impl Into<String>, api_key: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            api_url: default_api_url(),
            page_id: page_id.into(),
            api_key: SecretString::from(api_key.into()),
            request_timeout_secs: default_request_timeout_secs(),
        };

        config.check()?;
        Ok(config)
    }

    /// Point the client at a different API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Result<Self, Error> {
        self.api_url = api_url.into();
        self.check()?;
        Ok(self)
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Run the validation rules, mapping failures to [`Error::ConfigError`].
    ///
    /// # Errors
    ///
    /// Returns an error describing every rule that failed.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Expose the API key for header construction.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Parse the API URL, making sure relative paths join beneath it.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_api_url(&self) -> Result<Url, Error> {
        let mut raw = self.api_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|e| Error::ConfigError(format!("Invalid API URL: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = StatusPageConfig::new("kctbh9vrtdwd", "secret-key").unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.page_id, "kctbh9vrtdwd");
        assert_eq!(config.api_key(), "secret-key");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_config_empty_page_id_rejected() {
        let err = StatusPageConfig::new("", "secret-key").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_config_invalid_url_rejected() {
        let result = StatusPageConfig::new("page", "key")
            .unwrap()
            .with_api_url("not-a-url");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_debug_redacts_api_key() {
        let config = StatusPageConfig::new("page", "super-secret").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_config_timeout() {
        let config = StatusPageConfig::new("page", "key").unwrap().with_timeout(45);
        assert_eq!(config.timeout(), Duration::from_secs(45));
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = StatusPageConfig::new("page", "key").unwrap();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 301;
        assert!(config.validate().is_err());

        config.request_timeout_secs = 30;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_api_url_adds_trailing_slash() {
        let config = StatusPageConfig::new("page", "key")
            .unwrap()
            .with_api_url("https://status.example.com/api/v1")
            .unwrap();
        let url = config.parse_api_url().unwrap();
        assert_eq!(url.as_str(), "https://status.example.com/api/v1/");
        assert_eq!(
            url.join("pages/page/incidents").unwrap().path(),
            "/api/v1/pages/page/incidents"
        );
    }

    #[test]
    fn test_config_deserialization_applies_defaults() {
        let config: StatusPageConfig = serde_json::from_str(
            r#"{"page_id": "kctbh9vrtdwd", "api_key": "from-file"}"#,
        )
        .unwrap();

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.api_key(), "from-file");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.check().is_ok());
    }
}
