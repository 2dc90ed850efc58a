//! HTTP transport used by the Statuspage services.
//!
//! Services never talk to `reqwest` directly. They describe a request as a
//! method, a path relative to the configured API URL and an optional JSON body,
//! and hand it to an [`HttpTransport`]. The transport owns the base URL, the
//! authorization header and the connection lifecycle, and reports back the
//! status code and raw body of every completed exchange.

use crate::config::StatusPageConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub use reqwest::{Method, StatusCode};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

const USER_AGENT: &str = concat!("statuspage-rust/", env!("CARGO_PKG_VERSION"));

/// HTTP client configuration for [`ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection establishment timeout
    pub connect_timeout: Duration,

    /// Enable response compression
    pub enable_compression: bool,

    /// Override for the `User-Agent` header
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT),
            enable_compression: true,
            user_agent: None,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }

    /// Override the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A request described relative to the configured API URL.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    /// HTTP method
    pub method: Method,
    /// Path relative to the API URL, including any query string
    pub path: String,
    /// Optional JSON payload
    pub body: Option<serde_json::Value>,
}

impl TransportRequest {
    /// Build a body-less request.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    /// Build a `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Build a request carrying `body` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be represented as JSON.
    pub fn with_json<B>(method: Method, path: impl Into<String>, body: &B) -> Result<Self>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body)
            .map_err(|err| Error::InvalidRequest(format!("Failed to encode request body: {err}")))?;

        Ok(Self {
            method,
            path: path.into(),
            body: Some(body),
        })
    }
}

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response body text
    pub body: String,
}

impl TransportResponse {
    /// Create a response.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Turn a non-success status into [`Error::UnexpectedStatus`].
    ///
    /// # Errors
    ///
    /// Returns an error carrying `context`, the status code and the raw body.
    pub fn error_for_status(self, context: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::unexpected_status(context, self.status.as_u16(), self.body))
        }
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] naming `what` when the body does not match `T`.
    pub fn parse_json<T>(&self, what: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(&self.body)
            .map_err(|err| Error::ParseError(format!("{what}: {err}")))
    }
}

/// Transport collaborator consumed by the services.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform one HTTP exchange.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received (connection
    /// failure, timeout, invalid path). Non-success statuses are returned as
    /// ordinary responses.
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse>;
}

/// [`HttpTransport`] backed by [`reqwest`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Build a transport from the page configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &StatusPageConfig) -> Result<Self> {
        Self::with_client_config(config, ClientConfig::new().with_timeout(config.timeout()))
    }

    /// Build a transport with explicit HTTP client settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn with_client_config(config: &StatusPageConfig, http_config: ClientConfig) -> Result<Self> {
        config.check()?;
        let base_url = config.parse_api_url()?;

        let mut auth = HeaderValue::from_str(&format!("OAuth {}", config.api_key())).map_err(
            |_| Error::ConfigError("API key contains characters not allowed in a header".into()),
        )?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let user_agent = http_config.user_agent.as_deref().unwrap_or(USER_AGENT);

        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(http_config.timeout)
            .connect_timeout(http_config.connect_timeout)
            .gzip(http_config.enable_compression)
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self { http, base_url })
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid Statuspage path `{path}`: {err}")))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let url = self.build_url(&request.path)?;
        debug!(method = %request.method, path = %request.path, "Sending Statuspage request");

        let mut builder = self.http.request(request.method, url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(status = status.as_u16(), "Statuspage response received");
        Ok(TransportResponse { status, body })
    }
}
