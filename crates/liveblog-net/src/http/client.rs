//! Shared HTTP client.
//!
//! One [`HttpClient`] serves every request of an embed. It owns the
//! `reqwest` connection pool together with the settings applied to each
//! request: timeouts, redirect limit, user agent and default headers.

use std::sync::Arc;
use std::time::Duration;

use reqwest::redirect::Policy;

use super::request::HttpRequestBuilder;
use crate::error::{NetworkError, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Settings of an [`HttpClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Whole-request timeout; `None` waits forever.
    pub timeout: Option<Duration>,
    /// TCP connect timeout.
    pub connect_timeout: Option<Duration>,
    /// Redirects followed before failing; 0 returns 3xx responses as they are.
    pub max_redirects: usize,
    /// `User-Agent` header value.
    pub user_agent: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT),
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: Some(default_user_agent()),
        }
    }
}

impl HttpClientConfig {
    fn redirect_policy(&self) -> Policy {
        match self.max_redirects {
            0 => Policy::none(),
            max => Policy::limited(max),
        }
    }

    fn apply(&self, mut builder: reqwest::ClientBuilder) -> reqwest::ClientBuilder {
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(ref user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        builder.redirect(self.redirect_policy())
    }
}

fn default_user_agent() -> String {
    format!("liveblog-net/{} (Rust)", env!("CARGO_PKG_VERSION"))
}

/// Builder for an [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
    default_headers: http::HeaderMap,
}

impl HttpClientBuilder {
    /// Builder with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder starting from `config`.
    pub fn from_config(config: HttpClientConfig) -> Self {
        Self {
            config,
            default_headers: http::HeaderMap::new(),
        }
    }

    /// Fail requests that take longer than `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Let requests run for as long as the server takes.
    pub fn no_timeout(mut self) -> Self {
        self.config.timeout = None;
        self
    }

    /// Fail connection attempts that take longer than `timeout`.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Follow at most `max` redirects.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.config.max_redirects = max;
        self
    }

    /// Send `user_agent` as the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Send a header with every request of the client.
    pub fn default_header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Result<Self> {
        let name = name
            .try_into()
            .map_err(|_| NetworkError::InvalidHeader("invalid default header name".into()))?;
        let value = value
            .try_into()
            .map_err(|_| NetworkError::InvalidHeader(format!("invalid value for '{name}'")))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Create the client and its connection pool.
    pub fn build(self) -> Result<HttpClient> {
        let client = self
            .config
            .apply(reqwest::Client::builder())
            .default_headers(self.default_headers)
            .build()?;

        Ok(HttpClient {
            inner: Arc::new(HttpClientInner {
                client,
                config: self.config,
            }),
        })
    }
}

struct HttpClientInner {
    client: reqwest::Client,
    config: HttpClientConfig,
}

/// Handle to a configured connection pool.
///
/// Clones share the pool and settings.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<HttpClientInner>,
}

impl HttpClient {
    /// Start configuring a client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// The settings this client was built with.
    pub fn config(&self) -> &HttpClientConfig {
        &self.inner.config
    }

    pub(crate) fn get(&self, url: String) -> HttpRequestBuilder {
        HttpRequestBuilder::new(self.clone(), url)
    }

    pub(crate) fn reqwest_client(&self) -> &reqwest::Client {
        &self.inner.client
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}
