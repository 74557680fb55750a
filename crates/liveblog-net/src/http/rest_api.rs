//! Client bound to the liveblog API root.
//!
//! The backend is an Eve application: resources live under a common API
//! root, list endpoints answer with `{"_items": [...], "_meta": {...}}`
//! and errors with `{"_status": "ERR", "_error": {...}}`.
//!
//! # Example
//!
//! ```ignore
//! use liveblog_net::http::RestApiClient;
//!
//! let client = RestApiClient::builder("https://liveblog.example.com/api")
//!     .build()?;
//!
//! // GET https://liveblog.example.com/api/client_blogs/<id>/posts?page=1
//! let posts: serde_json::Value = client
//!     .get("/client_blogs/5a0b.../posts")
//!     .query("page", "1")
//!     .json_response()
//!     .await?;
//! ```

use std::sync::Arc;

use super::client::{HttpClient, HttpClientBuilder};
use super::request::HttpRequestBuilder;
use crate::error::Result;

const JSON: &str = "application/json";

/// Where a [`RestApiClient`] gets its HTTP client from.
#[derive(Debug)]
enum Transport {
    Shared(HttpClient),
    Build(HttpClientBuilder),
}

/// Builder for a [`RestApiClient`].
#[derive(Debug)]
pub struct RestApiClientBuilder {
    base_url: String,
    transport: Transport,
}

impl RestApiClientBuilder {
    /// Start a client for the API rooted at `base_url`, e.g.
    /// `https://host/api`. A trailing slash is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            transport: Transport::Build(HttpClientBuilder::new()),
        }
    }

    /// Send requests through an existing client, sharing its pool.
    pub fn http_client(mut self, client: HttpClient) -> Self {
        self.transport = Transport::Shared(client);
        self
    }

    /// Build a dedicated HTTP client with these settings.
    pub fn http_client_builder(mut self, builder: HttpClientBuilder) -> Self {
        self.transport = Transport::Build(builder);
        self
    }

    /// Create the client.
    pub fn build(self) -> Result<RestApiClient> {
        let http_client = match self.transport {
            Transport::Shared(client) => client,
            Transport::Build(builder) => builder.build()?,
        };
        Ok(RestApiClient {
            inner: Arc::new(RestApiClientInner {
                http_client,
                base_url: self.base_url.trim_end_matches('/').to_owned(),
            }),
        })
    }
}

struct RestApiClientInner {
    http_client: HttpClient,
    base_url: String,
}

/// Client issuing JSON GET requests relative to the API root.
///
/// Clones share the connection pool.
#[derive(Clone)]
pub struct RestApiClient {
    inner: Arc<RestApiClientInner>,
}

impl RestApiClient {
    /// Start configuring a client for `base_url`.
    pub fn builder(base_url: impl Into<String>) -> RestApiClientBuilder {
        RestApiClientBuilder::new(base_url)
    }

    /// The API root, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// The underlying HTTP client.
    pub fn http_client(&self) -> &HttpClient {
        &self.inner.http_client
    }

    /// Start a GET request for `path`, accepting JSON.
    pub fn get(&self, path: &str) -> HttpRequestBuilder {
        self.inner
            .http_client
            .get(self.url_for(path))
            .header(http::header::ACCEPT, JSON)
    }

    /// Absolute URL of `path` under the API root.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }
}

impl std::fmt::Debug for RestApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}
