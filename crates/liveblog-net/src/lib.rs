//! HTTP transport for the liveblog embed client.
//!
//! The liveblog backend is a read-mostly JSON API. This crate wraps
//! `reqwest` with the pieces the embed needs:
//!
//! - [`http::HttpClient`]: configured connection pool (timeouts, user agent)
//! - [`http::RestApiClient`]: requests relative to the API root, JSON by default
//! - [`http::HttpRequestBuilder::json_query`]: structured query arguments
//!   encoded as JSON strings, the way Eve expects `source` and `where`
//! - [`NetworkError`]: transport failures, including the message of Eve
//!   error bodies on non-2xx statuses
//!
//! ```ignore
//! use liveblog_net::http::RestApiClient;
//!
//! let api = RestApiClient::builder("https://liveblog.example.com/api").build()?;
//! let page: serde_json::Value = api
//!     .get("/client_blogs/123/posts")
//!     .json_query("source", &serde_json::json!({"sort": [{"_updated": {"order": "desc"}}]}))
//!     .query("page", "1")
//!     .json_response()
//!     .await?;
//! ```

mod error;
pub mod http;

pub use error::{NetworkError, Result};

pub use http::{
    HttpClient, HttpClientBuilder, HttpClientConfig, HttpRequest, HttpRequestBuilder, HttpResponse,
    RestApiClient, RestApiClientBuilder,
};
