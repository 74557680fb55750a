//! HTTP transport for the liveblog API.
//!
//! # Example
//!
//! ```ignore
//! use liveblog_net::http::{HttpClient, RestApiClient};
//!
//! let http = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .build()?;
//!
//! let api = RestApiClient::builder("https://liveblog.example.com/api")
//!     .http_client(http)
//!     .build()?;
//!
//! let response = api.get("/client_blogs/123/posts").send().await?;
//! println!("Status: {}", response.status());
//! ```

/// Tracing target of request and response events.
pub const LOG_TARGET: &str = "liveblog_net::http";

mod client;
mod request;
mod response;
mod rest_api;

pub use client::{HttpClient, HttpClientBuilder, HttpClientConfig};
pub use request::{HttpRequest, HttpRequestBuilder};
pub use response::HttpResponse;
pub use rest_api::{RestApiClient, RestApiClientBuilder};
