//! GET requests against the liveblog API.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::LOG_TARGET;
use super::client::HttpClient;
use super::response::HttpResponse;
use crate::error::{NetworkError, Result};

/// A GET request ready to be sent.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The request URL, without query string.
    pub url: String,
    /// Request headers.
    pub headers: http::HeaderMap,
    /// Query parameters, in insertion order.
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    /// Value of the first query parameter named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v.as_str()))
    }

    /// Full URL including the encoded query string.
    pub fn full_url(&self) -> Result<url::Url> {
        let mut url = url::Url::parse(&self.url)?;
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query);
        }
        Ok(url)
    }

    /// Send this request with `client`.
    pub async fn execute(self, client: &HttpClient) -> Result<HttpResponse> {
        let url = self.full_url()?;
        tracing::debug!(target: LOG_TARGET, %url, "GET");

        let response = client
            .reqwest_client()
            .get(url)
            .headers(self.headers)
            .send()
            .await?;
        Ok(HttpResponse::from_reqwest(response))
    }
}

/// Builder for a GET request.
pub struct HttpRequestBuilder {
    client: HttpClient,
    request: HttpRequest,
    error: Option<NetworkError>,
}

impl HttpRequestBuilder {
    pub(crate) fn new(client: HttpClient, url: String) -> Self {
        Self {
            client,
            request: HttpRequest {
                url,
                headers: http::HeaderMap::new(),
                query: Vec::new(),
            },
            error: None,
        }
    }

    /// Set a header. Invalid names or values are ignored.
    pub fn header(
        mut self,
        name: impl TryInto<http::HeaderName>,
        value: impl TryInto<http::HeaderValue>,
    ) -> Self {
        if let (Ok(name), Ok(value)) = (name.try_into(), value.try_into()) {
            self.request.headers.insert(name, value);
        }
        self
    }

    /// Add a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.query.push((key.into(), value.into()));
        self
    }

    /// Add a query parameter whose value is the JSON encoding of `value`.
    ///
    /// Eve-style APIs take structured arguments (`where`, `source`, `sort`)
    /// as JSON strings in the query. A value that fails to serialize makes
    /// the request fail when sent.
    pub fn json_query<T: Serialize>(mut self, key: impl Into<String>, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(encoded) => self.request.query.push((key.into(), encoded)),
            Err(e) => self.error = Some(e.into()),
        }
        self
    }

    /// Build the request without sending it.
    pub fn build(self) -> HttpRequest {
        self.request
    }

    /// Send the request and wait for the response, whatever its status.
    pub async fn send(self) -> Result<HttpResponse> {
        if let Some(error) = self.error {
            return Err(error);
        }
        self.request.execute(&self.client).await
    }

    /// Send the request, fail on non-2xx statuses and parse the body as JSON.
    pub async fn json_response<T: DeserializeOwned>(self) -> Result<T> {
        let response = self.send().await?;
        response.error_for_status().await?.json().await
    }
}
