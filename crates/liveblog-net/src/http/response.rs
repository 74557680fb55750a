//! HTTP response types.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::LOG_TARGET;
use crate::error::{NetworkError, Result};

/// An HTTP response from a request.
pub struct HttpResponse {
    inner: reqwest::Response,
}

impl HttpResponse {
    pub(crate) fn from_reqwest(response: reqwest::Response) -> Self {
        Self { inner: response }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Check if the response indicates success (2xx status).
    pub fn is_success(&self) -> bool {
        self.inner.status().is_success()
    }

    /// Get the final URL after redirects.
    pub fn url(&self) -> &str {
        self.inner.url().as_str()
    }

    /// Get the response body as text.
    pub async fn text(self) -> Result<String> {
        Ok(self.inner.text().await?)
    }

    /// Parse the response body as JSON.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.inner.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Return the response unchanged on 2xx, otherwise an
    /// [`NetworkError::HttpStatus`] carrying the API's error message.
    pub async fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let status = self.status();
        let message = self.text().await.ok().and_then(|body| error_message(&body));
        tracing::debug!(target: LOG_TARGET, status, ?message, "request failed");
        Err(NetworkError::HttpStatus { status, message })
    }
}

impl std::fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status())
            .field("url", &self.url())
            .finish()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "_error")]
    error: Option<ErrorDetail>,
    #[serde(rename = "_message")]
    message: Option<String>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Extract the message of an Eve error body:
/// `{"_status": "ERR", "_error": {"code": 404, "message": "..."}}`,
/// or the `_message` field Superdesk adds on some endpoints.
pub(crate) fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .error
        .and_then(|detail| detail.message)
        .or(parsed.message)
        .filter(|msg| !msg.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eve_error_message() {
        let body = r#"{"_status": "ERR", "_error": {"code": 404, "message": "blog not found"}}"#;
        assert_eq!(error_message(body), Some("blog not found".to_string()));
    }

    #[test]
    fn test_superdesk_message() {
        let body = r#"{"_message": "invalid source"}"#;
        assert_eq!(error_message(body), Some("invalid source".to_string()));
    }

    #[test]
    fn test_non_json_body() {
        assert_eq!(error_message("<html>Bad Gateway</html>"), None);
        assert_eq!(error_message(""), None);
        assert_eq!(error_message(r#"{"_error": {"code": 500}}"#), None);
    }
}
