//! Error types for the liveblog transport.

/// A specialized Result type for network operations.
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Failures of a request to the liveblog API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum NetworkError {
    /// The request could not be sent or its body not read.
    #[error("HTTP request error: {0}")]
    Request(String),

    /// The base URL or path does not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// No response within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The API host refused or dropped the connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A configured header name or value is not valid HTTP.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The response body is not the expected JSON document.
    #[error("JSON error: {0}")]
    Json(String),

    /// The API answered with a 4xx or 5xx status.
    #[error("HTTP {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// Error message reported by the API, if the body carried one.
        message: Option<String>,
    },
}

impl NetworkError {
    /// The HTTP status code, for status errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_decode() {
            Self::Json(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
