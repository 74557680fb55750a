//! Error types for the liveblog embed.

use std::path::PathBuf;

use liveblog_net::NetworkError;

/// Result type alias for embed operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while syncing posts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The posts query failed in transport or was rejected by the API.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// A post timestamp could not be parsed.
    #[error("Invalid timestamp '{value}': {message}")]
    Timestamp { value: String, message: String },

    /// Configuration values are missing or out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration file could not be parsed.
    #[error("Failed to parse config '{path}': {message}")]
    Config { path: PathBuf, message: String },

    /// A configuration file could not be read.
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a timestamp error.
    pub fn timestamp(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Timestamp {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
