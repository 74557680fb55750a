//! Embed configuration.
//!
//! The hosting page decides which blog is embedded and where its API lives.
//! Those values reach the client through [`EmbedConfig`], built in code or
//! loaded from a TOML file:
//!
//! ```toml
//! api_host = "https://liveblog.example.com/api"
//! blog_id = "5a0b0c0d0e0f101112131415"
//! posts_per_page = 10
//! ordering = "descending"
//! poll_interval_secs = 10
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pages::PostOrdering;

const DEFAULT_POSTS_PER_PAGE: u32 = 10;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_posts_per_page() -> u32 {
    DEFAULT_POSTS_PER_PAGE
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Settings of one embedded liveblog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedConfig {
    /// Root URL of the liveblog API, e.g. `https://host/api`.
    pub api_host: String,
    /// Identifier of the embedded blog.
    pub blog_id: String,
    /// Posts per page of the local cache.
    #[serde(default = "default_posts_per_page")]
    pub posts_per_page: u32,
    /// Comparator direction used when paginating.
    #[serde(default)]
    pub ordering: PostOrdering,
    /// Seconds between two update polls.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// User agent sent to the API; the transport default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl EmbedConfig {
    /// Configuration with default tunables.
    pub fn new(api_host: impl Into<String>, blog_id: impl Into<String>) -> Self {
        Self {
            api_host: api_host.into(),
            blog_id: blog_id.into(),
            posts_per_page: DEFAULT_POSTS_PER_PAGE,
            ordering: PostOrdering::default(),
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }

    /// Set the number of posts per page.
    pub fn with_posts_per_page(mut self, posts_per_page: u32) -> Self {
        self.posts_per_page = posts_per_page;
        self
    }

    /// Set the comparator direction.
    pub fn with_ordering(mut self, ordering: PostOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Set the update polling period, in seconds.
    pub fn with_poll_interval_secs(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| Error::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&source).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        tracing::debug!(
            target: crate::logging::targets::SERVICE,
            path = %path.display(),
            blog_id = %config.blog_id,
            "loaded embed config"
        );
        Ok(config)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        let host = self.api_host.trim();
        if host.is_empty() {
            return Err(Error::invalid_config("api_host is empty"));
        }
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(Error::invalid_config(format!(
                "api_host '{host}' is not an http(s) URL"
            )));
        }
        if self.blog_id.trim().is_empty() {
            return Err(Error::invalid_config("blog_id is empty"));
        }
        if self.posts_per_page == 0 {
            return Err(Error::invalid_config("posts_per_page must be at least 1"));
        }
        if self.poll_interval_secs == 0 {
            return Err(Error::invalid_config("poll_interval_secs must be at least 1"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::invalid_config("timeout_secs must be at least 1"));
        }
        Ok(())
    }

    /// Period of the update polling loop.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// HTTP request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
