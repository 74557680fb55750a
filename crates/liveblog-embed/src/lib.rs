//! Liveblog embed client.
//!
//! Keeps a paged, in-memory copy of a blog's published posts and keeps it
//! consistent with the liveblog API as posts are created, edited, withdrawn
//! or deleted.
//!
//! - [`PagesManager`]: the cache, its fetch operations and the update
//!   reconciliation
//! - [`PageStore`]: fixed-size pages rebuilt from the full post list
//! - [`PostsService`]: the query seam; [`RestPostsService`] talks to the
//!   REST API through `liveblog-net`
//! - [`EmbedConfig`]: API host, blog id and tunables
//!
//! # Example
//!
//! ```ignore
//! use liveblog_embed::{EmbedConfig, PagesManager, RestPostsService};
//!
//! let config = EmbedConfig::new("https://liveblog.example.com/api", "5a0b0c0d");
//! let service = RestPostsService::from_config(&config)?;
//! let mut manager = PagesManager::from_config(service, &config);
//!
//! // First page, then keep it fresh until ctrl-c
//! manager.fetch_new_page().await?;
//! manager
//!     .poll_updates(config.poll_interval(), async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await;
//! ```

mod config;
mod error;
pub mod logging;
mod manager;
mod pages;
mod post;
mod query;
mod service;

pub use config::EmbedConfig;
pub use error::{Error, Result};
pub use manager::PagesManager;
pub use pages::{Page, PageStore, PostOrdering, PostPosition};
pub use post::{Post, PostStatus, Timestamp, newest_update};
pub use query::{Meta, PostsCriteria, PostsPage, PostsQuery};
pub use service::{PostsService, RestPostsService};

pub use liveblog_net::NetworkError;
