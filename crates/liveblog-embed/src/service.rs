//! The posts query service.
//!
//! [`PostsService`] is the only way the pages manager reaches the backend.
//! [`RestPostsService`] implements it over the liveblog REST API; tests and
//! other transports provide their own implementations.

use std::future::Future;

use liveblog_net::http::{HttpClient, RestApiClient};

use crate::config::EmbedConfig;
use crate::error::Result;
use crate::logging::targets;
use crate::query::{PostsCriteria, PostsPage};

/// A source of post listings.
pub trait PostsService {
    /// Fetch the page of posts described by `criteria`.
    fn get(&self, criteria: PostsCriteria) -> impl Future<Output = Result<PostsPage>> + Send;
}

/// [`PostsService`] over `GET {api_host}/client_blogs/{blog_id}/posts`.
///
/// The criteria travel as query parameters: `source` (the JSON-encoded
/// `{query, sort}` document), `page` and, when set, `max_results`.
#[derive(Clone, Debug)]
pub struct RestPostsService {
    api: RestApiClient,
    blog_id: String,
}

impl RestPostsService {
    /// Create a service for `blog_id` on top of an API client.
    pub fn new(api: RestApiClient, blog_id: impl Into<String>) -> Self {
        Self {
            api,
            blog_id: blog_id.into(),
        }
    }

    /// Create a service from an embed configuration.
    pub fn from_config(config: &EmbedConfig) -> Result<Self> {
        config.validate()?;
        let mut http = HttpClient::builder().timeout(config.timeout());
        if let Some(ref user_agent) = config.user_agent {
            http = http.user_agent(user_agent.clone());
        }
        let api = RestApiClient::builder(&config.api_host)
            .http_client_builder(http)
            .build()?;
        Ok(Self::new(api, config.blog_id.clone()))
    }

    /// The default blog queried when criteria carry none.
    pub fn blog_id(&self) -> &str {
        &self.blog_id
    }

    /// Path of the posts listing of `blog_id`.
    pub fn posts_path(blog_id: &str) -> String {
        format!("/client_blogs/{blog_id}/posts")
    }

    async fn fetch(&self, criteria: PostsCriteria) -> Result<PostsPage> {
        let blog_id = criteria.blog_id.as_deref().unwrap_or(&self.blog_id);
        tracing::debug!(
            target: targets::SERVICE,
            blog_id,
            page = criteria.page,
            max_results = ?criteria.max_results,
            "querying posts"
        );

        let mut request = self
            .api
            .get(&Self::posts_path(blog_id))
            .json_query("source", &criteria.source())
            .query("page", criteria.page.to_string());
        if let Some(max_results) = criteria.max_results {
            request = request.query("max_results", max_results.to_string());
        }

        let page: PostsPage = request.json_response().await?;
        Ok(page)
    }
}

impl PostsService for RestPostsService {
    fn get(&self, criteria: PostsCriteria) -> impl Future<Output = Result<PostsPage>> + Send {
        self.fetch(criteria)
    }
}
