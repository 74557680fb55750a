//! Query descriptions sent to the posts service and the listings it returns.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::post::{Post, Timestamp};

/// Which posts a query selects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostsQuery {
    /// Published, non-deleted posts in display order (`order` descending,
    /// posts without `order` last).
    Published,
    /// Every post modified after the given instant, newest first. `None`
    /// selects all posts.
    UpdatedSince(Option<Timestamp>),
}

impl PostsQuery {
    /// The Elasticsearch `source` document (`{query, sort}`) for this query.
    pub fn source(&self) -> Value {
        match self {
            Self::Published => json!({
                "query": {"filtered": {"filter": {"and": [
                    {"term": {"post_status": "open"}},
                    {"not": {"term": {"deleted": true}}}
                ]}}},
                "sort": [{"order": {"order": "desc", "missing": "_last", "unmapped_type": "long"}}]
            }),
            Self::UpdatedSince(since) => {
                let range = match since {
                    Some(since) => json!({"gt": since.to_string()}),
                    None => json!({}),
                };
                json!({
                    "query": {"filtered": {"filter": {"and": [
                        {"range": {"_updated": range}}
                    ]}}},
                    "sort": [{"_updated": {"order": "desc"}}]
                })
            }
        }
    }
}

/// A request for one page of posts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PostsCriteria {
    /// Blog to query; `None` uses the service's default blog.
    pub blog_id: Option<String>,
    /// Selection and ordering.
    pub query: PostsQuery,
    /// 1-based page index.
    pub page: u32,
    /// Page size; `None` uses the server default.
    pub max_results: Option<u32>,
}

impl PostsCriteria {
    /// Page `page` of published posts, `max_results` per page.
    pub fn published(page: u32, max_results: u32) -> Self {
        Self {
            blog_id: None,
            query: PostsQuery::Published,
            page,
            max_results: Some(max_results),
        }
    }

    /// First page of posts updated after `since`, at the server's page size.
    pub fn updated_since(blog_id: Option<String>, since: Option<Timestamp>) -> Self {
        Self {
            blog_id,
            query: PostsQuery::UpdatedSince(since),
            page: 1,
            max_results: None,
        }
    }

    /// The same query for another page.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// The `source` document for this criteria.
    pub fn source(&self) -> Value {
        self.query.source()
    }
}

/// Pagination summary of a listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    /// Number of posts matching the query.
    pub total: u64,
    /// Page size the server applied.
    pub max_results: u32,
    /// 1-based page index.
    pub page: u32,
}

impl Meta {
    /// Number of pages needed to hold `total` posts (at least `page`).
    pub fn page_count(&self) -> u32 {
        if self.max_results == 0 {
            return self.page;
        }
        let pages = self.total.div_ceil(u64::from(self.max_results));
        u32::try_from(pages).unwrap_or(u32::MAX).max(self.page)
    }

    /// Whether posts exist beyond this page.
    pub fn has_more(&self) -> bool {
        self.total > u64::from(self.max_results) * u64::from(self.page)
    }
}

/// One page of posts as returned by the service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PostsPage {
    /// The posts of the page.
    #[serde(rename = "_items", default)]
    pub items: Vec<Post>,
    /// Pagination summary.
    #[serde(rename = "_meta", default)]
    pub meta: Meta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_published_source() {
        let source = PostsCriteria::published(2, 10).source();
        assert_eq!(
            source["query"]["filtered"]["filter"]["and"][0],
            json!({"term": {"post_status": "open"}})
        );
        assert_eq!(source["sort"][0]["order"]["order"], "desc");
        assert_eq!(source["sort"][0]["order"]["missing"], "_last");
    }

    #[test]
    fn test_updates_source() {
        let since = Timestamp::parse("2020-01-02").unwrap();
        let source = PostsCriteria::updated_since(Some("blog".into()), Some(since)).source();
        assert_eq!(
            source["query"]["filtered"]["filter"]["and"][0],
            json!({"range": {"_updated": {"gt": "2020-01-02T00:00:00Z"}}})
        );
        assert_eq!(source["sort"][0], json!({"_updated": {"order": "desc"}}));

        // No watermark, no lower bound
        let source = PostsCriteria::updated_since(None, None).source();
        assert_eq!(
            source["query"]["filtered"]["filter"]["and"][0],
            json!({"range": {"_updated": {}}})
        );
    }

    #[test]
    fn test_meta_page_count() {
        let meta = Meta { total: 25, max_results: 10, page: 1 };
        assert_eq!(meta.page_count(), 3);
        assert!(meta.has_more());

        let meta = Meta { total: 20, max_results: 10, page: 1 };
        assert_eq!(meta.page_count(), 2);

        let meta = Meta { total: 10, max_results: 10, page: 1 };
        assert_eq!(meta.page_count(), 1);
        assert!(!meta.has_more());

        let meta = Meta { total: 0, max_results: 0, page: 1 };
        assert_eq!(meta.page_count(), 1);
        assert!(!meta.has_more());
    }

    #[test]
    fn test_deserialize_listing() {
        let page: PostsPage = serde_json::from_value(json!({
            "_items": [{"_id": "a", "post_status": "open"}],
            "_meta": {"total": 1, "max_results": 25, "page": 1},
            "_links": {"self": {"href": "posts"}}
        }))
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.meta, Meta { total: 1, max_results: 25, page: 1 });
    }
}
