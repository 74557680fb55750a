//! The pages manager: a paged post cache kept in sync with the posts service.
//!
//! # Fetching
//!
//! - [`PagesManager::fetch_new_page`] grows the cache by one page. The first
//!   call also seeds the watermark from the latest updates.
//! - [`PagesManager::retrieve_updates`] asks for every post modified since the
//!   watermark and optionally reconciles them into the cache.
//! - [`PagesManager::poll_updates`] runs the latter on a timer.
//!
//! # Reconciliation
//!
//! Posts in an update batch are matched to the cache by identifier. Unknown
//! active posts are added, known withdrawn posts (deleted or back to draft)
//! are removed, other known posts are replaced. Each change rebuilds the
//! pages, and the watermark moves to the newest `_updated` of the batch.
//!
//! # Failures
//!
//! Errors of the posts service are returned as they are, without retrying.
//! An operation mutates the manager only once all of its queries succeeded.
//!
//! ```ignore
//! use liveblog_embed::{EmbedConfig, PagesManager, RestPostsService};
//!
//! let config = EmbedConfig::load("embed.toml")?;
//! let service = RestPostsService::from_config(&config)?;
//! let mut manager = PagesManager::from_config(service, &config);
//!
//! manager.fetch_new_page().await?;
//! for post in manager.all_posts() {
//!     println!("{}", post.id);
//! }
//!
//! let updates = manager.retrieve_updates(true).await?;
//! ```

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use futures_util::future::try_join_all;
use tokio::time::MissedTickBehavior;

use crate::config::EmbedConfig;
use crate::error::Result;
use crate::logging::targets;
use crate::pages::{Page, PageStore, PostOrdering};
use crate::post::{Post, Timestamp, newest_update};
use crate::query::{Meta, PostsCriteria, PostsPage};
use crate::service::PostsService;

/// Paged cache of a blog's posts.
#[derive(Debug)]
pub struct PagesManager<S> {
    service: S,
    store: PageStore,
    meta: Meta,
    latest_updated_date: Option<Timestamp>,
    blog_id: Option<String>,
}

impl<S: PostsService> PagesManager<S> {
    /// Create an empty manager with `max_results` posts per page and the
    /// default (descending) ordering.
    pub fn new(service: S, max_results: u32) -> Self {
        Self {
            service,
            store: PageStore::new(max_results, PostOrdering::default()),
            meta: Meta::default(),
            latest_updated_date: None,
            blog_id: None,
        }
    }

    /// Create an empty manager from an embed configuration.
    pub fn from_config(service: S, config: &EmbedConfig) -> Self {
        Self::new(service, config.posts_per_page)
            .with_ordering(config.ordering)
            .with_blog_id(config.blog_id.clone())
    }

    /// Scope update queries to `blog_id`.
    pub fn with_blog_id(mut self, blog_id: impl Into<String>) -> Self {
        self.blog_id = Some(blog_id.into());
        self
    }

    /// Set the comparator direction. Cached posts are repaginated.
    pub fn with_ordering(mut self, ordering: PostOrdering) -> Self {
        let posts = self.store.take_posts();
        self.store = PageStore::new(self.store.max_results(), ordering);
        self.store.rebuild(posts);
        self
    }

    /// The posts service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// The cached pages, first to last.
    pub fn pages(&self) -> &[Page] {
        self.store.pages()
    }

    /// Number of cached pages.
    pub fn page_count(&self) -> usize {
        self.store.page_count()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// All cached posts in display order.
    pub fn all_posts(&self) -> Vec<Post> {
        self.store.all_posts()
    }

    /// Number of cached posts.
    pub fn count(&self) -> usize {
        self.store.count()
    }

    /// The cached post with identifier `id`.
    pub fn get(&self, id: &str) -> Option<&Post> {
        self.store.get(id)
    }

    /// Posts per page.
    pub fn max_results(&self) -> u32 {
        self.store.max_results()
    }

    /// Summary of the last page query.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Newest `_updated` seen so far.
    pub fn latest_updated_date(&self) -> Option<Timestamp> {
        self.latest_updated_date
    }

    /// Whether the server reported more published posts than are cached.
    pub fn has_more(&self) -> bool {
        self.meta.total > self.count() as u64
    }

    /// Fetch page `page` (1-based) of published posts, `max_results` per page
    /// (the manager's page size when `None`), and record its meta.
    pub async fn retrieve_page(&mut self, page: u32, max_results: Option<u32>) -> Result<PostsPage> {
        let max_results = max_results.unwrap_or_else(|| self.max_results());
        let criteria = PostsCriteria::published(page, max_results);
        let response = self.service.get(criteria).await?;
        tracing::debug!(
            target: targets::PAGES,
            page,
            max_results,
            received = response.items.len(),
            total = response.meta.total,
            "page retrieved"
        );
        self.meta = response.meta;
        Ok(response)
    }

    /// Refetch the first `to` pages in one query and rebuild the cache from
    /// the result. A `to` of zero reloads the pages currently held, and at
    /// least one.
    pub async fn reload_pages(&mut self, to: usize) -> Result<()> {
        let to = match to {
            0 => self.store.page_count().max(1),
            to => to,
        };
        let response = self.retrieve_page(1, Some(self.reload_size(to))).await?;
        self.store.rebuild(response.items);
        Ok(())
    }

    /// Grow the cache by one page.
    ///
    /// On an empty cache, the latest updates are fetched first to seed the
    /// watermark. The cache is then rebuilt from a single query covering one
    /// page more than is currently held.
    pub async fn fetch_new_page(&mut self) -> Result<()> {
        let seed = if self.store.is_empty() {
            Some(self.retrieve_updates(false).await?)
        } else {
            None
        };

        let to = self.store.page_count() + 1;
        let response = self.retrieve_page(1, Some(self.reload_size(to))).await?;
        self.store.rebuild(response.items);

        if let Some(seed) = seed {
            self.advance_watermark(newest_update(&seed.items));
        }
        Ok(())
    }

    /// Fetch every post updated after the watermark.
    ///
    /// When the server reports more updates than its first page holds, the
    /// remaining pages are requested concurrently and concatenated after the
    /// first one; the returned meta then counts `max_results` over all pages
    /// fetched. Without a watermark only the first page is fetched.
    ///
    /// With `apply`, the batch is reconciled into the cache before being
    /// returned. Nothing is applied if any query fails.
    pub async fn retrieve_updates(&mut self, apply: bool) -> Result<PostsPage> {
        let since = self.latest_updated_date;
        let criteria = PostsCriteria::updated_since(self.blog_id.clone(), since);
        let first = self.service.get(criteria.clone()).await?;
        let meta = first.meta;

        let updates = if since.is_none() || !meta.has_more() {
            first
        } else {
            let pages = (meta.page + 1)..=meta.page_count();
            tracing::debug!(
                target: targets::UPDATES,
                total = meta.total,
                extra_pages = pages.clone().count(),
                "fetching remaining update pages"
            );
            let service = &self.service;
            let rest = try_join_all(
                pages.map(|page| service.get(criteria.clone().with_page(page))),
            )
            .await?;

            let pages_fetched = u32::try_from(rest.len() + 1).unwrap_or(u32::MAX);
            let mut items = first.items;
            items.extend(rest.into_iter().flat_map(|page| page.items));
            PostsPage {
                items,
                meta: Meta {
                    max_results: meta.max_results.saturating_mul(pages_fetched),
                    ..meta
                },
            }
        };

        tracing::debug!(
            target: targets::UPDATES,
            since = ?since.map(|since| since.to_string()),
            received = updates.items.len(),
            apply,
            "updates retrieved"
        );

        if apply {
            self.apply_updates(&updates.items);
        }
        Ok(updates)
    }

    /// Reconcile a batch of changed posts into the cache.
    pub fn apply_updates(&mut self, updates: &[Post]) {
        let (mut added, mut updated, mut removed) = (0usize, 0usize, 0usize);

        for post in updates {
            match self.store.position(&post.id) {
                Some(_) if post.is_withdrawn() => {
                    self.remove_post(post);
                    removed += 1;
                }
                Some(position) => {
                    self.store.replace_at(position, post.clone());
                    self.store.repaginate();
                    updated += 1;
                }
                None if post.is_active() => {
                    self.add_posts([post.clone()]);
                    added += 1;
                }
                None => {}
            }
        }

        self.advance_watermark(newest_update(updates));

        tracing::debug!(
            target: targets::UPDATES,
            added,
            updated,
            removed,
            ignored = updates.len() - added - updated - removed,
            "updates applied"
        );
    }

    /// Add posts that are not cached yet and rebuild the pages.
    ///
    /// Posts whose identifier is already cached, or repeated within `posts`,
    /// are skipped. The watermark moves to the newest `_updated` of the
    /// resulting cache.
    pub fn add_posts(&mut self, posts: impl IntoIterator<Item = Post>) {
        let mut all_posts = self.store.take_posts();
        let mut seen: HashSet<String> = all_posts.iter().map(|post| post.id.clone()).collect();
        all_posts.extend(posts.into_iter().filter(|post| seen.insert(post.id.clone())));

        self.store.rebuild(all_posts);
        self.advance_watermark(newest_update(self.store.iter()));
    }

    /// Remove the cached copy of `post` and rebuild the pages.
    ///
    /// Returns `false` if the post was not cached.
    pub fn remove_post(&mut self, post: &Post) -> bool {
        let Some(position) = self.store.position(&post.id) else {
            return false;
        };
        self.store.remove_at(position);
        self.store.repaginate();
        true
    }

    /// Apply updates every `period` until `shutdown` resolves.
    ///
    /// The first poll happens immediately. A failed poll is logged and the
    /// next tick queries again from the same watermark. Returns the number of
    /// successful polls.
    pub async fn poll_updates<F>(&mut self, period: Duration, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        let mut polls = 0;
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = interval.tick() => {
                    match self.retrieve_updates(true).await {
                        Ok(_) => polls += 1,
                        Err(e) => {
                            tracing::warn!(target: targets::UPDATES, error = %e, "update poll failed");
                        }
                    }
                }
            }
        }
        polls
    }

    fn reload_size(&self, pages: usize) -> u32 {
        u32::try_from(pages)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.max_results())
    }

    fn advance_watermark(&mut self, candidate: Option<Timestamp>) {
        let Some(candidate) = candidate else {
            return;
        };
        if self
            .latest_updated_date
            .is_none_or(|current| candidate > current)
        {
            tracing::debug!(target: targets::UPDATES, watermark = %candidate, "watermark advanced");
            self.latest_updated_date = Some(candidate);
        }
    }
}
