//! Fixed-size pages of posts.
//!
//! The store never patches page boundaries: every structural change goes
//! through [`PageStore::rebuild`], which sorts the whole post list and cuts
//! it again into pages of `max_results`. Feeds hold tens of pages at most,
//! so the full pass stays cheap.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::post::Post;

/// Direction of the `order` comparator used when paginating.
///
/// Posts without an `order` value always go last, and posts that compare
/// equal keep their relative position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostOrdering {
    /// Highest `order` first, matching the server's sort.
    #[default]
    Descending,
    /// Lowest `order` first.
    Ascending,
}

impl PostOrdering {
    /// Compare two posts by `order` in this direction.
    pub fn compare(self, a: &Post, b: &Post) -> Ordering {
        match (a.order, b.order) {
            (Some(x), Some(y)) => match self {
                Self::Descending => y.total_cmp(&x),
                Self::Ascending => x.total_cmp(&y),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// An ordered run of at most `max_results` posts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    posts: Vec<Post>,
}

impl Page {
    /// The posts of this page, in display order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Number of posts on this page.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the page holds no post.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Identifiers of the posts, in display order.
    pub fn ids(&self) -> Vec<&str> {
        self.posts.iter().map(|post| post.id.as_str()).collect()
    }
}

/// Location of a post: (page index, index within the page).
pub type PostPosition = (usize, usize);

/// Ordered pages of posts.
#[derive(Clone, Debug)]
pub struct PageStore {
    pages: Vec<Page>,
    max_results: u32,
    ordering: PostOrdering,
}

impl PageStore {
    /// Create an empty store. A `max_results` of zero is treated as one.
    pub fn new(max_results: u32, ordering: PostOrdering) -> Self {
        Self {
            pages: Vec::new(),
            max_results: max_results.max(1),
            ordering,
        }
    }

    /// Maximum number of posts per page.
    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    /// The pages, first to last.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Whether the store holds no page.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total number of posts over all pages.
    pub fn count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    /// Iterate over all posts in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Post> {
        self.pages.iter().flat_map(|page| page.posts.iter())
    }

    /// All posts in display order.
    pub fn all_posts(&self) -> Vec<Post> {
        self.iter().cloned().collect()
    }

    /// Locate the post with identifier `id`.
    pub fn position(&self, id: &str) -> Option<PostPosition> {
        self.pages.iter().enumerate().find_map(|(page_index, page)| {
            page.posts
                .iter()
                .position(|post| post.id == id)
                .map(|post_index| (page_index, post_index))
        })
    }

    /// The post with identifier `id`.
    pub fn get(&self, id: &str) -> Option<&Post> {
        self.position(id)
            .map(|(page_index, post_index)| &self.pages[page_index].posts[post_index])
    }

    /// Overwrite the post at `position`, returning the previous one.
    ///
    /// Page boundaries and ordering are left as they are; call
    /// [`PageStore::repaginate`] afterwards.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds.
    pub fn replace_at(&mut self, position: PostPosition, post: Post) -> Post {
        let (page_index, post_index) = position;
        std::mem::replace(&mut self.pages[page_index].posts[post_index], post)
    }

    /// Remove the post at `position` from its page.
    ///
    /// Page boundaries are left as they are; call [`PageStore::repaginate`]
    /// afterwards.
    ///
    /// # Panics
    ///
    /// Panics if `position` is out of bounds.
    pub fn remove_at(&mut self, position: PostPosition) -> Post {
        let (page_index, post_index) = position;
        self.pages[page_index].posts.remove(post_index)
    }

    /// Replace all pages with `posts`, sorted and cut into pages of
    /// `max_results`. The last page may be partial; no page is empty.
    pub fn rebuild(&mut self, mut posts: Vec<Post>) {
        let ordering = self.ordering;
        posts.sort_by(|a, b| ordering.compare(a, b));

        let page_size = self.max_results as usize;
        let mut pages = Vec::with_capacity(posts.len().div_ceil(page_size));
        let mut posts = posts.into_iter().peekable();
        while posts.peek().is_some() {
            pages.push(Page {
                posts: posts.by_ref().take(page_size).collect(),
            });
        }
        self.pages = pages;

        tracing::trace!(
            target: crate::logging::targets::PAGES,
            pages = self.pages.len(),
            posts = self.count(),
            "pages rebuilt"
        );
    }

    /// Rebuild the pages from their current content.
    pub fn repaginate(&mut self) {
        let posts = self.take_posts();
        self.rebuild(posts);
    }

    /// Remove every page and return the posts in display order.
    pub fn take_posts(&mut self) -> Vec<Post> {
        std::mem::take(&mut self.pages)
            .into_iter()
            .flat_map(|page| page.posts)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posts_with_order(orders: &[(&str, f64)]) -> Vec<Post> {
        orders
            .iter()
            .map(|(id, order)| Post::new(*id).with_order(*order))
            .collect()
    }

    fn page_ids(store: &PageStore) -> Vec<Vec<&str>> {
        store.pages().iter().map(Page::ids).collect()
    }

    #[test]
    fn test_ascending_pages() {
        let mut store = PageStore::new(2, PostOrdering::Ascending);
        store.rebuild(posts_with_order(&[("3", 3.0), ("1", 1.0), ("2", 2.0)]));

        assert_eq!(page_ids(&store), vec![vec!["1", "2"], vec!["3"]]);
        assert_eq!(store.count(), 3);
    }

    #[test]
    fn test_descending_is_default() {
        let mut store = PageStore::new(2, PostOrdering::default());
        store.rebuild(posts_with_order(&[("1", 1.0), ("2", 2.0), ("3", 3.0)]));

        assert_eq!(page_ids(&store), vec![vec!["3", "2"], vec!["1"]]);
    }

    #[test]
    fn test_missing_order_goes_last() {
        let mut store = PageStore::new(10, PostOrdering::Descending);
        let mut posts = posts_with_order(&[("1", 1.0), ("2", 2.0)]);
        posts.insert(0, Post::new("none"));
        store.rebuild(posts);

        assert_eq!(page_ids(&store), vec![vec!["2", "1", "none"]]);

        let mut store = PageStore::new(10, PostOrdering::Ascending);
        let mut posts = posts_with_order(&[("2", 2.0), ("1", 1.0)]);
        posts.insert(0, Post::new("none"));
        store.rebuild(posts);

        assert_eq!(page_ids(&store), vec![vec!["1", "2", "none"]]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let mut store = PageStore::new(10, PostOrdering::Descending);
        store.rebuild(posts_with_order(&[("a", 1.0), ("b", 1.0), ("c", 2.0), ("d", 1.0)]));

        assert_eq!(page_ids(&store), vec![vec!["c", "a", "b", "d"]]);
    }

    #[test]
    fn test_page_sizes() {
        for total in 0..12usize {
            let mut store = PageStore::new(4, PostOrdering::Descending);
            let posts = (0..total)
                .map(|i| Post::new(i.to_string()).with_order(i as f64))
                .collect();
            store.rebuild(posts);

            assert_eq!(store.count(), total);
            assert_eq!(store.page_count(), total.div_ceil(4));
            if let Some((last, full)) = store.pages().split_last() {
                assert!(full.iter().all(|page| page.len() == 4));
                let expected_last = if total % 4 == 0 { 4 } else { total % 4 };
                assert_eq!(last.len(), expected_last);
            }
        }
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let mut store = PageStore::new(3, PostOrdering::Descending);
        store.rebuild(posts_with_order(&[("1", 5.0), ("2", 1.0), ("3", 9.0), ("4", 1.0)]));
        let first = store.pages().to_vec();

        store.rebuild(store.all_posts());
        assert_eq!(store.pages(), first.as_slice());

        store.repaginate();
        assert_eq!(store.pages(), first.as_slice());
    }

    #[test]
    fn test_position_and_get() {
        let mut store = PageStore::new(2, PostOrdering::Ascending);
        store.rebuild(posts_with_order(&[("1", 1.0), ("2", 2.0), ("3", 3.0)]));

        assert_eq!(store.position("1"), Some((0, 0)));
        assert_eq!(store.position("3"), Some((1, 0)));
        assert_eq!(store.position("4"), None);
        assert_eq!(store.get("2").and_then(|post| post.order), Some(2.0));
    }

    #[test]
    fn test_remove_then_repaginate() {
        let mut store = PageStore::new(2, PostOrdering::Ascending);
        store.rebuild(posts_with_order(&[("1", 1.0), ("2", 2.0), ("3", 3.0)]));

        let position = store.position("1").unwrap();
        let removed = store.remove_at(position);
        assert_eq!(removed.id, "1");

        // The hole stays until the next pass
        assert_eq!(page_ids(&store), vec![vec!["2"], vec!["3"]]);

        store.repaginate();
        assert_eq!(page_ids(&store), vec![vec!["2", "3"]]);
    }

    #[test]
    fn test_zero_max_results() {
        let mut store = PageStore::new(0, PostOrdering::Descending);
        store.rebuild(posts_with_order(&[("1", 1.0), ("2", 2.0)]));
        assert_eq!(store.max_results(), 1);
        assert_eq!(store.page_count(), 2);
    }
}
