//! Result of a cursor-paginated query.

use crate::cursor::{CursorCodec, Edge, LinkMode};
use crate::types::Value;

/// One page of records plus its position in the collection.
///
/// Items are always in the collection's natural order, whatever the
/// direction of the scan that produced them.
#[derive(Debug, Clone)]
pub struct CursorPage<T> {
    items: Vec<T>,
    total: Option<u64>,
    per_page: Option<u64>,
    first_key: Option<Value>,
    last_key: Option<Value>,
    has_pages_before: bool,
    has_pages_after: bool,
    path: String,
    codec: CursorCodec,
    link_mode: LinkMode,
}

impl<T> CursorPage<T> {
    /// Creates a page from already trimmed items.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        items: Vec<T>,
        total: Option<u64>,
        per_page: Option<u64>,
        first_key: Option<Value>,
        last_key: Option<Value>,
        has_pages_before: bool,
        has_pages_after: bool,
    ) -> Self {
        Self {
            items,
            total,
            per_page,
            first_key,
            last_key,
            has_pages_before,
            has_pages_after,
            path: "/".to_owned(),
            codec: CursorCodec::default(),
            link_mode: LinkMode::default(),
        }
    }

    /// Creates an empty page.
    pub fn empty(per_page: Option<u64>) -> Self {
        Self::new(Vec::new(), Some(0), per_page, None, None, false, false)
    }

    /// Sets the path links are built from.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets how links are encoded and when they are produced.
    pub fn with_links(mut self, codec: CursorCodec, link_mode: LinkMode) -> Self {
        self.codec = codec;
        self.link_mode = link_mode;
        self
    }

    /// Returns the items.
    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page, returning the items.
    #[inline]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the number of items on this page.
    #[inline]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Returns whether the page has no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of rows matching the query from the anchor onward,
    /// if it was counted.
    #[inline]
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Returns the page size, or `None` for unbounded pages.
    #[inline]
    pub fn per_page(&self) -> Option<u64> {
        self.per_page
    }

    /// Returns the key of the first item.
    #[inline]
    pub fn first_key(&self) -> Option<&Value> {
        self.first_key.as_ref()
    }

    /// Returns the key of the last item.
    #[inline]
    pub fn last_key(&self) -> Option<&Value> {
        self.last_key.as_ref()
    }

    /// Returns whether records precede this page.
    #[inline]
    pub fn has_pages_before(&self) -> bool {
        self.has_pages_before
    }

    /// Returns whether records follow this page.
    #[inline]
    pub fn has_pages_after(&self) -> bool {
        self.has_pages_after
    }

    /// Returns whether there is a page on either side.
    #[inline]
    pub fn has_more_pages(&self) -> bool {
        self.has_pages_before || self.has_pages_after
    }

    /// Returns the path links are built from.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the key the previous page is anchored to.
    pub fn before_key(&self) -> Option<&Value> {
        self.edge_key(Edge::Before)
    }

    /// Returns the key the next page is anchored to.
    pub fn after_key(&self) -> Option<&Value> {
        self.edge_key(Edge::After)
    }

    /// Returns the link to the previous page.
    ///
    /// An explicit `key` overrides the page's own boundary.
    pub fn before_url(&self, key: Option<&Value>) -> Option<String> {
        self.url(Edge::Before, key)
    }

    /// Returns the link to the next page.
    ///
    /// An explicit `key` overrides the page's own boundary.
    pub fn after_url(&self, key: Option<&Value>) -> Option<String> {
        self.url(Edge::After, key)
    }

    /// Returns the cursor query pair for the given edge, e.g. `after=42`.
    pub fn token(&self, edge: Edge) -> Option<String> {
        self.codec.encode(edge, self.edge_key(edge))
    }

    fn url(&self, edge: Edge, key: Option<&Value>) -> Option<String> {
        let key = key.or_else(|| self.edge_key(edge));
        self.codec.url(&self.path, edge, key)
    }

    fn edge_key(&self, edge: Edge) -> Option<&Value> {
        let (key, has_pages) = match edge {
            Edge::Before => (self.first_key.as_ref(), self.has_pages_before),
            Edge::After => (self.last_key.as_ref(), self.has_pages_after),
        };

        match self.link_mode {
            LinkMode::Suppress if !has_pages => None,
            _ => key,
        }
    }

    /// Maps the items to a different type.
    pub fn map<U, F>(self, f: F) -> CursorPage<U>
    where
        F: FnMut(T) -> U,
    {
        CursorPage {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            per_page: self.per_page,
            first_key: self.first_key,
            last_key: self.last_key,
            has_pages_before: self.has_pages_before,
            has_pages_after: self.has_pages_after,
            path: self.path,
            codec: self.codec,
            link_mode: self.link_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn middle_page() -> CursorPage<i32> {
        CursorPage::new(
            vec![3, 4],
            None,
            Some(2),
            Some(Value::Int(3)),
            Some(Value::Int(4)),
            true,
            false,
        )
        .with_path("/events?sort=desc")
    }

    #[test]
    fn suppressed_links() {
        let page = middle_page();
        assert_eq!(
            page.before_url(None).as_deref(),
            Some("/events?sort=desc&before=3")
        );
        assert_eq!(page.after_url(None), None);
        assert_eq!(page.after_key(), None);
        assert_eq!(page.last_key(), Some(&Value::Int(4)));
        assert_eq!(page.token(Edge::Before).as_deref(), Some("before=3"));
    }

    #[test]
    fn always_links() {
        let page = middle_page().with_links(CursorCodec::default(), LinkMode::Always);
        assert_eq!(
            page.after_url(None).as_deref(),
            Some("/events?sort=desc&after=4")
        );
    }

    #[test]
    fn explicit_key_overrides_boundary() {
        let page = middle_page();
        assert_eq!(
            page.after_url(Some(&Value::Int(9))).as_deref(),
            Some("/events?sort=desc&after=9")
        );
    }

    #[test]
    fn empty_page() {
        let page: CursorPage<i32> = CursorPage::empty(Some(15));
        assert!(page.is_empty());
        assert_eq!(page.total(), Some(0));
        assert_eq!(page.first_key(), None);
        assert_eq!(page.before_url(None), None);
        assert!(!page.has_more_pages());
    }

    #[test]
    fn map_keeps_metadata() {
        let page = middle_page().map(|item| item.to_string());
        assert_eq!(page.items(), ["3".to_owned(), "4".to_owned()]);
        assert!(page.has_pages_before());
        assert_eq!(page.path(), "/events?sort=desc");
    }
}
