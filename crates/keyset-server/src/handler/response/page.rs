use keyset_core::CursorPage;
use keyset_core::types::Value;
use serde::{Deserialize, Serialize};

/// JSON body of a cursor-paginated response.
///
/// `beforeUrl` and `afterUrl` are absent when there is no page on that side,
/// so clients can follow links until one disappears.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items in this page, in collection order.
    pub items: Vec<T>,
    /// Number of items in this page.
    pub count: usize,
    /// Effective page size. Absent when the page is unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
    /// Rows from the page's anchor onward (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Key of the first item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_key: Option<Value>,
    /// Key of the last item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_key: Option<Value>,
    /// Whether records exist before the first item.
    pub has_pages_before: bool,
    /// Whether records exist after the last item.
    pub has_pages_after: bool,
    /// Link to the previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before_url: Option<String>,
    /// Link to the next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_url: Option<String>,
}

impl<T> Page<T> {
    /// Creates a response body from a [`CursorPage`], converting each item.
    pub fn from_cursor_page<U, F>(page: CursorPage<U>, f: F) -> Self
    where
        F: FnMut(U) -> T,
    {
        let before_url = page.before_url(None);
        let after_url = page.after_url(None);
        let per_page = page.per_page();
        let total = page.total();
        let first_key = page.first_key().cloned();
        let last_key = page.last_key().cloned();
        let has_pages_before = page.has_pages_before();
        let has_pages_after = page.has_pages_after();
        let items: Vec<T> = page.into_items().into_iter().map(f).collect();

        Self {
            count: items.len(),
            items,
            per_page,
            total,
            first_key,
            last_key,
            has_pages_before,
            has_pages_after,
            before_url,
            after_url,
        }
    }

    /// Returns true if there is a page on either side.
    pub fn has_more(&self) -> bool {
        self.has_pages_before || self.has_pages_after
    }
}

impl<T> From<CursorPage<T>> for Page<T> {
    fn from(page: CursorPage<T>) -> Self {
        Self::from_cursor_page(page, |item| item)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::Json;
    use axum::extract::State;
    use axum::routing::{Router, get};
    use axum_test::TestServer;
    use keyset_core::cursor::LinkMode;
    use keyset_core::mock::{MemoryRow, MemoryStore};
    use keyset_core::types::{KeyKind, KeysetQuery, OrderSpec};
    use keyset_core::{PaginationConfig, Paginator, StaleCursorPolicy};
    use tokio::sync::Mutex;

    use super::*;
    use crate::extract::{Cursors, PageParams, Query};
    use crate::handler::Result;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Event {
        id: i64,
        created: i64,
    }

    impl From<MemoryRow> for Event {
        fn from(row: MemoryRow) -> Self {
            let int = |column| row.get(column).and_then(Value::as_int).unwrap_or_default();
            Self {
                id: int("id"),
                created: int("created"),
            }
        }
    }

    #[derive(Clone)]
    struct AppState {
        paginator: Arc<Paginator>,
        store: Arc<Mutex<MemoryStore>>,
        events: Arc<KeysetQuery>,
    }

    async fn list_events(
        State(state): State<AppState>,
        cursors: Cursors,
        Query(params): Query<PageParams>,
    ) -> Result<Json<Page<Event>>> {
        let request = params.into_request(cursors.path());
        let mut store = state.store.lock().await;

        let page = state
            .paginator
            .paginate(&mut *store, &state.events, &cursors, &request)
            .await?;

        Ok(Json(Page::from_cursor_page(page, Event::from)))
    }

    fn event(id: i64, created: i64) -> MemoryRow {
        MemoryRow::new().with("id", id).with("created", created)
    }

    fn server(config: PaginationConfig) -> anyhow::Result<TestServer> {
        let rows = [event(1, 10), event(2, 9), event(3, 8), event(4, 7)];
        let state = AppState {
            paginator: Arc::new(Paginator::new(config)?),
            store: Arc::new(Mutex::new(MemoryStore::from_rows(rows))),
            events: Arc::new(
                KeysetQuery::new("events", "id", OrderSpec::desc("created"))
                    .with_key_kind(KeyKind::Int),
            ),
        };

        let router = Router::new()
            .route("/events", get(list_events))
            .with_state(state);
        Ok(TestServer::new(router)?)
    }

    #[test]
    fn from_cursor_page() {
        let page = CursorPage::new(
            vec![1, 2],
            Some(4),
            Some(2),
            Some(Value::Int(1)),
            Some(Value::Int(2)),
            false,
            true,
        )
        .with_path("/numbers?owner=7");

        let page = Page::from_cursor_page(page, |n| n * 10);
        assert_eq!(page.items, [10, 20]);
        assert_eq!(page.count, 2);
        assert_eq!(page.total, Some(4));
        assert!(page.has_more());
        assert_eq!(page.before_url, None);
        assert_eq!(page.after_url.as_deref(), Some("/numbers?owner=7&after=2"));
    }

    #[test]
    fn serializes_camel_case() -> anyhow::Result<()> {
        let page: Page<i64> = CursorPage::empty(Some(15)).into();
        let json = serde_json::to_value(&page)?;

        assert_eq!(json["perPage"], 15);
        assert_eq!(json["total"], 0);
        assert_eq!(json["hasPagesBefore"], false);
        assert_eq!(json["hasPagesAfter"], false);
        assert!(json.get("afterUrl").is_none());
        assert!(json.get("firstKey").is_none());

        Ok(())
    }

    #[tokio::test]
    async fn pages_forward_and_back() -> anyhow::Result<()> {
        let server = server(PaginationConfig::default())?;

        let first: Page<Event> = server.get("/events?perPage=2").await.json();
        assert_eq!(first.items, [Event { id: 1, created: 10 }, Event { id: 2, created: 9 }]);
        assert!(!first.has_pages_before);
        assert!(first.has_pages_after);
        assert_eq!(first.before_url, None);
        let after_url = first.after_url.clone().unwrap_or_default();
        assert_eq!(after_url, "/events?perPage=2&after=2");

        let second: Page<Event> = server.get(&after_url).await.json();
        assert_eq!(second.items, [Event { id: 3, created: 8 }, Event { id: 4, created: 7 }]);
        assert!(second.has_pages_before);
        assert!(!second.has_pages_after);
        assert_eq!(second.after_url, None);
        let before_url = second.before_url.clone().unwrap_or_default();
        assert_eq!(before_url, "/events?perPage=2&before=3");

        let back: Page<Event> = server.get(&before_url).await.json();
        assert_eq!(back.items, first.items);
        assert_eq!(back.after_url.as_deref(), Some("/events?perPage=2&after=2"));

        Ok(())
    }

    #[tokio::test]
    async fn follows_links_with_custom_param_names() -> anyhow::Result<()> {
        let server = server(PaginationConfig::default().with_param_names("prev", "next"))?;

        let first: Page<Event> = server.get("/events?perPage=2").await.json();
        let after_url = first.after_url.clone().unwrap_or_default();
        assert_eq!(after_url, "/events?perPage=2&next=2");

        let second: Page<Event> = server.get(&after_url).await.json();
        assert_eq!(second.items, [Event { id: 3, created: 8 }, Event { id: 4, created: 7 }]);
        assert!(!second.has_pages_after);
        let before_url = second.before_url.clone().unwrap_or_default();
        assert_eq!(before_url, "/events?perPage=2&prev=3");

        let back: Page<Event> = server.get(&before_url).await.json();
        assert_eq!(back.items, first.items);

        // Default names are not cursors under this configuration.
        let page: Page<Event> = server.get("/events?perPage=2&after=2").await.json();
        assert_eq!(page.items, first.items);

        Ok(())
    }

    #[tokio::test]
    async fn total_count_on_request() -> anyhow::Result<()> {
        let server = server(PaginationConfig::default())?;

        let page: Page<Event> = server.get("/events?perPage=3&includeCount=true").await.json();
        assert_eq!(page.count, 3);
        assert_eq!(page.total, Some(4));

        let page: Page<Event> = server.get("/events?perPage=3").await.json();
        assert_eq!(page.total, None);

        Ok(())
    }

    #[tokio::test]
    async fn stale_cursor_falls_back_to_first_page() -> anyhow::Result<()> {
        let server = server(PaginationConfig::default())?;

        let page: Page<Event> = server.get("/events?perPage=2&after=99").await.json();
        assert_eq!(page.first_key, Some(Value::Int(1)));
        assert!(!page.has_pages_before);

        Ok(())
    }

    #[tokio::test]
    async fn stale_cursor_rejected() -> anyhow::Result<()> {
        let config = PaginationConfig::default().with_stale_cursor_policy(StaleCursorPolicy::Reject);
        let server = server(config)?;

        let response = server.get("/events?after=99").await;
        response.assert_status_bad_request();

        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "invalid_cursor");
        assert!(body["suggestion"].is_string());

        let response = server.get("/events?after=not-a-number").await;
        response.assert_status_bad_request();

        Ok(())
    }

    #[tokio::test]
    async fn links_always_present() -> anyhow::Result<()> {
        let config = PaginationConfig::default().with_link_mode(LinkMode::Always);
        let server = server(config)?;

        let page: Page<Event> = server.get("/events?perPage=4").await.json();
        assert!(!page.has_pages_after);
        assert_eq!(page.before_url.as_deref(), Some("/events?perPage=4&before=1"));
        assert_eq!(page.after_url.as_deref(), Some("/events?perPage=4&after=4"));

        Ok(())
    }
}
