//! The pagination engine.

use serde::{Deserialize, Serialize};

use crate::config::{HasMoreStrategy, PaginationConfig, StaleCursorPolicy};
use crate::cursor::{CursorCodec, Direction, TokenSource};
use crate::page::CursorPage;
use crate::store::{KeysetStore, Record, ScanPlan, Seek};
use crate::types::{KeysetQuery, SortKey, Value};
use crate::{KeysetError, KeysetResult, TRACING_TARGET_PAGINATE};

/// Per-request pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageRequest {
    /// Requested page size.
    ///
    /// `None` uses the configured default; zero or less returns every row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    /// Whether to count the rows from the anchor onward.
    pub include_count: bool,
    /// Path (with query string) links are built from.
    pub path: String,
}

impl PageRequest {
    /// Creates a request for a page of the default size.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    pub fn with_per_page(mut self, per_page: i64) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Enables counting the total.
    pub fn with_count(mut self) -> Self {
        self.include_count = true;
        self
    }

    /// Sets the path links are built from.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            per_page: None,
            include_count: false,
            path: "/".to_owned(),
        }
    }
}

/// Produces cursor pages from a [`KeysetStore`].
///
/// Holds only immutable configuration, so one paginator can be shared by
/// every request of a service.
///
/// ```rust,ignore
/// let paginator = Paginator::new(PaginationConfig::default())?;
/// let query = KeysetQuery::new("events", "id", OrderSpec::desc("created_at"));
/// let page = paginator
///     .paginate(&mut store, &query, &cursors, &PageRequest::new().with_path("/events"))
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Paginator {
    config: PaginationConfig,
    codec: CursorCodec,
}

impl Paginator {
    /// Creates a paginator, validating the configuration.
    pub fn new(config: PaginationConfig) -> KeysetResult<Self> {
        config.validate()?;
        let codec = config.codec();
        Ok(Self { config, codec })
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Returns the cursor codec.
    #[inline]
    pub fn codec(&self) -> &CursorCodec {
        &self.codec
    }

    /// Resolves the effective page size. `None` means unbounded.
    pub fn per_page(&self, request: &PageRequest) -> Option<u64> {
        let requested = match request.per_page {
            None => u64::from(self.config.default_per_page),
            Some(per_page) if per_page <= 0 => return None,
            Some(per_page) => per_page.unsigned_abs(),
        };

        match self.config.max_per_page {
            Some(max) if max > 0 => Some(requested.min(u64::from(max))),
            _ => Some(requested),
        }
    }

    /// Fetches one page of `query`, anchored by the cursor in `tokens`.
    #[tracing::instrument(
        skip_all,
        target = TRACING_TARGET_PAGINATE,
        fields(source = query.source())
    )]
    pub async fn paginate<S, T>(
        &self,
        store: &mut S,
        query: &KeysetQuery,
        tokens: &T,
        request: &PageRequest,
    ) -> KeysetResult<CursorPage<S::Row>>
    where
        S: KeysetStore,
        T: TokenSource,
    {
        let per_page = self.per_page(request);
        let sort_keys = query.sort_keys();

        let direction = match self.codec.decode(tokens) {
            Ok(direction) => direction,
            Err(error @ KeysetError::InvalidCursor(_)) => self.fail_open(error)?,
            Err(error) => return Err(error),
        };

        let (direction, seek) = self.seek(store, query, &sort_keys, direction).await?;
        let backward = direction.is_backward();

        let order = if backward {
            sort_keys.iter().map(SortKey::reversed).collect()
        } else {
            sort_keys.clone()
        };

        let limit = per_page.map(|per_page| match self.config.has_more_strategy {
            HasMoreStrategy::LookAhead => per_page + 1,
            HasMoreStrategy::Heuristic => per_page,
        });

        let plan = ScanPlan {
            query,
            order,
            seek,
            limit,
        };

        let total = if request.include_count {
            Some(store.count(&plan).await.map_err(KeysetError::store)?)
        } else {
            None
        };

        let mut rows = if total == Some(0) {
            tracing::debug!(target: TRACING_TARGET_PAGINATE, "Nothing to fetch, count is zero");
            Vec::new()
        } else {
            store.fetch(&plan).await.map_err(KeysetError::store)?
        };

        let more_in_scan = match (per_page, self.config.has_more_strategy) {
            (None, _) => false,
            (Some(per_page), HasMoreStrategy::LookAhead) => {
                let more = rows.len() as u64 > per_page;
                rows.truncate(per_page as usize);
                more
            }
            (Some(per_page), HasMoreStrategy::Heuristic) => {
                rows.len() as u64 == per_page && total.is_none_or(|total| total > per_page)
            }
        };

        if backward {
            rows.reverse();
        }

        let anchored = !direction.is_first();
        let (has_pages_before, has_pages_after) = if backward {
            (more_in_scan, anchored)
        } else {
            (anchored, more_in_scan)
        };

        let boundary = |row: &S::Row| boundary_key(row, query.primary_key(), &sort_keys);
        let first_key = rows.first().and_then(boundary);
        let last_key = rows.last().and_then(boundary);

        tracing::debug!(
            target: TRACING_TARGET_PAGINATE,
            count = rows.len(),
            ?total,
            ?per_page,
            has_pages_before,
            has_pages_after,
            "Fetched page"
        );

        Ok(CursorPage::new(
            rows,
            total,
            per_page,
            first_key,
            last_key,
            has_pages_before,
            has_pages_after,
        )
        .with_path(request.path.clone())
        .with_links(self.codec.clone(), self.config.link_mode))
    }

    /// Turns the anchor of `direction` into a boundary predicate.
    ///
    /// Returns the direction actually used, which is [`Direction::First`]
    /// when an unusable cursor was ignored.
    async fn seek<S: KeysetStore>(
        &self,
        store: &mut S,
        query: &KeysetQuery,
        sort_keys: &[SortKey],
        direction: Direction,
    ) -> KeysetResult<(Direction, Option<Seek>)> {
        let Some(cursor) = direction.cursor() else {
            return Ok((direction, None));
        };

        let Some(key) = query.key_kind().parse(cursor) else {
            let reason = format!("'{cursor}' is not a valid {} key", query.key_kind());
            let direction = self.fail_open(KeysetError::InvalidCursor(reason.into()))?;
            return Ok((direction, None));
        };

        let values = if let [_] = sort_keys {
            vec![key]
        } else {
            let row = store
                .lookup(query, &key)
                .await
                .map_err(KeysetError::store)?;

            let Some(row) = row else {
                let stale = KeysetError::StaleCursor {
                    cursor: cursor.to_string(),
                };
                let direction = self.fail_open(stale)?;
                return Ok((direction, None));
            };

            sort_keys
                .iter()
                .map(|sort_key| match row.value(&sort_key.column) {
                    None => Err(KeysetError::Config(
                        format!("record has no column '{}'", sort_key.column).into(),
                    )),
                    // Row comparisons against NULL never match.
                    Some(Value::Null) => Err(KeysetError::Config(
                        format!("column '{}' of the cursor record is NULL", sort_key.column)
                            .into(),
                    )),
                    Some(value) => Ok(value),
                })
                .collect::<KeysetResult<Vec<_>>>()?
        };

        let keys = if direction.is_backward() {
            sort_keys.iter().map(SortKey::reversed).collect()
        } else {
            sort_keys.to_vec()
        };

        Ok((direction, Some(Seek::new(keys, values))))
    }

    /// Applies the stale cursor policy to an unusable cursor.
    fn fail_open(&self, error: KeysetError) -> KeysetResult<Direction> {
        match self.config.stale_cursor_policy {
            StaleCursorPolicy::Reject => Err(error),
            StaleCursorPolicy::FailOpen => {
                tracing::warn!(
                    target: TRACING_TARGET_PAGINATE,
                    %error,
                    "Ignoring unusable cursor, serving the first page"
                );
                Ok(Direction::First)
            }
        }
    }
}

/// Primary key of a row, falling back to its cursor column.
fn boundary_key(row: &impl Record, primary_key: &str, sort_keys: &[SortKey]) -> Option<Value> {
    let present = |value: &Value| !value.is_null();

    row.value(primary_key).filter(present).or_else(|| {
        sort_keys
            .first()
            .and_then(|key| row.value(&key.column))
            .filter(present)
    })
}
