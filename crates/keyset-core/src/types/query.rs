//! Description of a paginated collection.

use serde::{Deserialize, Serialize};

use super::{Filter, KeyKind, OrderSpec, SortKey};

/// A filtered, ordered collection to paginate.
///
/// ```rust
/// use keyset_core::types::{Filter, KeyKind, KeysetQuery, OrderSpec};
///
/// let query = KeysetQuery::new("events", "id", OrderSpec::desc("created_at"))
///     .with_key_kind(KeyKind::Int)
///     .filter(Filter::eq("owner_id", 7));
///
/// assert_eq!(query.sort_keys().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeysetQuery {
    source: String,
    primary_key: String,
    #[serde(default)]
    key_kind: KeyKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    filters: Vec<Filter>,
    order: OrderSpec,
}

impl KeysetQuery {
    /// Creates a query over `source` identified by `primary_key`.
    pub fn new(source: impl Into<String>, primary_key: impl Into<String>, order: OrderSpec) -> Self {
        Self {
            source: source.into(),
            primary_key: primary_key.into(),
            key_kind: KeyKind::default(),
            filters: Vec::new(),
            order,
        }
    }

    /// Sets how cursor tokens parse into primary keys.
    pub fn with_key_kind(mut self, key_kind: KeyKind) -> Self {
        self.key_kind = key_kind;
        self
    }

    /// Adds a filter. Filters are combined with `AND`.
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Replaces the ordering.
    pub fn with_order(mut self, order: OrderSpec) -> Self {
        self.order = order;
        self
    }

    /// Returns the source (table or view) name.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the primary key column.
    #[inline]
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Returns the primary key kind.
    #[inline]
    pub fn key_kind(&self) -> KeyKind {
        self.key_kind
    }

    /// Returns the caller filters.
    #[inline]
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Returns the declared ordering.
    #[inline]
    pub fn order(&self) -> &OrderSpec {
        &self.order
    }

    /// Returns the total ordering in natural (forward) direction.
    pub fn sort_keys(&self) -> Vec<SortKey> {
        self.order.resolve(&self.primary_key)
    }
}
