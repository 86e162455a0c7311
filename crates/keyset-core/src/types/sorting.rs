//! Sorting options for keyset scans.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Sort order direction.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr
)]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SortOrder {
    /// Ascending order (A-Z, oldest first, smallest first).
    Asc,
    /// Descending order (Z-A, newest first, largest first).
    #[default]
    Desc,
}

impl SortOrder {
    /// Returns the opposite direction.
    #[inline]
    pub fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Returns whether the sort order is ascending.
    #[inline]
    pub fn is_asc(self) -> bool {
        matches!(self, Self::Asc)
    }

    /// Maps a natural (ascending) comparison into this direction.
    #[inline]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }

    /// Returns the SQL keyword for this direction.
    #[inline]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A single `(column, direction)` sort key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    /// The column to sort by.
    pub column: String,
    /// The sort order direction.
    #[serde(default)]
    pub order: SortOrder,
}

impl SortKey {
    /// Creates a new sort key with the given column and order.
    #[inline]
    pub fn new(column: impl Into<String>, order: SortOrder) -> Self {
        Self {
            column: column.into(),
            order,
        }
    }

    /// Creates a new sort key with ascending order.
    #[inline]
    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Asc)
    }

    /// Creates a new sort key with descending order.
    #[inline]
    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Desc)
    }

    /// Returns the same column sorted the other way.
    #[inline]
    pub fn reversed(&self) -> Self {
        Self::new(self.column.clone(), self.order.reverse())
    }
}

/// Explicit ordering of a paginated collection.
///
/// The first key is the cursor column; the rest are tie-breakers applied in
/// declaration order. The ordering is built once and passed through as is,
/// so the full sort of every page is known before any query runs.
///
/// ```rust
/// use keyset_core::types::{OrderSpec, SortOrder};
///
/// let order = OrderSpec::desc("created_at").then_asc("title");
/// assert_eq!(order.cursor().column, "created_at");
/// assert_eq!(order.tie_breakers()[0].order, SortOrder::Asc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSpec {
    cursor: SortKey,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tie_breakers: Vec<SortKey>,
}

impl OrderSpec {
    /// Creates an ordering on the given cursor column.
    pub fn new(column: impl Into<String>, order: SortOrder) -> Self {
        Self {
            cursor: SortKey::new(column, order),
            tie_breakers: Vec::new(),
        }
    }

    /// Creates an ascending ordering on the given cursor column.
    pub fn asc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Asc)
    }

    /// Creates a descending ordering on the given cursor column.
    pub fn desc(column: impl Into<String>) -> Self {
        Self::new(column, SortOrder::Desc)
    }

    /// Appends a tie-breaker.
    pub fn then_by(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.tie_breakers.push(SortKey::new(column, order));
        self
    }

    /// Appends an ascending tie-breaker.
    pub fn then_asc(self, column: impl Into<String>) -> Self {
        self.then_by(column, SortOrder::Asc)
    }

    /// Appends a descending tie-breaker.
    pub fn then_desc(self, column: impl Into<String>) -> Self {
        self.then_by(column, SortOrder::Desc)
    }

    /// Returns the cursor column.
    #[inline]
    pub fn cursor(&self) -> &SortKey {
        &self.cursor
    }

    /// Returns the declared tie-breakers.
    #[inline]
    pub fn tie_breakers(&self) -> &[SortKey] {
        &self.tie_breakers
    }

    /// Resolves the total ordering used for scans and boundaries.
    ///
    /// Repeated columns are dropped, the primary key is appended with the
    /// cursor column's direction when absent, and keys after the primary key
    /// are cut since they can never break a tie.
    pub fn resolve(&self, primary_key: &str) -> Vec<SortKey> {
        let mut keys: Vec<SortKey> = Vec::with_capacity(self.tie_breakers.len() + 2);

        for key in std::iter::once(&self.cursor).chain(&self.tie_breakers) {
            if keys.iter().any(|k| k.column == key.column) {
                continue;
            }

            keys.push(key.clone());
            if key.column == primary_key {
                return keys;
            }
        }

        keys.push(SortKey::new(primary_key, self.cursor.order));
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_appends_primary_key() {
        let keys = OrderSpec::desc("created").resolve("id");
        assert_eq!(keys, vec![SortKey::desc("created"), SortKey::desc("id")]);
    }

    #[test]
    fn resolve_keeps_declared_tie_breakers() {
        let keys = OrderSpec::desc("created")
            .then_asc("title")
            .then_asc("id")
            .resolve("id");

        assert_eq!(
            keys,
            vec![
                SortKey::desc("created"),
                SortKey::asc("title"),
                SortKey::asc("id"),
            ]
        );
    }

    #[test]
    fn resolve_stops_at_primary_key() {
        let keys = OrderSpec::asc("id").then_desc("created").resolve("id");
        assert_eq!(keys, vec![SortKey::asc("id")]);
    }

    #[test]
    fn resolve_drops_repeated_columns() {
        let keys = OrderSpec::desc("created")
            .then_asc("created")
            .resolve("id");
        assert_eq!(keys, vec![SortKey::desc("created"), SortKey::desc("id")]);
    }

    #[test]
    fn sort_order_apply() {
        assert_eq!(SortOrder::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(SortOrder::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortOrder::Desc.reverse(), SortOrder::Asc);
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }
}
