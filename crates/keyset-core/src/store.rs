//! The query engine a [`Paginator`](crate::Paginator) pages through.
//!
//! The engine never builds queries itself. It describes each scan as a
//! [`ScanPlan`] and leaves rendering and execution to a [`KeysetStore`].

use std::cmp::Ordering;
use std::future::Future;

use crate::types::{KeysetQuery, SortKey, Value};

/// A fetched record that exposes its column values.
pub trait Record {
    /// Returns the value of `column`, or `None` if the record has no such column.
    fn value(&self, column: &str) -> Option<Value>;
}

/// Boundary predicate: rows strictly after `values` in the order of `keys`.
///
/// `keys` is the scan order, so for backward scans the directions are
/// already reversed. The predicate is lexicographic: a row qualifies when its
/// first differing key sorts after the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Seek {
    /// Scan order keys.
    pub keys: Vec<SortKey>,
    /// Boundary values, one per key.
    pub values: Vec<Value>,
}

impl Seek {
    /// Creates a seek predicate.
    pub fn new(keys: Vec<SortKey>, values: Vec<Value>) -> Self {
        debug_assert_eq!(keys.len(), values.len());
        Self { keys, values }
    }

    /// Returns `(key, boundary value)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&SortKey, &Value)> {
        self.keys.iter().zip(&self.values)
    }

    /// Evaluates the predicate against a record.
    pub fn admits(&self, record: &impl Record) -> bool {
        for (key, boundary) in self.pairs() {
            let value = record.value(&key.column).unwrap_or(Value::Null);
            match value.compare(boundary).map(|ordering| key.order.apply(ordering)) {
                Some(Ordering::Equal) => continue,
                Some(Ordering::Greater) => return true,
                Some(Ordering::Less) | None => return false,
            }
        }

        false
    }
}

/// Everything a store needs to execute one scan.
#[derive(Debug, Clone)]
pub struct ScanPlan<'a> {
    /// The collection being paged.
    pub query: &'a KeysetQuery,
    /// Total ordering in scan direction.
    pub order: Vec<SortKey>,
    /// Boundary predicate, absent for the first page.
    pub seek: Option<Seek>,
    /// Row limit, absent for unbounded scans.
    pub limit: Option<u64>,
}

/// Query engine collaborator.
///
/// Implementations must apply the query filters and the seek predicate to
/// both [`count`](Self::count) and [`fetch`](Self::fetch), so that the total
/// reflects exactly the rows a bounded fetch walks through.
pub trait KeysetStore {
    /// Fetched row type.
    type Row: Record + Send;
    /// Store error type.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Counts the rows matching the plan, ignoring its order and limit.
    fn count(
        &mut self,
        plan: &ScanPlan<'_>,
    ) -> impl Future<Output = Result<u64, Self::Error>> + Send;

    /// Fetches the rows matching the plan in scan order.
    fn fetch(
        &mut self,
        plan: &ScanPlan<'_>,
    ) -> impl Future<Output = Result<Vec<Self::Row>, Self::Error>> + Send;

    /// Looks up a single row by primary key, ignoring filters.
    fn lookup(
        &mut self,
        query: &KeysetQuery,
        key: &Value,
    ) -> impl Future<Output = Result<Option<Self::Row>, Self::Error>> + Send;
}
