//! In-memory [`KeysetStore`] over a vector of rows.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::convert::Infallible;

use crate::store::{KeysetStore, Record, ScanPlan};
use crate::types::{KeysetQuery, SortKey, Value};

static NULL: Value = Value::Null;

/// A row of named column values.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemoryRow(BTreeMap<String, Value>);

impl MemoryRow {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column value.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    /// Returns a column value.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    fn get_or_null(&self, column: &str) -> &Value {
        self.get(column).unwrap_or(&NULL)
    }
}

impl Record for MemoryRow {
    fn value(&self, column: &str) -> Option<Value> {
        self.0.get(column).cloned()
    }
}

/// Number of queries a [`MemoryStore`] has executed, per kind.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueryLog {
    /// Executed counts.
    pub counts: usize,
    /// Executed fetches.
    pub fetches: usize,
    /// Executed lookups.
    pub lookups: usize,
}

/// A store that evaluates scan plans over rows held in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    rows: Vec<MemoryRow>,
    log: QueryLog,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding the given rows.
    pub fn from_rows(rows: impl IntoIterator<Item = MemoryRow>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            log: QueryLog::default(),
        }
    }

    /// Adds a row.
    pub fn insert(&mut self, row: MemoryRow) {
        self.rows.push(row);
    }

    /// Removes every row whose `column` equals `value`, returning how many were removed.
    pub fn remove(&mut self, column: &str, value: &Value) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| row.get(column) != Some(value));
        before - self.rows.len()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the executed queries.
    pub fn log(&self) -> QueryLog {
        self.log
    }

    /// Clears the query log.
    pub fn reset_log(&mut self) {
        self.log = QueryLog::default();
    }

    fn matching(&self, plan: &ScanPlan<'_>) -> Vec<&MemoryRow> {
        self.rows
            .iter()
            .filter(|row| {
                plan.query
                    .filters()
                    .iter()
                    .all(|filter| filter.matches(row.get_or_null(&filter.column)))
            })
            .filter(|row| plan.seek.as_ref().is_none_or(|seek| seek.admits(*row)))
            .collect()
    }
}

fn compare_rows(a: &MemoryRow, b: &MemoryRow, order: &[SortKey]) -> Ordering {
    for key in order {
        let ordering = a
            .get_or_null(&key.column)
            .compare(b.get_or_null(&key.column))
            .unwrap_or(Ordering::Equal);

        match key.order.apply(ordering) {
            Ordering::Equal => continue,
            ordering => return ordering,
        }
    }

    Ordering::Equal
}

impl KeysetStore for MemoryStore {
    type Error = Infallible;
    type Row = MemoryRow;

    async fn count(&mut self, plan: &ScanPlan<'_>) -> Result<u64, Self::Error> {
        self.log.counts += 1;
        Ok(self.matching(plan).len() as u64)
    }

    async fn fetch(&mut self, plan: &ScanPlan<'_>) -> Result<Vec<Self::Row>, Self::Error> {
        self.log.fetches += 1;

        let mut rows = self.matching(plan);
        rows.sort_by(|a, b| compare_rows(a, b, &plan.order));

        let limit = plan
            .limit
            .and_then(|limit| usize::try_from(limit).ok())
            .unwrap_or(usize::MAX);
        Ok(rows.into_iter().take(limit).cloned().collect())
    }

    async fn lookup(
        &mut self,
        query: &KeysetQuery,
        key: &Value,
    ) -> Result<Option<Self::Row>, Self::Error> {
        self.log.lookups += 1;

        let found = self
            .rows
            .iter()
            .find(|row| row.get(query.primary_key()) == Some(key));
        Ok(found.cloned())
    }
}
