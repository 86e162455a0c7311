//! Filtering options for keyset scans.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::Value;

/// Comparison operator of a [`Filter`].
#[derive(
    Debug,
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Comparison {
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl Comparison {
    /// Returns the SQL operator.
    #[inline]
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// Returns whether `ordering` (left compared to right) satisfies this operator.
    #[inline]
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Eq => ordering.is_eq(),
            Self::Ne => ordering.is_ne(),
            Self::Lt => ordering.is_lt(),
            Self::Le => ordering.is_le(),
            Self::Gt => ordering.is_gt(),
            Self::Ge => ordering.is_ge(),
        }
    }
}

/// A `column <op> value` predicate supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// The filtered column.
    pub column: String,
    /// The comparison operator.
    pub comparison: Comparison,
    /// The right-hand value.
    pub value: Value,
}

impl Filter {
    /// Creates a new filter.
    pub fn new(column: impl Into<String>, comparison: Comparison, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            comparison,
            value: value.into(),
        }
    }

    /// Creates a `column = value` filter.
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Comparison::Eq, value)
    }

    /// Creates a `column <> value` filter.
    pub fn ne(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Comparison::Ne, value)
    }

    /// Creates a `column < value` filter.
    pub fn lt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Comparison::Lt, value)
    }

    /// Creates a `column <= value` filter.
    pub fn le(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Comparison::Le, value)
    }

    /// Creates a `column > value` filter.
    pub fn gt(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Comparison::Gt, value)
    }

    /// Creates a `column >= value` filter.
    pub fn ge(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(column, Comparison::Ge, value)
    }

    /// Evaluates the filter against a column value.
    ///
    /// Follows SQL semantics: any comparison involving `NULL` is false.
    pub fn matches(&self, value: &Value) -> bool {
        if value.is_null() || self.value.is_null() {
            return false;
        }

        value
            .compare(&self.value)
            .is_some_and(|ordering| self.comparison.holds(ordering))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_matches() {
        assert!(Filter::eq("owner", 5).matches(&Value::Int(5)));
        assert!(!Filter::eq("owner", 5).matches(&Value::Int(6)));
        assert!(Filter::ge("score", 1.5).matches(&Value::Int(2)));
        assert!(Filter::ne("status", "draft").matches(&Value::Text("live".into())));
    }

    #[test]
    fn filter_null_never_matches() {
        assert!(!Filter::eq("owner", 5).matches(&Value::Null));
        assert!(!Filter::ne("owner", Value::Null).matches(&Value::Int(1)));
    }

    #[test]
    fn comparison_sql() {
        assert_eq!(Comparison::Ne.as_sql(), "<>");
        assert_eq!(Comparison::Ge.as_sql(), ">=");
    }
}
