//! Values, ordering, filtering and query descriptions.

mod filtering;
mod query;
mod sorting;
mod value;

pub use filtering::{Comparison, Filter};
pub use query::KeysetQuery;
pub use sorting::{OrderSpec, SortKey, SortOrder};
pub use value::{KeyKind, Value};
