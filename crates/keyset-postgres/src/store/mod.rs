//! PostgreSQL implementation of the keyset store.
//!
//! Scan plans are rendered to plain parameterized SQL rather than through the
//! diesel DSL, since the source table, the ordering and the filters are only
//! known at runtime.

mod pg_store;
mod sql;

pub use self::pg_store::PgStore;
pub use self::sql::{SqlStatement, quote_ident, quote_path};
