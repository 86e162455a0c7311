//! Request extractors for paginated endpoints.
//!
//! - [`Cursors`] - the raw `before`/`after` tokens and the request path
//! - [`Query`] - query string deserialization with descriptive rejections
//! - [`PageParams`] - the `perPage` and `includeCount` parameters

mod cursors;
mod page_params;
mod query;

pub use crate::extract::cursors::Cursors;
pub use crate::extract::page_params::PageParams;
pub use crate::extract::query::Query;
