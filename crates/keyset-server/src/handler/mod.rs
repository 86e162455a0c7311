//! Error and response types for paginated handlers.
//!
//! A typical handler extracts [`Cursors`] and [`PageParams`], runs the
//! [`Paginator`] and returns `Result<Json<Page<T>>>`; store and cursor
//! failures convert into [`Error`] with `?`.
//!
//! [`Cursors`]: crate::Cursors
//! [`PageParams`]: crate::PageParams
//! [`Paginator`]: keyset_core::Paginator

mod error;
mod response;

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::{ErrorResponse, Page};
