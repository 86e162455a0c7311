#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging.

/// Tracing target for page production.
///
/// Use this target for logging cursor resolution, scans and page boundaries.
pub const TRACING_TARGET_PAGINATE: &str = "keyset_core::paginate";

/// Tracing target for cursor encoding and decoding.
pub const TRACING_TARGET_CODEC: &str = "keyset_core::codec";

mod config;
mod engine;
mod error;
mod page;
mod store;

pub mod cursor;
#[cfg(any(test, feature = "mock"))]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
pub mod mock;
#[doc(hidden)]
pub mod prelude;
pub mod types;

pub use crate::config::{
    DEFAULT_PER_PAGE, HasMoreStrategy, MAX_PER_PAGE, PaginationConfig, StaleCursorPolicy,
};
pub use crate::engine::{PageRequest, Paginator};
pub use crate::error::{BoxError, KeysetError, KeysetResult};
pub use crate::page::CursorPage;
pub use crate::store::{KeysetStore, Record, ScanPlan, Seek};
