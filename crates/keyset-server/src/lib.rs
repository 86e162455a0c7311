#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging.

/// Tracing target for request extraction.
///
/// Use this target for logging cursor and query parameter extraction.
pub const TRACING_TARGET_EXTRACT: &str = "keyset_server::extract";

/// Tracing target for error responses.
pub const TRACING_TARGET_RESPONSE: &str = "keyset_server::response";

pub mod extract;
pub mod handler;

pub use crate::extract::{Cursors, PageParams, Query};
pub use crate::handler::{Error, ErrorKind, ErrorResponse, Page, Result};
