//! [`Error`], [`ErrorKind`] and [`Result`].

mod http_error;
mod keyset_error;
mod pg_error;

pub use http_error::{Error, ErrorKind, Result};
