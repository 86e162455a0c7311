//! Error types for pagination operations.
//!
//! See [`KeysetError`] for the main error type used throughout this crate.

use std::borrow::Cow;

/// Type-erased error type for errors raised by a store.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Comprehensive error type for cursor pagination.
///
/// Only [`KeysetError::Store`] originates outside of this crate. The cursor
/// variants are raised only when the matching policy in
/// [`PaginationConfig`] asks for it; under the default policies the engine
/// falls back to the first page instead.
///
/// [`PaginationConfig`]: crate::PaginationConfig
#[derive(Debug, thiserror::Error)]
#[must_use = "pagination errors should be handled appropriately"]
pub enum KeysetError {
    /// Invalid pagination configuration or query shape.
    #[error("Configuration error: {0}")]
    Config(Cow<'static, str>),

    /// A cursor token could not be decoded.
    ///
    /// This covers malformed opaque tokens and keys that do not parse as
    /// the collection's primary key kind.
    #[error("Invalid cursor: {0}")]
    InvalidCursor(Cow<'static, str>),

    /// A cursor points at a record that no longer exists.
    #[error("Cursor '{cursor}' no longer references a record")]
    StaleCursor {
        /// The raw cursor value that failed to resolve.
        cursor: String,
    },

    /// Both a `before` and an `after` cursor were supplied.
    #[error("Both 'before' and 'after' cursors were supplied")]
    ConflictingCursors,

    /// The underlying store failed to execute a query.
    #[error("Store error: {0}")]
    Store(BoxError),
}

impl KeysetError {
    /// Wraps a store error.
    pub fn store<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Store(Box::new(error))
    }

    /// Returns whether the error was caused by caller input rather than by
    /// the store or the configuration.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCursor(_) | Self::StaleCursor { .. } | Self::ConflictingCursors
        )
    }
}

/// Specialized [`Result`] type for pagination operations.
pub type KeysetResult<T, E = KeysetError> = Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors() {
        assert!(KeysetError::ConflictingCursors.is_client_error());
        assert!(KeysetError::InvalidCursor("bad".into()).is_client_error());
        assert!(
            KeysetError::StaleCursor {
                cursor: "7".to_owned()
            }
            .is_client_error()
        );
        assert!(!KeysetError::Config("empty".into()).is_client_error());

        let io = std::io::Error::other("connection reset");
        assert!(!KeysetError::store(io).is_client_error());
    }

    #[test]
    fn stale_cursor_message() {
        let error = KeysetError::StaleCursor {
            cursor: "42".to_owned(),
        };
        assert_eq!(
            error.to_string(),
            "Cursor '42' no longer references a record"
        );
    }
}
