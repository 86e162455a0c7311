//! Pagination error to HTTP error conversion.

use keyset_core::KeysetError;
use keyset_postgres::PgError;

use crate::TRACING_TARGET_RESPONSE;
use crate::handler::{Error, ErrorKind};

impl From<KeysetError> for Error<'static> {
    fn from(error: KeysetError) -> Self {
        match error {
            KeysetError::InvalidCursor(reason) => ErrorKind::InvalidCursor
                .with_message("The cursor could not be decoded")
                .with_context(reason),
            KeysetError::StaleCursor { cursor } => ErrorKind::InvalidCursor
                .with_message("The cursor no longer references a record")
                .with_context(format!("cursor: {cursor}")),
            KeysetError::ConflictingCursors => ErrorKind::BadRequest
                .with_message("Supply either a 'before' or an 'after' cursor, not both"),
            KeysetError::Config(reason) => {
                tracing::error!(
                    target: TRACING_TARGET_RESPONSE,
                    error = %reason,
                    "pagination configuration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            KeysetError::Store(source) => match source.downcast::<PgError>() {
                Ok(error) => Self::from(*error),
                Err(source) => {
                    tracing::error!(
                        target: TRACING_TARGET_RESPONSE,
                        error = %source,
                        "pagination store error"
                    );
                    ErrorKind::InternalServerError.into_error()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_bad_requests() {
        let errors = [
            KeysetError::InvalidCursor("not base64".into()),
            KeysetError::StaleCursor {
                cursor: "42".to_owned(),
            },
            KeysetError::ConflictingCursors,
        ];

        for error in errors {
            assert!(error.is_client_error());
            let error = Error::from(error);
            assert_eq!(error.kind().status_code().as_u16(), 400);
        }
    }

    #[test]
    fn database_errors_keep_their_mapping() {
        use keyset_postgres::error::TimeoutType;

        let error = Error::from(KeysetError::from(PgError::Timeout(TimeoutType::Wait)));
        assert_eq!(error.kind(), ErrorKind::ServiceUnavailable);
    }

    #[test]
    fn store_errors_are_internal() {
        let source = std::io::Error::other("connection reset");
        let error = Error::from(KeysetError::store(source));
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(error.context(), None);

        let error = Error::from(KeysetError::Config("per_page must be positive".into()));
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
    }
}
