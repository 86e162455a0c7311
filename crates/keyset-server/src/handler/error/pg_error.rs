//! Database error to HTTP error conversion.

use keyset_postgres::PgError;
use keyset_postgres::error::ErrorHint;

use crate::TRACING_TARGET_RESPONSE;
use crate::handler::{Error, ErrorKind};

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        match error {
            PgError::Timeout(timeout) => {
                tracing::error!(
                    target: TRACING_TARGET_RESPONSE,
                    timeout = ?timeout,
                    hint = %timeout.hint(),
                    "database timeout"
                );
                ErrorKind::ServiceUnavailable.into_error()
            }
            ref error if error.is_transient() => {
                tracing::error!(
                    target: TRACING_TARGET_RESPONSE,
                    error = %error,
                    "transient database error"
                );
                ErrorKind::ServiceUnavailable.into_error()
            }
            error => {
                tracing::error!(
                    target: TRACING_TARGET_RESPONSE,
                    error = %error,
                    "database error"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use keyset_postgres::error::{DieselError, TimeoutType};

    use super::*;

    #[test]
    fn timeouts_are_unavailable() {
        let error = Error::from(PgError::Timeout(TimeoutType::Wait));
        assert_eq!(error.kind(), ErrorKind::ServiceUnavailable);
    }

    #[test]
    fn permanent_errors_are_internal() {
        let error = Error::from(PgError::Config("max_connections".to_owned()));
        assert_eq!(error.kind(), ErrorKind::InternalServerError);

        let error = Error::from(PgError::Query(DieselError::NotFound));
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
    }
}
