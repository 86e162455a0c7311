use axum::extract::rejection::QueryRejection;
use axum::extract::{FromRequestParts, Query as AxumQuery};
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;

use crate::TRACING_TARGET_EXTRACT;
use crate::handler::{Error, ErrorKind};

/// Query string extractor that rejects with a descriptive [`Error`].
///
/// Behaves like `axum::extract::Query`, except that a malformed query string
/// produces a `400 Bad Request` naming the offending parameter.
///
/// ```rust,no_run
/// use keyset_server::{PageParams, Query};
///
/// async fn list(Query(params): Query<PageParams>) -> String {
///     format!("{:?}", params.per_page)
/// }
/// ```
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Query<T>(pub T);

impl<T> Query<T> {
    /// Consumes the wrapper and returns the inner query parameters.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AxumQuery::<T>::from_request_parts(parts, state).await {
            Ok(AxumQuery(query)) => Ok(Query(query)),
            Err(rejection) => Err(enhance_query_error(rejection)),
        }
    }
}

fn enhance_query_error(rejection: QueryRejection) -> Error<'static> {
    tracing::debug!(
        target: TRACING_TARGET_EXTRACT,
        error = %rejection,
        "Query parameter parsing failed"
    );

    let QueryRejection::FailedToDeserializeQueryString(err) = rejection else {
        return ErrorKind::BadRequest
            .with_message("Invalid query parameters")
            .with_context("The query string could not be parsed");
    };

    let error_message = err.body_text();
    let message = if error_message.contains("duplicate field") {
        "Duplicate query parameter"
    } else {
        "Invalid query parameter"
    };

    let error = ErrorKind::BadRequest.with_message(message);
    let error = match extract_field_name(&error_message) {
        Some(field_name) => error.with_resource(field_name.to_owned()),
        None => error,
    };

    error.with_context(error_message)
}

/// Best-effort extraction of a field name from a deserializer message.
///
/// Handles both `field: message` prefixes and `` `field` `` quoting.
fn extract_field_name(error_message: &str) -> Option<&str> {
    let message = error_message
        .strip_prefix("Failed to deserialize query string: ")
        .unwrap_or(error_message);

    if let Some((field, _)) = message.split_once(": ")
        && !field.is_empty()
        && !field.contains(' ')
    {
        return Some(field);
    }

    let start = message.find('`')?;
    let end = message[start + 1..].find('`')?;
    Some(&message[start + 1..start + 1 + end])
}
