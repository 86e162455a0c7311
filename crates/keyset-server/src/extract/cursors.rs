use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::Uri;
use axum::http::request::Parts;
use keyset_core::cursor::{CursorParamNames, CursorParams, TokenSource};

use crate::TRACING_TARGET_EXTRACT;

/// Cursor tokens of the current request.
///
/// Keeps the raw query string and the request path (with its query) so page
/// links can be built from it. The [`Paginator`] reads the tokens from the
/// raw query under the parameter names of its own [`PaginationConfig`], the
/// same names it writes into `before_url` and `after_url`:
///
/// ```rust,no_run
/// use keyset_core::{PaginationConfig, Paginator};
///
/// // Links carry `prev=`/`next=`, and `Cursors` passed to this paginator
/// // are read under the same names.
/// let paginator = Paginator::new(PaginationConfig::default().with_param_names("prev", "next"));
/// ```
///
/// [`Cursors::before`] and [`Cursors::after`] expose the tokens under the
/// default `before`/`after` names; use [`Cursors::params_with`] to read them
/// under other names.
///
/// Never rejects: a request without cursors is a request for the first page.
///
/// [`Paginator`]: keyset_core::Paginator
/// [`PaginationConfig`]: keyset_core::PaginationConfig
/// [`Cursors::before`]: TokenSource::before
/// [`Cursors::after`]: TokenSource::after
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursors {
    params: CursorParams,
    path: String,
    query: Option<String>,
}

impl Cursors {
    /// Creates cursors from already parsed parameters.
    pub fn new(params: CursorParams, path: impl Into<String>) -> Self {
        Self {
            params,
            path: path.into(),
            query: None,
        }
    }

    /// Reads the cursors of a request URI.
    pub fn from_uri(uri: &Uri) -> Self {
        let query = uri.query().unwrap_or_default();
        let path = uri
            .path_and_query()
            .map_or_else(|| uri.path(), |path| path.as_str());

        Self {
            params: CursorParams::from_query(query, &CursorParamNames::default()),
            path: path.to_owned(),
            query: Some(query.to_owned()),
        }
    }

    /// Returns the parameters under the default names.
    #[inline]
    pub fn params(&self) -> &CursorParams {
        &self.params
    }

    /// Reads the parameters under the given names.
    pub fn params_with(&self, names: &CursorParamNames) -> CursorParams {
        match &self.query {
            Some(query) => CursorParams::from_query(query, names),
            None => self.params.clone(),
        }
    }

    /// Returns the request path, including its query string.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns whether neither default-named cursor was supplied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.before.is_none() && self.params.after.is_none()
    }

    /// Consumes the extractor and returns the parameters under the default names.
    #[inline]
    pub fn into_params(self) -> CursorParams {
        self.params
    }
}

impl TokenSource for Cursors {
    #[inline]
    fn before(&self) -> Option<&str> {
        self.params.before()
    }

    #[inline]
    fn after(&self) -> Option<&str> {
        self.params.after()
    }

    #[inline]
    fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }
}

impl<S> FromRequestParts<S> for Cursors
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let cursors = Self::from_uri(&parts.uri);

        tracing::trace!(
            target: TRACING_TARGET_EXTRACT,
            query = cursors.query(),
            path = %cursors.path,
            "Extracted cursors"
        );

        Ok(cursors)
    }
}

#[cfg(test)]
mod test {
    use axum::routing::{Router, get};
    use axum_test::TestServer;
    use keyset_core::cursor::{CursorCodec, Direction};

    use super::*;

    async fn handler(cursors: Cursors) -> String {
        format!(
            "{}|{}|{}",
            cursors.before().unwrap_or("-"),
            cursors.after().unwrap_or("-"),
            cursors.path()
        )
    }

    #[test]
    fn from_uri() {
        let uri: Uri = "/events?owner=7&after=12".parse().unwrap();
        let cursors = Cursors::from_uri(&uri);

        assert_eq!(cursors.after(), Some("12"));
        assert_eq!(cursors.before(), None);
        assert_eq!(cursors.query(), Some("owner=7&after=12"));
        assert_eq!(cursors.path(), "/events?owner=7&after=12");
        assert!(!cursors.is_empty());
    }

    #[test]
    fn from_uri_without_query() {
        let uri: Uri = "/events".parse().unwrap();
        let cursors = Cursors::from_uri(&uri);

        assert!(cursors.is_empty());
        assert_eq!(cursors.path(), "/events");
    }

    #[test]
    fn params_with_custom_names() {
        let uri: Uri = "/events?next=5&after=9".parse().unwrap();
        let cursors = Cursors::from_uri(&uri);

        let params = cursors.params_with(&CursorParamNames::new("prev", "next"));
        assert_eq!(params.after.as_deref(), Some("5"));
        assert_eq!(cursors.after(), Some("9"));
    }

    #[test]
    fn codec_reads_its_own_names() {
        let uri: Uri = "/events?next=5&after=9".parse().unwrap();
        let cursors = Cursors::from_uri(&uri);

        let codec = CursorCodec::new(
            CursorParamNames::new("prev", "next"),
            Default::default(),
            Default::default(),
        );
        assert!(matches!(
            codec.decode(&cursors),
            Ok(Direction::After(cursor)) if cursor.as_str() == "5"
        ));
    }

    #[tokio::test]
    async fn extract_cursors() -> anyhow::Result<()> {
        let router = Router::new().route("/events", get(handler));
        let server = TestServer::new(router)?;

        let response = server.get("/events?before=a%20b&after=").await;
        assert_eq!(response.text(), "a b|-|/events?before=a%20b&after=");

        let response = server.get("/events").await;
        assert_eq!(response.text(), "-|-|/events");

        Ok(())
    }
}
