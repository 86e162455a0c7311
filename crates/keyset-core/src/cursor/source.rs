//! Inbound cursor tokens.

use serde::{Deserialize, Serialize};

use super::Edge;

/// Supplies the raw `before`/`after` tokens of the current request.
///
/// Passed to every pagination call, so there is no process-wide resolver.
/// An empty token counts as absent.
///
/// A source backed by a request URL should also return its raw query string
/// from [`TokenSource::query`]. The [`CursorCodec`] then reads the tokens
/// from it under its own parameter names, so the links it writes and the
/// tokens it reads always agree.
///
/// [`CursorCodec`]: super::CursorCodec
pub trait TokenSource {
    /// Returns the raw `before` token.
    fn before(&self) -> Option<&str>;

    /// Returns the raw `after` token.
    fn after(&self) -> Option<&str>;

    /// Returns the raw (undecoded) query string the tokens come from.
    ///
    /// When present it takes precedence over [`before`] and [`after`].
    ///
    /// [`before`]: TokenSource::before
    /// [`after`]: TokenSource::after
    fn query(&self) -> Option<&str> {
        None
    }

    /// Returns the raw token for the given edge.
    fn token(&self, edge: Edge) -> Option<&str> {
        match edge {
            Edge::Before => self.before(),
            Edge::After => self.after(),
        }
    }
}

/// A token source that never yields a cursor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoCursor;

impl TokenSource for NoCursor {
    #[inline]
    fn before(&self) -> Option<&str> {
        None
    }

    #[inline]
    fn after(&self) -> Option<&str> {
        None
    }
}

impl<T: TokenSource> TokenSource for Option<T> {
    fn before(&self) -> Option<&str> {
        self.as_ref().and_then(TokenSource::before)
    }

    fn after(&self) -> Option<&str> {
        self.as_ref().and_then(TokenSource::after)
    }

    fn query(&self) -> Option<&str> {
        self.as_ref().and_then(TokenSource::query)
    }
}

impl<T: TokenSource + ?Sized> TokenSource for &T {
    fn before(&self) -> Option<&str> {
        (**self).before()
    }

    fn after(&self) -> Option<&str> {
        (**self).after()
    }

    fn query(&self) -> Option<&str> {
        (**self).query()
    }
}

/// Names of the cursor query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorParamNames {
    /// Parameter carrying the `before` cursor.
    pub before: String,
    /// Parameter carrying the `after` cursor.
    pub after: String,
}

impl CursorParamNames {
    /// Creates custom parameter names.
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }

    /// Returns the parameter name of the given edge.
    #[inline]
    pub fn name(&self, edge: Edge) -> &str {
        match edge {
            Edge::Before => &self.before,
            Edge::After => &self.after,
        }
    }

    /// Returns whether `name` is one of the cursor parameters.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        name == self.before || name == self.after
    }
}

impl Default for CursorParamNames {
    fn default() -> Self {
        Self::new("before", "after")
    }
}

/// Owned cursor tokens, typically read from a query string.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorParams {
    /// Raw `before` token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    /// Raw `after` token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

impl CursorParams {
    /// Sets the `before` token.
    pub fn with_before(mut self, token: impl Into<String>) -> Self {
        self.before = Some(token.into());
        self
    }

    /// Sets the `after` token.
    pub fn with_after(mut self, token: impl Into<String>) -> Self {
        self.after = Some(token.into());
        self
    }

    /// Reads the cursor tokens from a raw (undecoded) query string.
    ///
    /// The first occurrence of each parameter wins; empty values are ignored.
    pub fn from_query(query: &str, names: &CursorParamNames) -> Self {
        let mut params = Self::default();

        for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }

            let slot = if name == names.before.as_str() {
                &mut params.before
            } else if name == names.after.as_str() {
                &mut params.after
            } else {
                continue;
            };

            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        params
    }
}

impl TokenSource for CursorParams {
    fn before(&self) -> Option<&str> {
        self.before.as_deref()
    }

    fn after(&self) -> Option<&str> {
        self.after.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_query_reads_both_edges() {
        let params = CursorParams::from_query(
            "sort=desc&before=3&after=a%20b",
            &CursorParamNames::default(),
        );
        assert_eq!(params.before(), Some("3"));
        assert_eq!(params.after(), Some("a b"));
    }

    #[test]
    fn from_query_skips_empty_values() {
        let params = CursorParams::from_query("after=&after=9", &CursorParamNames::default());
        assert_eq!(params.after(), Some("9"));
        assert_eq!(params.before(), None);
    }

    #[test]
    fn from_query_custom_names() {
        let names = CursorParamNames::new("prev", "next");
        let params = CursorParams::from_query("next=4&after=5", &names);
        assert_eq!(params.after(), Some("4"));
        assert!(names.contains("prev"));
        assert!(!names.contains("after"));
    }

    #[test]
    fn absent_sources() {
        assert_eq!(NoCursor.token(Edge::After), None);

        let source: Option<CursorParams> = None;
        assert_eq!(source.before(), None);

        let source = Some(CursorParams::default().with_before("1"));
        assert_eq!(source.token(Edge::Before), Some("1"));
    }
}
