//! Cursors, page edges and the codec that moves them in and out of URLs.
//!
//! A cursor is the primary key of a boundary record, exchanged with callers
//! as a query parameter named after the [`Edge`] it anchors. The
//! [`CursorCodec`] decodes the parameters of an incoming request into a
//! [`Direction`] and encodes boundary keys of a produced page back into
//! links for the neighbouring pages.

mod codec;
mod source;

use derive_more::{Deref, Display, From};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

pub use self::codec::{ConflictPolicy, CursorCodec, LinkMode, TokenFormat};
pub use self::source::{CursorParamNames, CursorParams, NoCursor, TokenSource};

/// Side of a page a cursor anchors.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    EnumString,
    AsRefStr
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Edge {
    /// Records preceding the anchor in natural order.
    Before,
    /// Records following the anchor in natural order.
    After,
}

/// A decoded cursor: the raw key of the boundary record.
///
/// The key is not yet typed; the engine parses it with the collection's
/// [`KeyKind`](crate::types::KeyKind).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Deref, Display, From)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Creates a cursor from a raw key.
    #[inline]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the raw key.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the cursor, returning the raw key.
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for Cursor {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Where a page starts relative to the collection.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum Direction {
    /// No cursor was supplied: the first page in natural order.
    #[default]
    First,
    /// The page ending right before the anchored record.
    Before(Cursor),
    /// The page starting right after the anchored record.
    After(Cursor),
}

impl Direction {
    /// Returns the anchor cursor, if any.
    #[inline]
    pub fn cursor(&self) -> Option<&Cursor> {
        match self {
            Self::First => None,
            Self::Before(cursor) | Self::After(cursor) => Some(cursor),
        }
    }

    /// Returns the anchored edge, if any.
    #[inline]
    pub fn edge(&self) -> Option<Edge> {
        match self {
            Self::First => None,
            Self::Before(_) => Some(Edge::Before),
            Self::After(_) => Some(Edge::After),
        }
    }

    /// Returns whether no cursor was supplied.
    #[inline]
    pub fn is_first(&self) -> bool {
        matches!(self, Self::First)
    }

    /// Returns whether the scan runs against the natural order.
    #[inline]
    pub fn is_backward(&self) -> bool {
        matches!(self, Self::Before(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_accessors() {
        let direction = Direction::Before(Cursor::new("7"));
        assert_eq!(direction.cursor().map(Cursor::as_str), Some("7"));
        assert_eq!(direction.edge(), Some(Edge::Before));
        assert!(direction.is_backward());
        assert!(!direction.is_first());

        assert_eq!(Direction::default(), Direction::First);
        assert_eq!(Direction::First.edge(), None);
    }

    #[test]
    fn edge_string_forms() {
        assert_eq!(Edge::After.as_ref(), "after");
        assert_eq!("before".parse::<Edge>().ok(), Some(Edge::Before));
    }
}
