//! Conversion between cursor tokens, directions and links.

use base64::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use super::{Cursor, CursorParamNames, CursorParams, Direction, Edge, TokenSource};
use crate::types::Value;
use crate::{KeysetError, KeysetResult, TRACING_TARGET_CODEC};

/// How a key is written into a cursor parameter.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr
)]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TokenFormat {
    /// The raw key, e.g. `after=42`.
    #[default]
    Plain,
    /// The key as URL-safe base64 without padding.
    Opaque,
}

impl TokenFormat {
    /// Encodes a raw key into a token.
    pub fn encode(self, key: &str) -> String {
        match self {
            Self::Plain => key.to_owned(),
            Self::Opaque => BASE64_URL_SAFE_NO_PAD.encode(key.as_bytes()),
        }
    }

    /// Decodes a token into a raw key.
    pub fn decode(self, token: &str) -> KeysetResult<String> {
        match self {
            Self::Plain => Ok(token.to_owned()),
            Self::Opaque => {
                let bytes = BASE64_URL_SAFE_NO_PAD
                    .decode(token)
                    .map_err(|_| KeysetError::InvalidCursor("token is not valid base64".into()))?;
                String::from_utf8(bytes)
                    .map_err(|_| KeysetError::InvalidCursor("token is not valid UTF-8".into()))
            }
        }
    }
}

/// When boundary links are produced.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr
)]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LinkMode {
    /// Links only for sides where another page exists.
    #[default]
    Suppress,
    /// Links whenever the page has a boundary key.
    Always,
}

/// What to do when both a `before` and an `after` cursor are supplied.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr
)]
#[cfg_attr(feature = "config", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConflictPolicy {
    /// The `after` cursor wins.
    #[default]
    PreferAfter,
    /// Fail with [`KeysetError::ConflictingCursors`].
    Reject,
}

/// Encodes and decodes direction-tagged cursor parameters.
///
/// ```rust
/// use keyset_core::cursor::{CursorCodec, CursorParams, Direction, Edge};
/// use keyset_core::types::Value;
///
/// let codec = CursorCodec::default();
/// let link = codec.url("/events?page=2&after=9", Edge::After, Some(&Value::Int(12)));
/// assert_eq!(link.as_deref(), Some("/events?page=2&after=12"));
///
/// let tokens = CursorParams::default().with_after("12");
/// assert!(matches!(codec.decode(&tokens), Ok(Direction::After(_))));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CursorCodec {
    names: CursorParamNames,
    format: TokenFormat,
    conflict: ConflictPolicy,
}

impl CursorCodec {
    /// Creates a codec.
    pub fn new(names: CursorParamNames, format: TokenFormat, conflict: ConflictPolicy) -> Self {
        Self {
            names,
            format,
            conflict,
        }
    }

    /// Returns the parameter names.
    #[inline]
    pub fn names(&self) -> &CursorParamNames {
        &self.names
    }

    /// Returns the token format.
    #[inline]
    pub fn format(&self) -> TokenFormat {
        self.format
    }

    /// Decodes the tokens of a request into a direction.
    ///
    /// A source exposing its raw query string is read under this codec's
    /// parameter names. Missing or empty tokens yield [`Direction::First`].
    pub fn decode(&self, tokens: &impl TokenSource) -> KeysetResult<Direction> {
        let from_query = tokens
            .query()
            .map(|query| CursorParams::from_query(query, &self.names));
        let (before, after) = match &from_query {
            Some(params) => (params.before(), params.after()),
            None => (tokens.before(), tokens.after()),
        };

        let before = before.filter(|token| !token.is_empty());
        let after = after.filter(|token| !token.is_empty());

        let (edge, token) = match (before, after) {
            (None, None) => return Ok(Direction::First),
            (Some(token), None) => (Edge::Before, token),
            (None, Some(token)) => (Edge::After, token),
            (Some(_), Some(token)) => match self.conflict {
                ConflictPolicy::PreferAfter => {
                    tracing::debug!(
                        target: TRACING_TARGET_CODEC,
                        "Both cursors supplied, using 'after'"
                    );
                    (Edge::After, token)
                }
                ConflictPolicy::Reject => return Err(KeysetError::ConflictingCursors),
            },
        };

        let cursor = Cursor::new(self.format.decode(token)?);
        Ok(match edge {
            Edge::Before => Direction::Before(cursor),
            Edge::After => Direction::After(cursor),
        })
    }

    /// Encodes a boundary key into a token.
    pub fn encode_key(&self, key: &Value) -> String {
        self.format.encode(&key.to_string())
    }

    /// Encodes a boundary key into a `name=token` query pair.
    ///
    /// Returns `None` when there is no key.
    pub fn encode(&self, edge: Edge, key: Option<&Value>) -> Option<String> {
        let key = key.filter(|key| !key.is_null())?;

        let pair = url::form_urlencoded::Serializer::new(String::new())
            .append_pair(self.names.name(edge), &self.encode_key(key))
            .finish();
        Some(pair)
    }

    /// Builds the link to the page on the given edge of `key`.
    ///
    /// Existing cursor parameters of `path` are replaced; every other pair is
    /// kept verbatim and in order.
    pub fn url(&self, path: &str, edge: Edge, key: Option<&Value>) -> Option<String> {
        let pair = self.encode(edge, key)?;
        let (base, query) = path.split_once('?').unwrap_or((path, ""));

        let mut segments: Vec<&str> = query
            .split('&')
            .filter(|segment| !segment.is_empty())
            .filter(|segment| !self.is_cursor_segment(segment))
            .collect();
        segments.push(&pair);

        Some(format!("{base}?{}", segments.join("&")))
    }

    fn is_cursor_segment(&self, segment: &str) -> bool {
        url::form_urlencoded::parse(segment.as_bytes())
            .next()
            .is_some_and(|(name, _)| self.names.contains(&name))
    }
}
