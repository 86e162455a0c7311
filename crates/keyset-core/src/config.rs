//! Pagination configuration.

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::cursor::{ConflictPolicy, CursorCodec, CursorParamNames, LinkMode, TokenFormat};
use crate::{KeysetError, KeysetResult};

/// Default number of items per page.
pub const DEFAULT_PER_PAGE: u32 = 15;

/// Default upper bound on the number of items per page.
pub const MAX_PER_PAGE: u32 = 100;

/// What to do when a cursor cannot be resolved to a record.
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
pub enum StaleCursorPolicy {
    /// Serve the first page as if no cursor had been supplied.
    #[default]
    FailOpen,
    /// Fail with [`KeysetError::StaleCursor`].
    Reject,
}

/// How the engine learns whether another page exists on the scan side.
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
pub enum HasMoreStrategy {
    /// Fetch one extra row and drop it.
    #[default]
    LookAhead,
    /// Assume more rows when the page is full and the total allows it.
    ///
    /// A full page that happens to end the collection still reports another
    /// page, unless the total was counted.
    Heuristic,
}

/// Pagination settings shared by every request of a [`Paginator`].
///
/// [`Paginator`]: crate::Paginator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[serde(default)]
#[must_use = "configurations must be used to build a paginator"]
pub struct PaginationConfig {
    /// Items per page when the request does not specify one
    #[cfg_attr(
        feature = "config",
        arg(long = "pagination-per-page", env = "PAGINATION_PER_PAGE", default_value = "15")
    )]
    pub default_per_page: u32,

    /// Upper bound on requested page sizes (0 disables the cap)
    #[cfg_attr(
        feature = "config",
        arg(long = "pagination-max-per-page", env = "PAGINATION_MAX_PER_PAGE", default_value = "100")
    )]
    pub max_per_page: Option<u32>,

    /// Query parameter carrying the `before` cursor
    #[cfg_attr(
        feature = "config",
        arg(long = "pagination-before-param", env = "PAGINATION_BEFORE_PARAM", default_value = "before")
    )]
    pub before_param: String,

    /// Query parameter carrying the `after` cursor
    #[cfg_attr(
        feature = "config",
        arg(long = "pagination-after-param", env = "PAGINATION_AFTER_PARAM", default_value = "after")
    )]
    pub after_param: String,

    /// How keys are written into cursor parameters
    #[cfg_attr(
        feature = "config",
        arg(long = "pagination-token-format", env = "PAGINATION_TOKEN_FORMAT", value_enum, default_value_t)
    )]
    pub token_format: TokenFormat,

    /// When boundary links are produced
    #[cfg_attr(
        feature = "config",
        arg(long = "pagination-link-mode", env = "PAGINATION_LINK_MODE", value_enum, default_value_t)
    )]
    pub link_mode: LinkMode,

    /// Handling of requests carrying both cursors
    #[cfg_attr(
        feature = "config",
        arg(long = "pagination-conflict-policy", env = "PAGINATION_CONFLICT_POLICY", value_enum, default_value_t)
    )]
    pub conflict_policy: ConflictPolicy,

    /// Handling of cursors that no longer reference a record
    #[cfg_attr(
        feature = "config",
        arg(long = "pagination-stale-cursor-policy", env = "PAGINATION_STALE_CURSOR_POLICY", value_enum, default_value_t)
    )]
    pub stale_cursor_policy: StaleCursorPolicy,

    /// Detection of further pages on the scan side
    #[cfg_attr(
        feature = "config",
        arg(long = "pagination-has-more-strategy", env = "PAGINATION_HAS_MORE_STRATEGY", value_enum, default_value_t)
    )]
    pub has_more_strategy: HasMoreStrategy,
}

impl PaginationConfig {
    /// Sets the default page size.
    pub fn with_default_per_page(mut self, per_page: u32) -> Self {
        self.default_per_page = per_page;
        self
    }

    /// Sets the page size cap. `None` or `Some(0)` disables it.
    pub fn with_max_per_page(mut self, max_per_page: Option<u32>) -> Self {
        self.max_per_page = max_per_page;
        self
    }

    /// Sets the cursor parameter names.
    pub fn with_param_names(mut self, before: impl Into<String>, after: impl Into<String>) -> Self {
        self.before_param = before.into();
        self.after_param = after.into();
        self
    }

    /// Sets the token format.
    pub fn with_token_format(mut self, token_format: TokenFormat) -> Self {
        self.token_format = token_format;
        self
    }

    /// Sets the link mode.
    pub fn with_link_mode(mut self, link_mode: LinkMode) -> Self {
        self.link_mode = link_mode;
        self
    }

    /// Sets the conflict policy.
    pub fn with_conflict_policy(mut self, conflict_policy: ConflictPolicy) -> Self {
        self.conflict_policy = conflict_policy;
        self
    }

    /// Sets the stale cursor policy.
    pub fn with_stale_cursor_policy(mut self, stale_cursor_policy: StaleCursorPolicy) -> Self {
        self.stale_cursor_policy = stale_cursor_policy;
        self
    }

    /// Sets the has-more strategy.
    pub fn with_has_more_strategy(mut self, has_more_strategy: HasMoreStrategy) -> Self {
        self.has_more_strategy = has_more_strategy;
        self
    }

    /// Returns the cursor parameter names.
    pub fn param_names(&self) -> CursorParamNames {
        CursorParamNames::new(&self.before_param, &self.after_param)
    }

    /// Builds the cursor codec described by this configuration.
    pub fn codec(&self) -> CursorCodec {
        CursorCodec::new(self.param_names(), self.token_format, self.conflict_policy)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> KeysetResult<()> {
        if self.default_per_page == 0 {
            return Err(KeysetError::Config("default_per_page must be positive".into()));
        }

        if let Some(max) = self.max_per_page.filter(|&max| max > 0) {
            if self.default_per_page > max {
                return Err(KeysetError::Config(
                    format!("default_per_page must not exceed max_per_page ({max})").into(),
                ));
            }
        }

        if self.before_param.is_empty() || self.after_param.is_empty() {
            return Err(KeysetError::Config("cursor parameter names cannot be empty".into()));
        }

        if self.before_param == self.after_param {
            return Err(KeysetError::Config(
                "before_param and after_param must differ".into(),
            ));
        }

        Ok(())
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: Some(MAX_PER_PAGE),
            before_param: "before".to_owned(),
            after_param: "after".to_owned(),
            token_format: TokenFormat::default(),
            link_mode: LinkMode::default(),
            conflict_policy: ConflictPolicy::default(),
            stale_cursor_policy: StaleCursorPolicy::default(),
            has_more_strategy: HasMoreStrategy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = PaginationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_per_page, 15);
        assert_eq!(config.max_per_page, Some(100));
        assert_eq!(config.stale_cursor_policy, StaleCursorPolicy::FailOpen);
        assert_eq!(config.has_more_strategy, HasMoreStrategy::LookAhead);
    }

    #[test]
    fn validation() {
        let config = PaginationConfig::default().with_default_per_page(0);
        assert!(config.validate().is_err());

        let config = PaginationConfig::default().with_default_per_page(500);
        assert!(config.validate().is_err());

        let config = PaginationConfig::default()
            .with_default_per_page(500)
            .with_max_per_page(None);
        assert!(config.validate().is_ok());

        let config = PaginationConfig::default().with_param_names("cursor", "cursor");
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_max_per_page_disables_cap() {
        let config = PaginationConfig::default()
            .with_default_per_page(500)
            .with_max_per_page(Some(0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn deserialize_partial() {
        let config: PaginationConfig =
            serde_json::from_str(r#"{"default_per_page": 25, "token_format": "opaque"}"#)
                .expect("config should deserialize");

        assert_eq!(config.default_per_page, 25);
        assert_eq!(config.token_format, TokenFormat::Opaque);
        assert_eq!(config.after_param, "after");
    }

    #[test]
    fn codec_uses_param_names() {
        let config = PaginationConfig::default().with_param_names("prev", "next");
        assert_eq!(config.codec().names().after, "next");
    }
}
