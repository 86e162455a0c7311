use keyset_core::PageRequest;
use serde::{Deserialize, Serialize};

/// Page size and count parameters of a paginated request.
///
/// Extract with [`Query`]; cursor parameters sharing the query string are
/// ignored here and read by [`Cursors`] instead.
///
/// [`Query`]: crate::Query
/// [`Cursors`]: crate::Cursors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    /// Requested page size. Values outside the configured bounds are clamped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    /// Whether the response should carry the total count.
    #[serde(default)]
    pub include_count: bool,
}

impl PageParams {
    /// Builds the engine request for the given path.
    pub fn into_request(self, path: impl Into<String>) -> PageRequest {
        PageRequest {
            per_page: self.per_page,
            include_count: self.include_count,
            path: path.into(),
        }
    }
}
