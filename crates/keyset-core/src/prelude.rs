//! Commonly used items from keyset-core.
//!
//! ```rust,ignore
//! use keyset_core::prelude::*;
//! ```

pub use crate::cursor::{
    ConflictPolicy, Cursor, CursorCodec, CursorParamNames, CursorParams, Direction, Edge,
    LinkMode, NoCursor, TokenFormat, TokenSource,
};
#[cfg(feature = "mock")]
#[cfg_attr(docsrs, doc(cfg(feature = "mock")))]
pub use crate::mock::{MemoryRow, MemoryStore};
pub use crate::types::{
    Comparison, Filter, KeyKind, KeysetQuery, OrderSpec, SortKey, SortOrder, Value,
};
pub use crate::{
    CursorPage, HasMoreStrategy, KeysetError, KeysetResult, KeysetStore, PageRequest,
    PaginationConfig, Paginator, Record, StaleCursorPolicy,
};
