//! In-memory store for tests and examples.

mod memory;

pub use self::memory::{MemoryRow, MemoryStore, QueryLog};
