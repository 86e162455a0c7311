//! Response bodies for paginated handlers.

mod errors;
mod page;

pub use errors::ErrorResponse;
pub use page::Page;
