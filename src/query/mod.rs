//! Typed query building for the content API
//!
//! A peer of the flattening path with no data dependency on it: callers
//! describe what to fetch with [`QueryOptions`] and serialize it with
//! [`stringify()`]; [`parse()`] reads such a string back into a nested value.

pub mod options;
pub mod stringify;

pub use options::{FilterOp, Filters, Pagination, PublicationState, QueryOptions};
pub use stringify::{parse, stringify};
