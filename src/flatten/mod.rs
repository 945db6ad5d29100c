//! Envelope flattening - strip the `{data, attributes}` wrapping from
//! content-API responses
//!
//! The headless-API format wraps every response body, relation, and
//! collection in a `{"data": ..}` envelope, and every entity in an
//! `{"id", "attributes"}` pair. This module collapses all of that into flat
//! records: classification decides per field what a value is
//! ([`classify()`]), and the engine rebuilds the tree ([`flatten()`]).

pub mod classify;
pub mod engine;

pub use classify::{classify, is_component, is_null_relation, is_property, FieldKind};
pub use engine::{flatten, flatten_into};
