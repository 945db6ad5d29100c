//! Error types for the smelt library
//!
//! Every failure here is a data-contract violation surfaced to the immediate
//! caller. Nothing is retried and no partial result is ever returned.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A value expected to be an envelope has no `data` key at all.
    ///
    /// Raised at any recursion depth: the top-level response, a nested
    /// relation, or the synthetic wrapper built around a component. A `data`
    /// key holding `null` is valid; only the absent key is an error.
    #[error("expected an envelope with a `data` key")]
    MissingEnvelope,

    /// Locale consolidation was requested on an entity without a non-empty
    /// `localizations` array.
    #[error("entity has no `localizations` to consolidate")]
    MissingLocalizations,

    /// Locale consolidation was requested on an entity (or one of its
    /// localization siblings) without a usable `locale` field.
    #[error("entity has no `locale` field")]
    MissingLocale,

    /// A flattened tree did not match the caller's target type.
    #[error("failed to deserialize flattened value")]
    Deserialize(#[from] serde_json::Error),
}
