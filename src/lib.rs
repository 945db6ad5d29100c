//! # Smelt - flatten envelope-wrapped content-API responses
//!
//! A transformation layer for the deeply nested response format emitted by
//! headless content APIs: every body, relation, and collection arrives as a
//! `{"data": ..}` envelope and every entity as an `{"id", "attributes"}`
//! pair. Smelt collapses that into flat records, and can consolidate
//! per-locale sibling records into one locale-keyed map.
//!
//! ## Modules
//!
//! - **flatten**: classify fields by shape and recursively strip envelopes
//! - **localize**: consolidate a flattened entity's locales into one map
//! - **query**: typed query options and bracket-notation query strings
//!
//! ## Quick Start
//!
//! ### Flattening
//!
//! ```rust
//! use serde_json::json;
//!
//! # fn main() -> smelt::error::Result<()> {
//! let response = json!({
//!     "data": {
//!         "id": 1,
//!         "attributes": {
//!             "no": "TEST",
//!             "image": { "data": null },
//!             "categories": {
//!                 "data": [{ "id": 1, "attributes": { "code": "TEST" } }]
//!             }
//!         }
//!     }
//! });
//!
//! let flat = smelt::flatten(response)?;
//! assert_eq!(flat, json!({
//!     "id": 1,
//!     "no": "TEST",
//!     "image": null,
//!     "categories": [{ "id": 1, "code": "TEST" }]
//! }));
//! # Ok(())
//! # }
//! ```
//!
//! ### Locale consolidation
//!
//! ```rust
//! use serde_json::json;
//!
//! # fn main() -> smelt::error::Result<()> {
//! let entity = json!({
//!     "id": 12,
//!     "locale": "de",
//!     "localizations": [{ "id": 13, "locale": "fr" }]
//! });
//!
//! let map = smelt::localize(entity)?;
//! assert_eq!(map["fr"]["id"], json!(13));
//! assert!(map["de"].get("localizations").is_none());
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::{BufRead, Write};

pub mod error;
pub mod flatten;
pub mod localize;
pub mod query;

// Re-export commonly used items for convenience
pub use error::Error;
pub use flatten::{classify, flatten, flatten_into, FieldKind};
pub use localize::{
    localize, localize_response, localize_response_with, localize_responses,
    localize_responses_with, localize_with, LocaleMap,
};
pub use query::{parse, stringify, FilterOp, Filters, QueryOptions};

/// Flatten a stream of newline-delimited envelope responses, writing one
/// flat JSON record per line.
pub fn flatten_ndjson<R: BufRead, W: Write>(reader: R, writer: &mut W) -> Result<()> {
    for line in reader.lines() {
        let line = line.context("Failed to read line")?;
        if line.trim().is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(&line).context("Failed to parse JSON")?;

        let flat = flatten::flatten(value).context("Failed to flatten response")?;
        let record = serde_json::to_string(&flat).context("Failed to serialize record")?;
        writeln!(writer, "{}", record).context("Failed to write record")?;
    }

    Ok(())
}
