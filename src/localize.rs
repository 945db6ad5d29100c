//! Locale consolidation
//!
//! A localizable entity arrives flattened with a `locale` field and a
//! `localizations` array of sibling records (each carrying its own shallow
//! fields plus `locale`). Consolidation turns that into a single map from
//! locale code to record, optionally running a caller-supplied injector over
//! every entry.
//!
//! Siblings are shallow-copied as delivered, never re-flattened; only the
//! primary entity went through the flattening engine.

use crate::error::{Error, Result};
use crate::flatten::flatten;
use serde_json::{Map, Value};

/// A mapping from locale code to one flattened record.
pub type LocaleMap = Map<String, Value>;

/// The default injector: returns each entry unchanged.
pub fn identity(current: Value, _main: &Value, _locale: &str) -> Value {
    current
}

/// Consolidate a flattened entity and its localization siblings into a
/// locale-keyed map, applying the identity injector.
pub fn localize(entity: Value) -> Result<LocaleMap> {
    localize_with(entity, identity)
}

/// Consolidate a flattened entity and its localization siblings into a
/// locale-keyed map.
///
/// `inject` runs once per locale as `inject(current, main, locale)`, where
/// `main` is always the primary entity as it looked before any injection
/// (still carrying its `localizations`), so entries can cross-reference
/// primary fields. After injection the `localizations` field is removed from
/// the primary entry; siblings never carried one.
///
/// # Errors
///
/// [`Error::MissingLocalizations`] when the entity has no non-empty
/// `localizations` array, [`Error::MissingLocale`] when the entity or one of
/// its siblings has no non-empty string `locale`.
pub fn localize_with<F>(entity: Value, inject: F) -> Result<LocaleMap>
where
    F: Fn(Value, &Value, &str) -> Value,
{
    let fields = match &entity {
        Value::Object(fields) => fields,
        _ => return Err(Error::MissingLocalizations),
    };

    let siblings = match fields.get("localizations") {
        Some(Value::Array(items)) if !items.is_empty() => items.clone(),
        _ => return Err(Error::MissingLocalizations),
    };
    let primary_locale = locale_of(fields)?;

    let main = entity.clone();
    let mut map = LocaleMap::new();
    map.insert(primary_locale.clone(), entity);

    for sibling in siblings {
        let code = match &sibling {
            Value::Object(fields) => locale_of(fields)?,
            _ => return Err(Error::MissingLocale),
        };
        map.insert(code, sibling);
    }

    let codes: Vec<String> = map.keys().cloned().collect();
    for code in codes {
        let current = map.insert(code.clone(), Value::Null).unwrap_or(Value::Null);
        map.insert(code.clone(), inject(current, &main, &code));
    }

    if let Some(Value::Object(primary)) = map.get_mut(&primary_locale) {
        primary.shift_remove("localizations");
    }

    Ok(map)
}

/// Flatten a single-entity response, then consolidate its locales.
pub fn localize_response(response: Value) -> Result<LocaleMap> {
    localize_response_with(response, identity)
}

/// Flatten a single-entity response, then consolidate its locales with a
/// custom injector.
pub fn localize_response_with<F>(response: Value, inject: F) -> Result<LocaleMap>
where
    F: Fn(Value, &Value, &str) -> Value,
{
    localize_with(flatten(response)?, inject)
}

/// Flatten a collection response, then consolidate locales per element.
pub fn localize_responses(response: Value) -> Result<Vec<LocaleMap>> {
    localize_responses_with(response, identity)
}

/// Flatten a collection response, then consolidate locales per element with
/// a custom injector.
///
/// Each element is consolidated independently; siblings are never merged
/// across elements. A single-entity response is treated as a one-element
/// collection.
pub fn localize_responses_with<F>(response: Value, inject: F) -> Result<Vec<LocaleMap>>
where
    F: Fn(Value, &Value, &str) -> Value,
{
    match flatten(response)? {
        Value::Array(items) => items
            .into_iter()
            .map(|entity| localize_with(entity, &inject))
            .collect(),
        entity => Ok(vec![localize_with(entity, inject)?]),
    }
}

fn locale_of(fields: &Map<String, Value>) -> Result<String> {
    match fields.get("locale") {
        Some(Value::String(code)) if !code.is_empty() => Ok(code.clone()),
        _ => Err(Error::MissingLocale),
    }
}
