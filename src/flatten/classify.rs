//! Field classification for envelope-wrapped records
//!
//! Every attribute of a structured record falls into exactly one of four
//! kinds, decided purely from its shape. The flattening engine consults
//! [`classify`] once per key and dispatches on the result.

use serde_json::{Map, Value};

/// The shape-derived kind of one field of a structured record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Scalar leaf: `null`, bool, number, or string. Left untouched.
    Property,
    /// Embedded structured value without a `data` wrapper, or any array.
    Component,
    /// Relation envelope whose `data` is exactly `null`.
    NullRelation,
    /// Relation envelope wrapping a single entity or a collection.
    Relation,
}

/// Classify one field of a record.
///
/// The predicate order is property → component → null-relation → relation
/// and is part of the contract: an empty component object (`{}`) must read
/// as a component, not as a null relation, and `{"data": null}` must read as
/// a null relation, not as a component.
pub fn classify(container: &Map<String, Value>, key: &str) -> FieldKind {
    if is_property(container, key) {
        return FieldKind::Property;
    }
    if is_component(container, key) {
        return FieldKind::Component;
    }
    if is_null_relation(container, key) {
        return FieldKind::NullRelation;
    }
    FieldKind::Relation
}

/// A simple field: absent, `null`, or any scalar.
pub fn is_property(container: &Map<String, Value>, key: &str) -> bool {
    !matches!(
        container.get(key),
        Some(Value::Object(_)) | Some(Value::Array(_))
    )
}

/// A component: an array, or an object that does not wrap its payload in a
/// truthy `data` field.
///
/// The upstream format is loose here: a `data` field holding `0`, `""`, or
/// `false` still classifies as a component, and only `data: null` is reserved
/// for the null relation. Malformed inputs where a scalar attribute happens
/// to be named `data` therefore land on the component path.
pub fn is_component(container: &Map<String, Value>, key: &str) -> bool {
    match container.get(key) {
        Some(Value::Array(_)) => true,
        Some(Value::Object(obj)) => match obj.get("data") {
            None => true,
            Some(Value::Null) => false,
            Some(data) => !is_truthy(data),
        },
        _ => false,
    }
}

/// An explicitly empty relation: an object whose `data` is exactly `null`.
pub fn is_null_relation(container: &Map<String, Value>, key: &str) -> bool {
    matches!(
        container.get(key),
        Some(Value::Object(obj)) if matches!(obj.get("data"), Some(Value::Null))
    )
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
