//! Typed query options for the content API
//!
//! Callers describe a query with plain structs and enums; the serialization
//! into the API's bracket-notation query string lives in
//! [`stringify`](crate::query::stringify::stringify).

use serde::Serialize;
use serde_json::{Map, Value};

/// Options for one content-API request.
///
/// All fields are optional; `Default` produces an empty query.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Attribute names to select (`fields[0]=..`).
    pub fields: Vec<String>,
    /// Relations and components to populate (`populate[0]=..`).
    pub populate: Vec<String>,
    /// Filter tree (`filters[..][$op]=..`).
    pub filters: Option<Filters>,
    /// Draft-and-publish state.
    pub publication_state: Option<PublicationState>,
    /// Page- or offset-based pagination.
    pub pagination: Option<Pagination>,
    /// Sort keys, e.g. `"createdAt:desc"`.
    pub sort: Vec<String>,
    /// Locale to query.
    pub locale: Option<String>,
}

impl QueryOptions {
    /// Assemble the options into the nested value the query string encodes.
    pub fn to_value(&self) -> Value {
        let mut root = Map::new();
        if !self.fields.is_empty() {
            root.insert("fields".to_string(), string_list(&self.fields));
        }
        if !self.populate.is_empty() {
            root.insert("populate".to_string(), string_list(&self.populate));
        }
        if let Some(filters) = &self.filters {
            root.insert("filters".to_string(), filters.clone().into_value());
        }
        if let Some(state) = &self.publication_state {
            root.insert(
                "publicationState".to_string(),
                serde_json::to_value(state).unwrap_or(Value::Null),
            );
        }
        if let Some(pagination) = &self.pagination {
            root.insert(
                "pagination".to_string(),
                serde_json::to_value(pagination).unwrap_or(Value::Null),
            );
        }
        if !self.sort.is_empty() {
            root.insert("sort".to_string(), string_list(&self.sort));
        }
        if let Some(locale) = &self.locale {
            root.insert("locale".to_string(), Value::String(locale.clone()));
        }
        Value::Object(root)
    }
}

fn string_list(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

/// Draft-and-publish state of the queried entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationState {
    Live,
    Preview,
}

/// Pagination, either page-based or offset-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Pagination {
    #[serde(rename_all = "camelCase")]
    Page { page: u32, page_size: u32 },
    Offset { start: u32, limit: u32 },
}

/// One filter operator, serialized under its `$`-prefixed name.
#[derive(Debug, Clone)]
pub enum FilterOp {
    Eq(Value),
    Ne(Value),
    Lt(Value),
    Lte(Value),
    Gt(Value),
    Gte(Value),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    Contains(Value),
    NotContains(Value),
    ContainsI(Value),
    NotContainsI(Value),
    Null(bool),
    NotNull(bool),
    Between(Value, Value),
    StartsWith(String),
    EndsWith(String),
}

impl FilterOp {
    pub(crate) fn key(&self) -> &'static str {
        match self {
            FilterOp::Eq(_) => "$eq",
            FilterOp::Ne(_) => "$ne",
            FilterOp::Lt(_) => "$lt",
            FilterOp::Lte(_) => "$lte",
            FilterOp::Gt(_) => "$gt",
            FilterOp::Gte(_) => "$gte",
            FilterOp::In(_) => "$in",
            FilterOp::NotIn(_) => "$notIn",
            FilterOp::Contains(_) => "$contains",
            FilterOp::NotContains(_) => "$notContains",
            FilterOp::ContainsI(_) => "$containsi",
            FilterOp::NotContainsI(_) => "$notContainsi",
            FilterOp::Null(_) => "$null",
            FilterOp::NotNull(_) => "$notNull",
            FilterOp::Between(_, _) => "$between",
            FilterOp::StartsWith(_) => "$startsWith",
            FilterOp::EndsWith(_) => "$endsWith",
        }
    }

    pub(crate) fn into_operand(self) -> Value {
        match self {
            FilterOp::Eq(v)
            | FilterOp::Ne(v)
            | FilterOp::Lt(v)
            | FilterOp::Lte(v)
            | FilterOp::Gt(v)
            | FilterOp::Gte(v)
            | FilterOp::Contains(v)
            | FilterOp::NotContains(v)
            | FilterOp::ContainsI(v)
            | FilterOp::NotContainsI(v) => v,
            FilterOp::In(items) | FilterOp::NotIn(items) => Value::Array(items),
            FilterOp::Null(b) | FilterOp::NotNull(b) => Value::Bool(b),
            FilterOp::Between(lo, hi) => Value::Array(vec![lo, hi]),
            FilterOp::StartsWith(s) | FilterOp::EndsWith(s) => Value::String(s),
        }
    }
}

/// A filter tree, built field by field.
///
/// Field paths use `.` to reach into relations and components:
/// `"likes.userId"` nests as `filters[likes][userId][..]`. Multiple
/// operators on the same path merge into one object.
#[derive(Debug, Clone, Default)]
pub struct Filters(Map<String, Value>);

impl Filters {
    pub fn new() -> Self {
        Filters(Map::new())
    }

    /// Add an operator on a (possibly dotted) field path.
    pub fn field(mut self, path: &str, op: FilterOp) -> Self {
        let mut node = &mut self.0;
        for segment in path.split('.') {
            let entry = node
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            node = entry.as_object_mut().expect("just inserted an object");
        }
        node.insert(op.key().to_string(), op.into_operand());
        self
    }

    /// Combine alternative filter branches under `$or`.
    pub fn or(mut self, branches: Vec<Filters>) -> Self {
        self.0.insert(
            "$or".to_string(),
            Value::Array(branches.into_iter().map(Filters::into_value).collect()),
        );
        self
    }

    /// Combine required filter branches under `$and`.
    pub fn and(mut self, branches: Vec<Filters>) -> Self {
        self.0.insert(
            "$and".to_string(),
            Value::Array(branches.into_iter().map(Filters::into_value).collect()),
        );
        self
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
