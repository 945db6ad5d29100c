//! Bracket-notation query strings
//!
//! The content API expects nested options encoded with bracket paths:
//! `filters[id][$eq]=1&populate[0]=image&pagination[page]=2`. [`stringify`]
//! walks the assembled option tree and emits percent-encoded pairs;
//! [`parse`] rebuilds a nested value from such a string.

use crate::query::options::QueryOptions;
use serde_json::{Map, Value};
use url::form_urlencoded;

/// Serialize query options into a bracket-notation query string.
///
/// `null` leaves are skipped; everything else becomes one `key=value` pair,
/// percent-encoded. The result carries no leading `?`.
pub fn stringify(options: &QueryOptions) -> String {
    let mut pairs = Vec::new();
    collect_pairs("", &options.to_value(), &mut pairs);

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(&key, &value);
    }
    serializer.finish()
}

/// Parse a bracket-notation query string back into a nested value.
///
/// Bracket paths rebuild into objects; objects whose keys are the contiguous
/// indices `0..n` collapse into arrays. Leaf values stay strings, as the
/// wire format carries no type information. A leading `?` is tolerated.
pub fn parse(query: &str) -> Value {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut root = Map::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let segments = split_bracket_path(&key);
        if segments.is_empty() {
            continue;
        }
        insert_path(&mut root, &segments, Value::String(value.into_owned()));
    }

    collapse_arrays(Value::Object(root))
}

/// `filters[id][$between][0]` → `["filters", "id", "$between", "0"]`
fn split_bracket_path(key: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut rest = key;

    if let Some(open) = rest.find('[') {
        if open > 0 {
            segments.push(rest[..open].to_string());
        }
        rest = &rest[open..];
    } else {
        if !rest.is_empty() {
            segments.push(rest.to_string());
        }
        return segments;
    }

    while let Some(stripped) = rest.strip_prefix('[') {
        match stripped.find(']') {
            Some(close) => {
                segments.push(stripped[..close].to_string());
                rest = &stripped[close + 1..];
            }
            None => {
                // Unterminated bracket: keep the remainder as one segment.
                segments.push(stripped.to_string());
                break;
            }
        }
    }

    segments
}

fn insert_path(node: &mut Map<String, Value>, segments: &[String], value: Value) {
    let (head, tail) = match segments {
        [head, tail @ ..] => (head, tail),
        [] => return,
    };

    if tail.is_empty() {
        node.insert(head.clone(), value);
        return;
    }

    let entry = node
        .entry(head.clone())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        // A scalar and a nested path collided on the same key; the nested
        // path wins, matching last-write semantics of the flat pair list.
        *entry = Value::Object(Map::new());
    }
    if let Some(child) = entry.as_object_mut() {
        insert_path(child, tail, value);
    }
}

/// Rewrite objects keyed `0..n` into arrays, depth first.
fn collapse_arrays(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let collapsed: Map<String, Value> = map
                .into_iter()
                .map(|(key, value)| (key, collapse_arrays(value)))
                .collect();

            if is_index_map(&collapsed) {
                Value::Array(collapsed.into_iter().map(|(_, value)| value).collect())
            } else {
                Value::Object(collapsed)
            }
        }
        Value::Array(items) => {
            Value::Array(items.into_iter().map(collapse_arrays).collect())
        }
        other => other,
    }
}

fn is_index_map(map: &Map<String, Value>) -> bool {
    if map.is_empty() {
        return false;
    }
    let mut indices: Vec<usize> = Vec::with_capacity(map.len());
    for key in map.keys() {
        match key.parse::<usize>() {
            Ok(index) => indices.push(index),
            Err(_) => return false,
        }
    }
    indices.sort_unstable();
    indices.iter().enumerate().all(|(expected, &index)| expected == index)
}

fn collect_pairs(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}[{key}]")
                };
                collect_pairs(&path, child, out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                collect_pairs(&format!("{prefix}[{index}]"), child, out);
            }
        }
        Value::Null => {}
        Value::String(s) => out.push((prefix.to_string(), s.clone())),
        other => out.push((prefix.to_string(), other.to_string())),
    }
}
