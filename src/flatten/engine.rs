//! The recursive flattening engine
//!
//! Converts envelope-wrapped API responses (`{"data": {"id", "attributes"}}`,
//! with relations nesting further envelopes) into flat records. The walk is
//! purely structural: every key of a structured record is classified by shape
//! and either kept, nulled, or recursed into.

use crate::error::{Error, Result};
use crate::flatten::classify::{classify, FieldKind};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

/// Flatten an envelope-wrapped response into a flat record tree.
///
/// `input` must be an object carrying a `data` key. `data: null` flattens to
/// `null`, `data: [..]` to an array of flat records (order preserved), and a
/// single entity to one flat record. The input is consumed; the caller's
/// other values are never touched.
///
/// # Errors
///
/// [`Error::MissingEnvelope`] when `input` (or any nested relation wrapper
/// reached during recursion) has no `data` key.
pub fn flatten(input: Value) -> Result<Value> {
    flatten_value(input, false)
}

/// Flatten an envelope-wrapped response and deserialize it into `T`.
pub fn flatten_into<T: DeserializeOwned>(input: Value) -> Result<T> {
    let flat = flatten(input)?;
    Ok(serde_json::from_value(flat)?)
}

/// Engine entry point shared by relations and components.
///
/// Components arrive re-wrapped in a synthetic `{"data": ..}` envelope with
/// `is_component` set, so a single recursion covers both cases.
pub(crate) fn flatten_value(input: Value, is_component: bool) -> Result<Value> {
    let Value::Object(mut envelope) = input else {
        return Err(Error::MissingEnvelope);
    };
    let data = envelope.remove("data").ok_or(Error::MissingEnvelope)?;

    match data {
        Value::Null => Ok(Value::Null),
        Value::Array(items) => {
            let flat: Result<Vec<Value>> = items
                .into_iter()
                .map(|item| reformat(item, is_component))
                .collect();
            Ok(Value::Array(flat?))
        }
        entity => reformat(entity, is_component),
    }
}

/// Strip the `{id, attributes}` indirection from an entity, or pass a
/// component through unchanged.
///
/// Entities rebuild as `id` first, then the attribute fields in their
/// original order. A missing or non-object `attributes` bag leaves only the
/// `id`. Non-object values (scalar elements inside component arrays) pass
/// through as-is.
fn structure(entity: Value, is_component: bool) -> Value {
    let Value::Object(mut obj) = entity else {
        return entity;
    };
    if is_component {
        return Value::Object(obj);
    }

    let mut flat = Map::new();
    if let Some(id) = obj.remove("id") {
        flat.insert("id".to_string(), id);
    }
    if let Some(Value::Object(attributes)) = obj.remove("attributes") {
        flat.extend(attributes);
    }
    Value::Object(flat)
}

/// Structure one entity, then walk its keys in insertion order and flatten
/// whatever the classifier says needs flattening.
fn reformat(entity: Value, is_component: bool) -> Result<Value> {
    let mut structured = match structure(entity, is_component) {
        Value::Object(map) => map,
        other => return Ok(other),
    };

    let keys: Vec<String> = structured.keys().cloned().collect();
    for key in keys {
        let replacement = match classify(&structured, &key) {
            FieldKind::Property => continue,
            FieldKind::NullRelation => Value::Null,
            FieldKind::Component => {
                let raw = take_field(&mut structured, &key);
                flatten_value(json!({ "data": raw }), true)?
            }
            FieldKind::Relation => {
                let envelope = take_field(&mut structured, &key);
                flatten_value(envelope, false)?
            }
        };
        structured.insert(key, replacement);
    }

    Ok(Value::Object(structured))
}

/// Swap a field out for `null` without disturbing key order; the caller
/// re-inserts the flattened replacement under the same key.
fn take_field(map: &mut Map<String, Value>, key: &str) -> Value {
    map.insert(key.to_string(), Value::Null).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    fn product_response() -> Value {
        json!({
            "data": [
                {
                    "id": 1,
                    "attributes": {
                        "no": "TEST",
                        "imageUrl": "http://localhost:1337/api/products/1/image",
                        "unitCode": {
                            "id": 1,
                            "full": "Stück",
                            "iso": "STK"
                        },
                        "image": {
                            "data": null
                        },
                        "payment": {
                            "address": {
                                "data": {
                                    "id": 1,
                                    "attributes": {
                                        "code": "TEST"
                                    }
                                }
                            }
                        },
                        "categories": {
                            "data": [
                                {
                                    "id": 1,
                                    "attributes": {
                                        "code": "TEST"
                                    }
                                }
                            ]
                        }
                    }
                }
            ]
        })
    }

    #[test]
    fn flattens_array_responses() {
        let flat = flatten(product_response()).unwrap();

        assert_eq!(
            flat,
            json!([
                {
                    "id": 1,
                    "no": "TEST",
                    "imageUrl": "http://localhost:1337/api/products/1/image",
                    "unitCode": {
                        "id": 1,
                        "full": "Stück",
                        "iso": "STK"
                    },
                    "image": null,
                    "payment": {
                        "address": {
                            "id": 1,
                            "code": "TEST"
                        }
                    },
                    "categories": [
                        {
                            "id": 1,
                            "code": "TEST"
                        }
                    ]
                }
            ])
        );
    }

    #[test]
    fn flattens_single_responses() {
        let mut response = product_response();
        let first = response["data"][0].take();
        let single = flatten(json!({ "data": first })).unwrap();

        // Same record, not wrapped in an array.
        assert!(single.is_object());
        assert_eq!(single["id"], json!(1));
        assert_eq!(single["no"], json!("TEST"));
        assert_eq!(single["categories"][0]["code"], json!("TEST"));
    }

    #[test]
    fn array_and_single_flattening_agree() {
        let entity = json!({
            "id": 7,
            "attributes": {
                "name": "x",
                "rel": { "data": { "id": 8, "attributes": { "v": 1 } } }
            }
        });

        let from_array = flatten(json!({ "data": [entity.clone()] })).unwrap();
        let from_single = flatten(json!({ "data": entity })).unwrap();
        assert_eq!(from_array, json!([from_single]));
    }

    #[test]
    fn null_data_flattens_to_null() {
        assert_eq!(flatten(json!({ "data": null })).unwrap(), json!(null));
    }

    #[test]
    fn missing_data_key_is_an_error() {
        let err = flatten(json!({ "id": 1 })).unwrap_err();
        assert!(matches!(err, Error::MissingEnvelope));

        // Non-object inputs have no `data` key either.
        assert!(matches!(
            flatten(json!([1, 2])).unwrap_err(),
            Error::MissingEnvelope
        ));
    }

    #[test]
    fn degenerate_scalar_payloads_pass_through() {
        // {"data": 1} classifies as a relation wherever it appears; the
        // payload is not an entity, so it survives unchanged instead of
        // gaining a phantom record shape.
        let response = json!({
            "data": {
                "id": 1,
                "attributes": {
                    "odd": { "data": 1 }
                }
            }
        });
        let flat = flatten(response).unwrap();
        assert_eq!(flat, json!({ "id": 1, "odd": 1 }));
    }

    #[test]
    fn empty_array_component_stays_an_empty_array() {
        let response = json!({
            "data": { "id": 1, "attributes": { "tags": [] } }
        });
        let flat = flatten(response).unwrap();
        assert_eq!(flat, json!({ "id": 1, "tags": [] }));
    }

    #[test]
    fn scalar_component_arrays_pass_through() {
        let response = json!({
            "data": { "id": 1, "attributes": { "tags": ["rust", "json"] } }
        });
        let flat = flatten(response).unwrap();
        assert_eq!(flat["tags"], json!(["rust", "json"]));
    }

    #[test]
    fn id_survives_in_type_and_value() {
        let numeric = flatten(json!({ "data": { "id": 42, "attributes": {} } })).unwrap();
        assert_eq!(numeric, json!({ "id": 42 }));

        let string = flatten(json!({ "data": { "id": "abc", "attributes": {} } })).unwrap();
        assert_eq!(string, json!({ "id": "abc" }));
    }

    #[test]
    fn missing_attributes_leaves_only_the_id() {
        let flat = flatten(json!({ "data": { "id": 3 } })).unwrap();
        assert_eq!(flat, json!({ "id": 3 }));
    }

    #[test]
    fn key_order_is_id_then_attributes() {
        let flat = flatten(json!({
            "data": { "attributes": { "b": 1, "a": 2 }, "id": 9 }
        }))
        .unwrap();

        let keys: Vec<&String> = flat.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["id", "b", "a"]);
    }

    #[test]
    fn deep_relation_chains_flatten() {
        let response = json!({
            "data": {
                "id": 1,
                "attributes": {
                    "author": {
                        "data": {
                            "id": 2,
                            "attributes": {
                                "team": {
                                    "data": { "id": 3, "attributes": { "name": "core" } }
                                }
                            }
                        }
                    }
                }
            }
        });

        let flat = flatten(response).unwrap();
        assert_eq!(flat["author"]["team"], json!({ "id": 3, "name": "core" }));
    }

    #[test]
    fn flatten_into_typed_records() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Category {
            id: u32,
            code: String,
        }

        #[derive(Debug, Deserialize)]
        struct Product {
            id: u32,
            no: String,
            image: Option<String>,
            categories: Vec<Category>,
        }

        let products: Vec<Product> = flatten_into(product_response()).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, 1);
        assert_eq!(products[0].no, "TEST");
        assert_eq!(products[0].image, None);
        assert_eq!(
            products[0].categories,
            vec![Category { id: 1, code: "TEST".to_string() }]
        );
    }

    #[test]
    fn flatten_into_reports_shape_mismatches() {
        #[derive(Debug, Deserialize)]
        struct Wrong {
            #[allow(dead_code)]
            id: String,
        }

        let err = flatten_into::<Wrong>(json!({ "data": { "id": 5 } })).unwrap_err();
        assert!(matches!(err, Error::Deserialize(_)));
    }
}
