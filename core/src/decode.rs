//! JSON response body decoding.

use serde::de::{DeserializeOwned, Error as _};
use serde_json::Value;

use crate::error::{ApiError, Result};

/// Decode a response body into `T`.
///
/// The body is read as a stream of JSON values: whitespace around and between
/// values is accepted. Each value is laid over the ones before it, so a later
/// object only replaces the fields it carries and a `null` changes nothing.
/// Running out of input ends the stream successfully. A body with no non-null
/// value at all is a decode error.
pub fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T> {
    let mut merged: Option<Value> = None;
    for value in serde_json::Deserializer::from_str(body).into_iter::<Value>() {
        let value = value?;
        if let Some(target) = merged.as_mut() {
            overlay(target, value);
        } else if !value.is_null() {
            merged = Some(value);
        }
    }

    let merged = merged.ok_or_else(|| ApiError::Decode(serde_json::Error::custom("empty response body")))?;
    Ok(serde_json::from_value(merged)?)
}

/// Write `value` over `target`. Objects merge key by key, nulls are skipped,
/// anything else replaces.
fn overlay(target: &mut Value, value: Value) {
    match (target, value) {
        (_, Value::Null) => {}
        (Value::Object(existing), Value::Object(fields)) => {
            for (key, field) in fields {
                match existing.get_mut(&key) {
                    Some(slot) => overlay(slot, field),
                    None => {
                        existing.insert(key, field);
                    }
                }
            }
        }
        (target, other) => *target = other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u64,
        slug: Option<String>,
    }

    #[test]
    fn trailing_whitespace_is_accepted() {
        let item: Item = decode_body("{\"id\":7}\n\n  \t").unwrap();
        assert_eq!(item, Item { id: 7, slug: None });
    }

    #[test]
    fn later_value_overwrites_only_its_own_fields() {
        let item: Item = decode_body("{\"id\":1,\"slug\":\"a\"}{\"id\":2}").unwrap();
        assert_eq!(item.id, 2);
        assert_eq!(item.slug.as_deref(), Some("a"));
    }

    #[test]
    fn trailing_null_changes_nothing() {
        let item: Item = decode_body("{\"id\":1,\"slug\":\"a\"}\nnull").unwrap();
        assert_eq!(item.slug.as_deref(), Some("a"));
    }

    #[test]
    fn null_field_in_later_value_is_skipped() {
        let item: Item = decode_body("{\"id\":1,\"slug\":\"a\"} {\"slug\":null}").unwrap();
        assert_eq!(item.slug.as_deref(), Some("a"));
    }

    #[test]
    fn nested_objects_merge() {
        #[derive(Debug, Deserialize)]
        struct Outer {
            meta: Item,
        }
        let outer: Outer =
            decode_body("{\"meta\":{\"id\":1,\"slug\":\"a\"}}{\"meta\":{\"id\":3}}").unwrap();
        assert_eq!(outer.meta, Item { id: 3, slug: Some("a".to_string()) });
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = decode_body::<Item>("{\"id\":").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn garbage_after_value_is_a_decode_error() {
        let err = decode_body::<Item>("{\"id\":1} <html>").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn empty_body_is_a_decode_error() {
        let err = decode_body::<Item>("   ").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        let err = decode_body::<Item>("null").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn wrong_shape_after_merge_is_a_decode_error() {
        let err = decode_body::<Item>("{\"id\":\"seven\"}").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
