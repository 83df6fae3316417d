//! Conversion between host containers and the canonical encoding.

use crate::{List, MarshalError, Record, Value};

/// Build a record from key/value pairs. A repeated key keeps its first
/// position and takes the last value.
pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Record {
    entries.into_iter().collect()
}

/// Key/value pairs of a record, in insertion order.
pub fn entries(value: &Value) -> Result<Vec<(String, Value)>, MarshalError> {
    match value {
        Value::Record(record) => Ok(record
            .iter()
            .map(|(k, v)| (k.to_owned(), v.clone()))
            .collect()),
        other => Err(MarshalError::Shape {
            expected: "record",
            got: other.kind(),
        }),
    }
}

/// Elements of a list as a host sequence.
pub fn list(value: &Value) -> Result<Vec<Value>, MarshalError> {
    match value {
        Value::List(list) => Ok(list.to_array()),
        other => Err(MarshalError::Shape {
            expected: "list",
            got: other.kind(),
        }),
    }
}

/// Wrap a host sequence as a list value.
pub fn from_array(items: Vec<Value>) -> Value {
    Value::from(List::from_array(items))
}

/// Pretty-print as JSON with two-space indentation.
pub fn json_to_string(value: &Value) -> Result<String, MarshalError> {
    let json = serde_json::Value::try_from(value)?;
    serde_json::to_string_pretty(&json).map_err(|e| MarshalError::Json(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_last_wins() {
        let record = object([
            ("a", Value::from(1)),
            ("b", Value::from(2)),
            ("a", Value::from(3)),
        ]);
        assert_eq!(
            entries(&Value::from(record)).unwrap(),
            vec![
                ("a".to_string(), Value::from(3)),
                ("b".to_string(), Value::from(2)),
            ]
        );
    }

    #[test]
    fn test_entries_rejects_list() {
        assert_eq!(
            entries(&from_array(vec![])),
            Err(MarshalError::Shape {
                expected: "record",
                got: "list",
            })
        );
    }

    #[test]
    fn test_list_rejects_record() {
        assert!(matches!(
            list(&Value::unit()),
            Err(MarshalError::Shape { expected: "list", .. })
        ));
    }

    #[test]
    fn test_json_number() {
        assert_eq!(json_to_string(&Value::from(42)).unwrap(), "42");
        assert_eq!(json_to_string(&Value::from(1.5)).unwrap(), "1.5");
    }

    #[test]
    fn test_json_record_is_indented() {
        let value = Value::from(object([("a", Value::from(1))]));
        assert_eq!(json_to_string(&value).unwrap(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_json_nested() {
        let value = Value::from(object([
            ("ok", Value::from(true)),
            ("xs", from_array(vec![Value::from("q\"uote")])),
        ]));
        assert_eq!(
            json_to_string(&value).unwrap(),
            "{\n  \"ok\": true,\n  \"xs\": [\n    \"q\\\"uote\"\n  ]\n}"
        );
    }
}
