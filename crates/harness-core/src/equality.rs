//! Structural equality.
//!
//! Results are returned as the `True`/`False` variant so that compiled code
//! can dispatch on them like any other boolean.

use serde::Deserialize;

use crate::{List, Record, Value};

/// How record key sets are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeySetPolicy {
    /// Both key counts are taken from the left operand, so the size check
    /// always passes and only the left keys are compared. A right record
    /// with extra fields still compares equal.
    #[default]
    Legacy,
    /// Key counts and key membership must match on both sides.
    Exact,
}

/// Deep equality under a key-set policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct Equality {
    policy: KeySetPolicy,
}

impl Equality {
    pub fn new(policy: KeySetPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> KeySetPolicy {
        self.policy
    }

    /// Compare and wrap the answer as a boolean variant.
    pub fn equal(&self, a: &Value, b: &Value) -> Value {
        Value::Boolean(self.holds(a, b))
    }

    pub fn holds(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Record(x), Value::Record(y)) => self.records(x, y),
            (Value::List(x), Value::List(y)) => self.lists(x, y),
            (Value::Boolean(x), Value::Boolean(y)) => x == y,
            (Value::String(x), Value::String(y)) => x == y,
            (Value::Number(x), Value::Number(y)) => x == y,
            _ => false,
        }
    }

    pub(crate) fn records(&self, a: &Record, b: &Record) -> bool {
        let (left_count, right_count) = match self.policy {
            KeySetPolicy::Legacy => (a.len(), a.len()),
            KeySetPolicy::Exact => (a.len(), b.len()),
        };
        if left_count != right_count {
            return false;
        }
        a.iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| self.holds(value, other)))
    }

    pub(crate) fn lists(&self, a: &List, b: &List) -> bool {
        let (mut left, mut right) = (a, b);
        loop {
            match (left, right) {
                (List::Empty, List::Empty) => return true,
                (List::Head(x, xs), List::Head(y, ys)) => {
                    if !self.holds(x, y) {
                        return false;
                    }
                    left = &**xs;
                    right = &**ys;
                }
                _ => return false,
            }
        }
    }
}

/// Compare under the default policy, returning a boolean variant.
pub fn equal(a: &Value, b: &Value) -> Value {
    Equality::default().equal(a, b)
}

/// Compare under the default policy.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    Equality::default().holds(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[(&str, i32)]) -> Value {
        Value::Record(fields.iter().map(|(k, v)| (*k, Value::from(*v))).collect())
    }

    fn strings(items: &[&str]) -> Value {
        Value::from(List::from_array(
            items.iter().copied().map(Value::from).collect(),
        ))
    }

    fn samples() -> Vec<Value> {
        vec![
            Value::from(true),
            Value::from(false),
            Value::from(0),
            Value::from(-2.5),
            Value::from(""),
            Value::from("text"),
            strings(&[]),
            strings(&["a", "b", "c"]),
            record(&[]),
            record(&[("a", 1), ("b", 2)]),
            Value::Record(
                [
                    ("xs", strings(&["x"])),
                    ("flag", Value::from(false)),
                    ("inner", record(&[("n", 3)])),
                ]
                .into_iter()
                .collect(),
            ),
        ]
    }

    #[test]
    fn test_reflexive() {
        for policy in [KeySetPolicy::Legacy, KeySetPolicy::Exact] {
            let eq = Equality::new(policy);
            for value in samples() {
                assert_eq!(eq.equal(&value, &value).as_bool(), Some(true), "{value}");
            }
        }
    }

    #[test]
    fn test_distinct_samples_differ() {
        let exact = Equality::new(KeySetPolicy::Exact);
        let values = samples();
        for (i, a) in values.iter().enumerate() {
            for (j, b) in values.iter().enumerate() {
                if i != j {
                    assert!(!exact.holds(a, b), "{a} vs {b}");
                }
            }
        }
    }

    #[test]
    fn test_list_and_record_shapes_differ() {
        assert_eq!(equal(&strings(&[]), &record(&[])), Value::from(false));
        assert_eq!(equal(&strings(&["a"]), &record(&[("a", 1)])), Value::from(false));
    }

    #[test]
    fn test_list_length_mismatch() {
        assert!(!deep_equal(&strings(&["a"]), &strings(&["a", "b"])));
        assert!(!deep_equal(&strings(&["a", "b"]), &strings(&["a"])));
    }

    #[test]
    fn test_record_order_is_ignored() {
        assert!(deep_equal(
            &record(&[("a", 1), ("b", 2)]),
            &record(&[("b", 2), ("a", 1)])
        ));
    }

    #[test]
    fn test_primitives_compare_by_value() {
        assert!(deep_equal(&Value::from(1), &Value::from(1.0)));
        assert!(!deep_equal(&Value::from(1), &Value::from("1")));
        assert!(!deep_equal(&Value::from(f64::NAN), &Value::from(f64::NAN)));
    }

    #[test]
    fn test_equal_composes() {
        let a = equal(&Value::from(1), &Value::from(1));
        let b = equal(&Value::from("x"), &Value::from("x"));
        assert_eq!(equal(&a, &b), Value::from(true));

        let c = equal(&Value::from(1), &Value::from(2));
        assert_eq!(equal(&a, &c), Value::from(false));
    }

    /// Key counts for both operands come from the left record under the
    /// legacy policy, so extra keys on the right go unnoticed.
    #[test]
    fn test_legacy_key_set_defect() {
        let small = record(&[("a", 1)]);
        let large = record(&[("a", 1), ("b", 2)]);

        let legacy = Equality::new(KeySetPolicy::Legacy);
        assert!(legacy.holds(&small, &large));
        assert!(!legacy.holds(&large, &small));

        let exact = Equality::new(KeySetPolicy::Exact);
        assert!(!exact.holds(&small, &large));
        assert!(!exact.holds(&large, &small));
    }

    #[test]
    fn test_same_size_different_keys() {
        let left = record(&[("a", 1)]);
        let right = record(&[("b", 1)]);
        for policy in [KeySetPolicy::Legacy, KeySetPolicy::Exact] {
            assert!(!Equality::new(policy).holds(&left, &right));
        }
    }

    #[test]
    fn test_legacy_defect_reaches_nested_records() {
        let left = Value::Record([("r", record(&[("a", 1)]))].into_iter().collect());
        let right = Value::Record(
            [("r", record(&[("a", 1), ("extra", 9)]))]
                .into_iter()
                .collect(),
        );
        assert!(Equality::new(KeySetPolicy::Legacy).holds(&left, &right));
        assert!(!Equality::new(KeySetPolicy::Exact).holds(&left, &right));
    }

    #[test]
    fn test_policy_deserializes_lowercase() {
        let policy: KeySetPolicy = serde_json::from_str("\"exact\"").unwrap();
        assert_eq!(policy, KeySetPolicy::Exact);
        assert_eq!(KeySetPolicy::default(), KeySetPolicy::Legacy);
    }
}
