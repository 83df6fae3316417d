//! Runtime values of the source language.

use std::fmt;
use std::rc::Rc;

use crate::equality::{Equality, KeySetPolicy};
use crate::list::List;
use crate::MarshalError;

/// A runtime value.
///
/// Values are immutable once built. List tails are shared through `Rc`, so
/// cloning a value never copies a list spine.
#[derive(Debug, Clone)]
pub enum Value {
    /// The `True`/`False` variant.
    Boolean(bool),
    /// A cons list.
    List(Rc<List>),
    /// Ordered string-keyed fields.
    Record(Record),
    String(String),
    Number(f64),
}

impl Value {
    /// The unit value passed to nullary variant branches.
    pub fn unit() -> Self {
        Value::Record(Record::new())
    }

    pub fn string<A: AsRef<str>>(s: A) -> Self {
        Value::String(s.as_ref().to_owned())
    }

    pub fn number<N: Into<f64>>(n: N) -> Self {
        Value::Number(n.into())
    }

    /// Name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::List(_) => "list",
            Value::Record(_) => "record",
            Value::String(_) => "string",
            Value::Number(_) => "number",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(&**list),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Exact structural equality: record key sets must match on both sides.
///
/// This is independent of the policy used by the `equal` intrinsic.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        Equality::new(KeySetPolicy::Exact).holds(self, other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Value::List(Rc::new(list))
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(true) => write!(f, "True"),
            Value::Boolean(false) => write!(f, "False"),
            Value::List(list) => {
                write!(f, "[")?;
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Record(record) => {
                write!(f, "{{")?;
                for (i, (key, value)) in record.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Value::String(s) => write!(f, "{s:?}"),
            Value::Number(n) => write!(f, "{n}"),
        }
    }
}

/// String-keyed fields in insertion order. Keys are unique.
///
/// Fields live in a flat vector and lookups scan it, so `insert` and `get`
/// are linear in the field count. Building a record of `n` fields costs
/// O(n²); records are expected to stay small.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`. An existing key keeps its position and takes
    /// the new value.
    pub fn insert<K: Into<String>>(&mut self, key: K, value: Value) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        Equality::new(KeySetPolicy::Exact).records(self, other)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

impl IntoIterator for Record {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Largest integer an `f64` holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl TryFrom<&Value> for serde_json::Value {
    type Error = MarshalError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Ok(match value {
            Value::Boolean(b) => serde_json::Value::Bool(*b),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Number(n) => {
                if !n.is_finite() {
                    return Err(MarshalError::NonFinite(*n));
                }
                if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
                    serde_json::Value::from(*n as i64)
                } else {
                    serde_json::Number::from_f64(*n)
                        .map(serde_json::Value::Number)
                        .ok_or(MarshalError::NonFinite(*n))?
                }
            }
            Value::List(list) => serde_json::Value::Array(
                list.iter()
                    .map(serde_json::Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Record(record) => {
                let mut map = serde_json::Map::new();
                for (key, field) in record.iter() {
                    map.insert(key.to_owned(), serde_json::Value::try_from(field)?);
                }
                serde_json::Value::Object(map)
            }
        })
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = MarshalError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        Ok(match json {
            serde_json::Value::Null => {
                return Err(MarshalError::Unrepresentable("null".to_string()));
            }
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => Value::Number(
                n.as_f64()
                    .ok_or_else(|| MarshalError::Unrepresentable(n.to_string()))?,
            ),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                let items = items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Value::from(List::from_array(items))
            }
            serde_json::Value::Object(map) => Value::Record(
                map.into_iter()
                    .map(|(k, v)| Value::try_from(v).map(|v| (k, v)))
                    .collect::<Result<Record, _>>()?,
            ),
        })
    }
}
