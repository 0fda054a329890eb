use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

/// A parsed JSON value, extended with a `Date` variant produced by date
/// descriptors.
///
/// Object keys keep their insertion order so that encoded output follows the
/// declaration order of the descriptor that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum MappedValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Date(DateTime<Utc>),
    Array(Vec<MappedValue>),
    Object(IndexMap<String, MappedValue>),
}

impl MappedValue {
    /// Short runtime kind name, used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            MappedValue::Null => "null",
            MappedValue::Bool(_) => "boolean",
            MappedValue::Number(_) => "number",
            MappedValue::String(_) => "string",
            MappedValue::Date(_) => "date",
            MappedValue::Array(_) => "array",
            MappedValue::Object(_) => "object",
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, MappedValue>> {
        match self {
            MappedValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            MappedValue::Date(date) => Some(date),
            _ => None,
        }
    }

    /// Render back to plain JSON. Dates become RFC 3339 UTC strings with
    /// millisecond precision.
    pub fn to_json(&self) -> Value {
        match self {
            MappedValue::Null => Value::Null,
            MappedValue::Bool(b) => Value::Bool(*b),
            MappedValue::Number(n) => Value::Number(n.clone()),
            MappedValue::String(s) => Value::String(s.clone()),
            MappedValue::Date(d) => Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            MappedValue::Array(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            MappedValue::Object(map) => {
                let mut out = Map::with_capacity(map.len());
                for (key, value) in map {
                    out.insert(key.clone(), value.to_json());
                }
                Value::Object(out)
            }
        }
    }
}

impl From<Value> for MappedValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => MappedValue::Null,
            Value::Bool(b) => MappedValue::Bool(b),
            Value::Number(n) => MappedValue::Number(n),
            Value::String(s) => MappedValue::String(s),
            Value::Array(items) => {
                MappedValue::Array(items.into_iter().map(MappedValue::from).collect())
            }
            Value::Object(map) => MappedValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, MappedValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for MappedValue {
    fn from(value: &Value) -> Self {
        MappedValue::from(value.clone())
    }
}

impl From<MappedValue> for Value {
    fn from(value: MappedValue) -> Self {
        value.to_json()
    }
}
