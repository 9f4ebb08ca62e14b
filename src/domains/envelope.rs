use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Number, Value};

use crate::error::{ChatwireError, Result};

/// Discriminator naming the remote operation an envelope targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceTag {
    Login,
    Users,
    Channel,
    Channels,
    Other(String),
}

impl ServiceTag {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Login => "login",
            Self::Users => "users",
            Self::Channel => "channel",
            Self::Channels => "channels",
            Self::Other(tag) => tag,
        }
    }
}

impl From<&str> for ServiceTag {
    fn from(value: &str) -> Self {
        match value {
            "login" => Self::Login,
            "users" => Self::Users,
            "channel" => Self::Channel,
            "channels" => Self::Channels,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ServiceTag {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl fmt::Display for ServiceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dynamically typed `data` field.
///
/// Requests may only carry `Absent`, `Text`, `Number` and lists of `Text`.
/// Replies are decoded leniently: list items keep whatever type they had,
/// and booleans or nested objects are held as `Opaque` so they can be shown
/// verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Absent,
    Text(String),
    Number(Number),
    List(Vec<FieldValue>),
    Opaque(Value),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// String items of a list, skipping anything that is not a string.
    /// `None` when the value is not a list at all.
    pub fn text_items(&self) -> Option<Vec<&str>> {
        match self {
            Self::List(items) => Some(items.iter().filter_map(FieldValue::as_text).collect()),
            _ => None,
        }
    }

    /// Wire form for outgoing envelopes.
    pub fn to_wire(&self) -> Result<Value> {
        match self {
            Self::Absent => Ok(Value::Null),
            Self::Text(text) => Ok(Value::String(text.clone())),
            Self::Number(number) => Ok(Value::Number(number.clone())),
            Self::List(items) => items
                .iter()
                .map(|item| match item {
                    Self::Text(text) => Ok(Value::String(text.clone())),
                    other => Err(ChatwireError::Encoding(format!(
                        "list items must be strings, found {}",
                        other.kind()
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Self::Opaque(value) => Err(ChatwireError::Encoding(format!(
                "unsupported field value {value}"
            ))),
        }
    }

    /// Lossless JSON form, used when showing reply data verbatim.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Absent => Value::Null,
            Self::Text(text) => Value::String(text.clone()),
            Self::Number(number) => Value::Number(number.clone()),
            Self::List(items) => Value::Array(items.iter().map(FieldValue::to_json).collect()),
            Self::Opaque(value) => value.clone(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Absent => "null",
            Self::Text(_) => "string",
            Self::Number(_) => "number",
            Self::List(_) => "list",
            Self::Opaque(_) => "opaque value",
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::String(text) => Self::Text(text),
            Value::Number(number) => Self::Number(number),
            Value::Array(items) => Self::List(items.into_iter().map(FieldValue::from).collect()),
            other => Self::Opaque(other),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value.into_iter().map(FieldValue::Text).collect())
    }
}

pub type Fields = BTreeMap<String, FieldValue>;

/// Renders fields as compact JSON, losslessly (keys sorted).
pub fn fields_to_json(fields: &Fields) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect(),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub service: ServiceTag,
    pub data: Fields,
}

impl Envelope {
    pub fn new(service: impl Into<ServiceTag>, data: Fields) -> Self {
        Self {
            service: service.into(),
            data,
        }
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.data.get(key)
    }
}
