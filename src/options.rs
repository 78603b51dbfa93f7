use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Result, StrategyError};

/// Option keys every strategy understands.
pub const RECOGNIZED: [&str; 4] = ["name", "description", "switchable", "hidden"];

/// Ordered configuration mapping handed to strategy construction.
///
/// Insertion order is kept so validation errors list offending keys the way
/// the caller wrote them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options {
    inner: Map<String, Value>,
}

impl Options {
    pub fn new() -> Self { Self::default() }

    /// Builder-style insert; a repeated key keeps its first position.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inner.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Keys outside `recognized`, in supplied order.
    pub fn unrecognized<'a>(
        &'a self,
        recognized: &'a [&'a str],
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.keys().filter(move |k| !recognized.contains(k))
    }

    /// Parse a JSON document, attributing failure to `name`.
    pub fn from_value(name: &str, value: Value) -> Result<Self> {
        match value {
            Value::Object(inner) => Ok(Self { inner }),
            Value::Null => Ok(Self::default()),
            other => Err(StrategyError::MalformedOptions {
                name: name.to_string(),
                found: json_kind(&other).to_string(),
            }),
        }
    }
}

impl From<Map<String, Value>> for Options {
    fn from(inner: Map<String, Value>) -> Self {
        Self { inner }
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
