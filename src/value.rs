use serde::Serialize;

/// A schema-less view of an expression.
///
/// A record is an `Array` whose elements are all `Pair`s, which is exactly
/// what a `{ key = value ... }` block interprets to. Nothing distinguishes a
/// record from a list that happens to hold only pairs; callers decide.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    String(String),
    Array(Vec<Value>),
    /// `key = value`, serialised as a two element sequence.
    Pair(String, Box<Value>),
    /// An absent value. Dropped from arrays and records when written back.
    Null,
}

impl Value {
    pub fn pair(key: impl Into<String>, value: Value) -> Self {
        Value::Pair(key.into(), Box::new(value))
    }

    /// Builds a record from ordered key/value pairs. Duplicate keys are kept.
    pub fn record<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Array(
            pairs
                .into_iter()
                .map(|(key, value)| Value::pair(key, value))
                .collect(),
        )
    }

    /// Views an array of pairs as a record. Returns `None` for anything else;
    /// an empty array is an empty record.
    pub fn as_record(&self) -> Option<Vec<(&str, &Value)>> {
        match self {
            Value::Array(values) => values
                .iter()
                .map(|value| match value {
                    Value::Pair(key, value) => Some((key.as_str(), value.as_ref())),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Pair(..) => "assignment",
            Value::Null => "null",
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}
