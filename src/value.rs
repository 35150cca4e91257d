use serde::{Deserialize, Serialize};

/// A configuration or custom-property value as the host hands it over:
/// an untyped scalar that is classified at the schema boundary.
///
/// The `Bool` variant is declared first on purpose. Untagged deserialization
/// tries variants in order, and a boolean must never come back as a number.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Str(String),
}

/// Widget kind a parameter resolves to in the host's input form.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Boolean,
    Number,
    String,
}

impl Value {
    /// Classifies a default value into a parameter kind. Booleans are checked
    /// before numbers; anything else falls back to `String`.
    pub fn kind(&self) -> ParamKind {
        match self {
            Value::Bool(_) => ParamKind::Boolean,
            Value::Number(_) => ParamKind::Number,
            Value::Str(_) => ParamKind::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}
