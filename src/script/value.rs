//! Runtime values held by a running script

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Variable value types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Boolean(bool),
}

/// Variable environment of one script run, keyed by variable name.
pub type Values = BTreeMap<String, Value>;

impl Value {
    /// Coerce a command-line argument: `true`/`false` become booleans,
    /// everything else stays a string.
    pub fn from_argument(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("true") {
            Value::Boolean(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Value::Boolean(false)
        } else {
            Value::String(raw.to_string())
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Boolean(b) => write!(f, "{}", b),
        }
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

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_coercion() {
        assert_eq!(Value::from_argument("true"), Value::Boolean(true));
        assert_eq!(Value::from_argument("FALSE"), Value::Boolean(false));
        assert_eq!(Value::from_argument("henk"), Value::String("henk".to_string()));
        assert_eq!(Value::from_argument("truthy"), Value::String("truthy".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(true).to_string(), "true");
        assert_eq!(Value::from("a b").to_string(), "a b");
    }
}
