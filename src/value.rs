//! Dynamically typed values for probing from the command line

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Declared value type of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    Int,
    Float,
    Bool,
    String,
}

impl ValueType {
    /// The zero value a default-on-miss container hands back
    pub fn zero(&self) -> Value {
        match self {
            ValueType::Int => Value::Int(0),
            ValueType::Float => Value::Float(0.0),
            ValueType::Bool => Value::Bool(false),
            ValueType::String => Value::Str(String::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Bool(_) => ValueType::Bool,
            Value::Str(_) => ValueType::String,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values() {
        assert_eq!(ValueType::Int.zero().to_string(), "0");
        assert_eq!(ValueType::Float.zero().to_string(), "0");
        assert_eq!(ValueType::Bool.zero().to_string(), "false");
        assert_eq!(ValueType::String.zero().to_string(), "");
    }

    #[test]
    fn test_zero_has_declared_type() {
        for vt in ValueType::value_variants() {
            assert_eq!(vt.zero().value_type(), *vt);
        }
    }
}
