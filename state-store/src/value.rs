//! State values
//!
//! A state holds one loosely-typed value. Writers decide the variant,
//! readers coerce with `as_f64()` / `is_truthy()` when they need to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value stored under a state id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Bool(bool),
    Number(i64),
    Float(f64),
    Text(String),
}

impl StateValue {
    /// Numeric view of the value
    ///
    /// Booleans map to 0/1, text is parsed if it looks like a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StateValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            StateValue::Number(n) => Some(*n as f64),
            StateValue::Float(f) => Some(*f),
            StateValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Integer view of the value, truncating floats
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            StateValue::Number(n) => Some(*n),
            other => other.as_f64().map(|f| f.trunc() as i64),
        }
    }

    /// Loose boolean interpretation
    pub fn is_truthy(&self) -> bool {
        match self {
            StateValue::Bool(b) => *b,
            StateValue::Number(n) => *n != 0,
            StateValue::Float(f) => *f != 0.0,
            StateValue::Text(s) => !s.is_empty() && s != "0" && !s.eq_ignore_ascii_case("false"),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StateValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateValue::Bool(b) => write!(f, "{}", b),
            StateValue::Number(n) => write!(f, "{}", n),
            StateValue::Float(v) => write!(f, "{}", v),
            StateValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for StateValue {
    fn from(value: bool) -> Self {
        StateValue::Bool(value)
    }
}

impl From<i64> for StateValue {
    fn from(value: i64) -> Self {
        StateValue::Number(value)
    }
}

impl From<u8> for StateValue {
    fn from(value: u8) -> Self {
        StateValue::Number(i64::from(value))
    }
}

impl From<f64> for StateValue {
    fn from(value: f64) -> Self {
        StateValue::Float(value)
    }
}

impl From<String> for StateValue {
    fn from(value: String) -> Self {
        StateValue::Text(value)
    }
}

impl From<&str> for StateValue {
    fn from(value: &str) -> Self {
        StateValue::Text(value.to_string())
    }
}
