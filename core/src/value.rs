//! Results returned by the scripting collaborator.
//!
//! A script may produce anything its engine can represent. The evaluator
//! only accepts `Value::Bool`; every other result makes `javascript(..)`
//! evaluate to `false`.

use std::fmt;

/// A script result, reduced to the shapes a host can hand back.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The script produced no value.
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    /// The boolean payload, without any truthiness coercion.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Short name of the result shape, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Text(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{:?}", s),
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

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}
