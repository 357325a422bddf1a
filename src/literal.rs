//! Typed literals for allow-sets and the coercions that produce them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;

/// A typed value an argument element can be coerced or classified into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Literal {
    pub fn value_type(&self) -> ValueType {
        match self {
            Literal::Bool(_) => ValueType::Bool,
            Literal::Int(_) => ValueType::Int,
            Literal::Float(_) => ValueType::Float,
            Literal::Str(_) => ValueType::Str,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Literal::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Float(x) => write!(f, "{x}"),
            Literal::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Str(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::Str(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

/// Declared type of an allow-set, and the coercion applied to raw elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    #[default]
    Str,
    Int,
    Float,
    Bool,
}

impl ValueType {
    /// Coerce a raw argument element. `None` when the element does not parse.
    pub fn coerce(self, raw: &str) -> Option<Literal> {
        match self {
            ValueType::Str => Some(Literal::Str(raw.to_string())),
            ValueType::Int => raw.trim().parse().ok().map(Literal::Int),
            ValueType::Float => raw.trim().parse().ok().map(Literal::Float),
            ValueType::Bool => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(Literal::Bool(true)),
                "false" | "no" | "off" | "0" => Some(Literal::Bool(false)),
                _ => None,
            },
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Str => "str",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// Non-empty, homogeneous, ordered set of accepted values.
#[derive(Debug, Clone, PartialEq)]
pub struct AllowSet {
    items: Vec<Literal>,
    value_type: ValueType,
}

impl AllowSet {
    /// Validate and wrap `items`. `action` names the owner for error messages.
    pub fn new(action: &str, items: Vec<Literal>) -> Result<Self, ConfigError> {
        let Some(first) = items.first() else {
            return Err(ConfigError::EmptyAllowSet {
                action: action.to_string(),
            });
        };
        let value_type = first.value_type();
        if items.iter().any(|item| item.value_type() != value_type) {
            return Err(ConfigError::MixedAllowSet {
                action: action.to_string(),
            });
        }
        Ok(Self { items, value_type })
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn contains(&self, candidate: &Literal) -> bool {
        self.items.iter().any(|item| item == candidate)
    }
}
