//! Argument values: one string, or the list of strings from a repeated flag.

use serde::{Deserialize, Serialize};

/// The two shapes an argument value may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A single string.
    Scalar,
    /// An ordered sequence of strings (repeated flag or multi-value flag).
    List,
}

/// A raw or processed argument value.
///
/// A value keeps its shape through every action applied to it: actions may
/// replace the contents, never turn a scalar into a list or back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Scalar(String),
    List(Vec<String>),
}

impl Value {
    pub fn scalar(value: impl Into<String>) -> Self {
        Value::Scalar(value.into())
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::List(values.into_iter().map(Into::into).collect())
    }

    pub fn shape(&self) -> Shape {
        match self {
            Value::Scalar(_) => Shape::Scalar,
            Value::List(_) => Shape::List,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Elements in order; a scalar is a single element.
    pub fn elements(&self) -> &[String] {
        match self {
            Value::Scalar(s) => std::slice::from_ref(s),
            Value::List(items) => items,
        }
    }

    /// Apply `f` to every element, preserving shape.
    pub fn map<F>(self, mut f: F) -> Value
    where
        F: FnMut(&str) -> String,
    {
        match self {
            Value::Scalar(s) => Value::Scalar(f(&s)),
            Value::List(items) => Value::List(items.iter().map(|s| f(s)).collect()),
        }
    }

    /// Call `f` on every element in order.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(&String),
    {
        self.elements().iter().for_each(f)
    }

    /// True if `predicate` holds for every element.
    pub fn all<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&str) -> bool,
    {
        self.elements().iter().all(|s| predicate(s))
    }

    /// Elements for which `predicate` is false, in order.
    pub fn filter_failing<P>(&self, mut predicate: P) -> Vec<String>
    where
        P: FnMut(&str) -> bool,
    {
        self.elements()
            .iter()
            .filter(|s| !predicate(s))
            .cloned()
            .collect()
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            Value::Scalar(s) => vec![s],
            Value::List(items) => items,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Scalar(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Scalar(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(values: Vec<String>) -> Self {
        Value::List(values)
    }
}
