//! Transform variants: side effect only, or replace each element.

use std::fmt;
use std::sync::Arc;

use super::{Action, ExecutionContext, Rejection};
use crate::error::ConfigError;
use crate::value::Value;

/// Effectful leaf function, e.g. create-file-if-absent.
pub type Effect = Arc<dyn Fn(&str) + Send + Sync>;

/// Leaf mapping function, e.g. canonicalize a path.
pub type Mapper = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Runs `func` once per element for its side effect, in list order.
/// The value passes through unchanged and the action never rejects.
#[derive(Clone)]
pub struct Transform {
    name: String,
    func: Effect,
}

impl Transform {
    pub fn builder(name: impl Into<String>) -> TransformBuilder {
        TransformBuilder {
            name: name.into(),
            func: None,
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Action for Transform {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, _ctx: &ExecutionContext<'_>, value: Value) -> Result<Value, Rejection> {
        value.for_each(|element| (self.func)(element));
        Ok(value)
    }
}

pub struct TransformBuilder {
    name: String,
    func: Option<Effect>,
}

impl TransformBuilder {
    pub fn func<F>(mut self, func: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.func = Some(Arc::new(func));
        self
    }

    pub fn build(self) -> Result<Transform, ConfigError> {
        let func = self.func.ok_or_else(|| ConfigError::missing(&self.name, "func"))?;
        Ok(Transform {
            name: self.name,
            func,
        })
    }
}

/// Replaces every element with `func(element)`, keeping the shape.
#[derive(Clone)]
pub struct TransformReplace {
    name: String,
    func: Mapper,
}

impl TransformReplace {
    pub fn builder(name: impl Into<String>) -> TransformReplaceBuilder {
        TransformReplaceBuilder {
            name: name.into(),
            func: None,
        }
    }
}

impl fmt::Debug for TransformReplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformReplace")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Action for TransformReplace {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, _ctx: &ExecutionContext<'_>, value: Value) -> Result<Value, Rejection> {
        Ok(value.map(|element| (self.func)(element)))
    }
}

pub struct TransformReplaceBuilder {
    name: String,
    func: Option<Mapper>,
}

impl TransformReplaceBuilder {
    pub fn func<F>(mut self, func: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.func = Some(Arc::new(func));
        self
    }

    pub fn build(self) -> Result<TransformReplace, ConfigError> {
        let func = self.func.ok_or_else(|| ConfigError::missing(&self.name, "func"))?;
        Ok(TransformReplace {
            name: self.name,
            func,
        })
    }
}
