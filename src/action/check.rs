//! Pass/fail on a predicate; the value is left untouched.

use std::fmt;
use std::sync::Arc;

use super::{reject_failing, Action, ExecutionContext, Rejection};
use crate::diagnostics::Templates;
use crate::error::ConfigError;
use crate::value::Value;

/// Leaf predicate evaluated on each element.
pub type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Accepts a value only if the predicate holds for every element.
///
/// A failing scalar is reported with the singular template; a list reports
/// every failing element under the plural template.
#[derive(Clone)]
pub struct Check {
    name: String,
    func: Predicate,
    templates: Templates,
}

impl Check {
    pub fn builder(name: impl Into<String>) -> CheckBuilder {
        CheckBuilder {
            name: name.into(),
            func: None,
            singular: None,
            plural: None,
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("name", &self.name)
            .field("templates", &self.templates)
            .finish_non_exhaustive()
    }
}

impl Action for Check {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, _ctx: &ExecutionContext<'_>, value: Value) -> Result<Value, Rejection> {
        let failing = value.filter_failing(|element| (self.func)(element));
        reject_failing(&self.name, &self.templates, &value, failing)?;
        Ok(value)
    }
}

/// Builder for [`Check`]. `func` and both templates are required.
pub struct CheckBuilder {
    name: String,
    func: Option<Predicate>,
    singular: Option<String>,
    plural: Option<String>,
}

impl CheckBuilder {
    pub fn func<F>(mut self, func: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.func = Some(Arc::new(func));
        self
    }

    pub fn singular(mut self, message: impl Into<String>) -> Self {
        self.singular = Some(message.into());
        self
    }

    pub fn plural(mut self, message: impl Into<String>) -> Self {
        self.plural = Some(message.into());
        self
    }

    /// Use the same message for single and aggregate failures.
    pub fn message(self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.singular(message.clone()).plural(message)
    }

    pub fn build(self) -> Result<Check, ConfigError> {
        let func = self.func.ok_or_else(|| ConfigError::missing(&self.name, "func"))?;
        let singular = self
            .singular
            .ok_or_else(|| ConfigError::missing(&self.name, "singular error message"))?;
        let plural = self
            .plural
            .ok_or_else(|| ConfigError::missing(&self.name, "plural error message"))?;
        let templates = Templates::new(&self.name, singular, plural)?;
        Ok(Check {
            name: self.name,
            func,
            templates,
        })
    }
}
