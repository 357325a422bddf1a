//! Membership checks: classify each element and look it up in an allow-set.

use std::fmt;
use std::sync::Arc;

use super::{reject_failing, Action, ExecutionContext, Rejection};
use crate::diagnostics::Templates;
use crate::error::ConfigError;
use crate::literal::{AllowSet, Literal, ValueType};
use crate::value::Value;

/// Maps a coerced element to the value looked up in the allow-set.
/// `None` means the element cannot be classified and counts as a failure.
pub type Classifier = Arc<dyn Fn(Literal) -> Option<Literal> + Send + Sync>;

/// For each element: coerce to the declared type, classify, test membership.
///
/// An element that cannot be coerced fails like any other non-member.
#[derive(Clone)]
pub struct MembershipCheck {
    name: String,
    classifier: Classifier,
    allowed: AllowSet,
    coercion: ValueType,
    templates: Templates,
}

impl MembershipCheck {
    pub fn builder(name: impl Into<String>) -> MembershipCheckBuilder {
        MembershipCheckBuilder {
            name: name.into(),
            classifier: None,
            identity: false,
            output: None,
            allowed: None,
            coercion: ValueType::Str,
            singular: None,
            plural: None,
        }
    }

    fn accepts(&self, raw: &str) -> bool {
        let Some(coerced) = self.coercion.coerce(raw) else {
            tracing::debug!(
                stage = %self.name,
                element = %raw,
                target = %self.coercion,
                "Element not coercible, treating as non-member"
            );
            return false;
        };
        (self.classifier)(coerced).is_some_and(|class| self.allowed.contains(&class))
    }
}

impl fmt::Debug for MembershipCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MembershipCheck")
            .field("name", &self.name)
            .field("allowed", &self.allowed)
            .field("coercion", &self.coercion)
            .field("templates", &self.templates)
            .finish_non_exhaustive()
    }
}

impl Action for MembershipCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, _ctx: &ExecutionContext<'_>, value: Value) -> Result<Value, Rejection> {
        let failing = value.filter_failing(|element| self.accepts(element));
        reject_failing(&self.name, &self.templates, &value, failing)?;
        Ok(value)
    }
}

/// Builder for [`MembershipCheck`].
///
/// Requires a classifier (or [`identity`](Self::identity)), a non-empty
/// homogeneous allow-set and both templates.
pub struct MembershipCheckBuilder {
    name: String,
    classifier: Option<Classifier>,
    identity: bool,
    output: Option<ValueType>,
    allowed: Option<Vec<Literal>>,
    coercion: ValueType,
    singular: Option<String>,
    plural: Option<String>,
}

impl MembershipCheckBuilder {
    pub fn classifier<F>(mut self, func: F) -> Self
    where
        F: Fn(Literal) -> Option<Literal> + Send + Sync + 'static,
    {
        self.classifier = Some(Arc::new(func));
        self.identity = false;
        self
    }

    /// Declare the classifier's output type; the allow-set must match it.
    pub fn output_type(mut self, value_type: ValueType) -> Self {
        self.output = Some(value_type);
        self
    }

    /// Look the coerced element up directly (plain choices).
    pub fn identity(mut self) -> Self {
        self.classifier = Some(Arc::new(|literal: Literal| Some(literal)));
        self.identity = true;
        self
    }

    pub fn allowed<I, L>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Coercion applied to raw elements before classification.
    pub fn coercion(mut self, value_type: ValueType) -> Self {
        self.coercion = value_type;
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

    pub fn message(self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.singular(message.clone()).plural(message)
    }

    pub fn build(self) -> Result<MembershipCheck, ConfigError> {
        let classifier = self
            .classifier
            .ok_or_else(|| ConfigError::missing(&self.name, "func"))?;
        let singular = self
            .singular
            .ok_or_else(|| ConfigError::missing(&self.name, "singular error message"))?;
        let plural = self
            .plural
            .ok_or_else(|| ConfigError::missing(&self.name, "plural error message"))?;
        let templates = Templates::new(&self.name, singular, plural)?;
        let items = self
            .allowed
            .ok_or_else(|| ConfigError::missing(&self.name, "values"))?;
        let allowed = AllowSet::new(&self.name, items)?;

        // An identity lookup compares the coerced element as-is.
        let expected = if self.identity {
            Some(self.coercion)
        } else {
            self.output
        };
        if let Some(expected) = expected.filter(|t| *t != allowed.value_type()) {
            return Err(ConfigError::AllowSetTypeMismatch {
                action: self.name,
                expected,
                found: allowed.value_type(),
            });
        }

        Ok(MembershipCheck {
            name: self.name,
            classifier,
            allowed,
            coercion: self.coercion,
            templates,
        })
    }
}
