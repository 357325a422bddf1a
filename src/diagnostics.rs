//! Failure records and the user-facing messages rendered from them.

use std::fmt;

use crate::error::ConfigError;
use crate::value::Shape;

/// Delimiter between failing elements in an aggregate message.
pub const FAILURE_DELIMITER: &str = ", ";

/// Error-message templates for one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    /// Used when a scalar value fails.
    pub singular: String,
    /// Used when one or more elements of a list fail.
    pub plural: String,
}

impl Templates {
    /// Build templates, rejecting blank text.
    pub fn new(
        action: &str,
        singular: impl Into<String>,
        plural: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let singular = singular.into();
        let plural = plural.into();
        if singular.trim().is_empty() {
            return Err(ConfigError::missing(action, "singular error message"));
        }
        if plural.trim().is_empty() {
            return Err(ConfigError::missing(action, "plural error message"));
        }
        Ok(Self { singular, plural })
    }

    /// Same text for both cases, e.g. "Non-existent file(s)".
    pub fn uniform(action: &str, message: impl Into<String>) -> Result<Self, ConfigError> {
        let message = message.into();
        Self::new(action, message.clone(), message)
    }

    pub fn for_shape(&self, shape: Shape) -> &str {
        match shape {
            Shape::Scalar => &self.singular,
            Shape::List => &self.plural,
        }
    }
}

/// Which elements failed, and in which stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    /// Name of the action that rejected the value.
    pub stage: String,
    /// Shape of the value the stage received.
    pub shape: Shape,
    /// Failing elements as the stage saw them, in order.
    pub values: Vec<String>,
}

impl FailureRecord {
    pub fn new(stage: impl Into<String>, shape: Shape, values: Vec<String>) -> Self {
        Self {
            stage: stage.into(),
            shape,
            values,
        }
    }
}

/// A rendered rejection: the record plus its diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub record: FailureRecord,
    pub message: String,
}

impl Failure {
    /// Render `record` with `templates`.
    pub fn from_templates(templates: &Templates, record: FailureRecord) -> Self {
        let message = render(templates, &record);
        Self { record, message }
    }

    /// A failure whose message is not template-driven.
    pub fn with_message(record: FailureRecord, message: impl Into<String>) -> Self {
        Self {
            record,
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// `"{singular}: {value}"` for a scalar, `"{plural}: {a, b, ...}"` for a list.
pub fn render(templates: &Templates, record: &FailureRecord) -> String {
    format!(
        "{}: {}",
        templates.for_shape(record.shape),
        record.values.join(FAILURE_DELIMITER)
    )
}
