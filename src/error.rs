//! Error types: construction-time configuration errors and parse-time
//! argument errors.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Command;
use thiserror::Error;

use crate::diagnostics::FailureRecord;
use crate::literal::ValueType;

/// Errors raised while building actions, pipelines or argument sets.
///
/// These never depend on user input: they mean the program declaring the
/// arguments is wrong, and building the parser should stop.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{action}: Please supply required attribute: {attribute}")]
    MissingAttribute {
        action: String,
        attribute: &'static str,
    },

    #[error("{action}: allow-set cannot be empty")]
    EmptyAllowSet { action: String },

    #[error("{action}: items in allow-set should all have the same type")]
    MixedAllowSet { action: String },

    #[error("{action}: items in allow-set should be of type {expected}, found {found}")]
    AllowSetTypeMismatch {
        action: String,
        expected: ValueType,
        found: ValueType,
    },

    #[error("{action}: at least one message is required")]
    EmptyMessages { action: String },

    #[error("Pipeline requires at least one stage")]
    EmptyPipeline,

    #[error("Unknown action: {name}")]
    UnknownAction { name: String },

    #[error("Invalid pipeline stage {index} ({name}): {reason}")]
    InvalidStage {
        index: usize,
        name: String,
        reason: String,
    },

    #[error("Failed to read arguments file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse arguments file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Arguments validation failed: {message}")]
    Validation { message: String },
}

impl ConfigError {
    pub(crate) fn missing(action: &str, attribute: &'static str) -> Self {
        ConfigError::MissingAttribute {
            action: action.to_string(),
            attribute,
        }
    }
}

/// Raised while resolving parsed arguments through their actions.
#[derive(Debug, Error)]
pub enum ArgumentError {
    /// A value was rejected. Carries the rendered diagnostic; the parser
    /// boundary decides whether to print and exit.
    #[error("argument {flag}: {message}")]
    Invalid {
        flag: String,
        dest: String,
        message: String,
        record: FailureRecord,
    },

    /// An action asked the program to stop (notify-and-exit, declined
    /// confirmation). Not a failure.
    #[error("argument {flag}: exit requested by {stage}")]
    Exit { flag: String, stage: String },
}

impl ArgumentError {
    pub fn flag(&self) -> &str {
        match self {
            ArgumentError::Invalid { flag, .. } | ArgumentError::Exit { flag, .. } => flag,
        }
    }

    /// Convert into a clap `ValueValidation` error so clap renders the
    /// usage line and exits. Callers handle [`ArgumentError::Exit`] first.
    pub fn into_clap(self, command: &mut Command) -> clap::Error {
        command.error(ErrorKind::ValueValidation, self.to_string())
    }
}
