//! The action contract and its built-in variants.
//!
//! ```text
//!                 Action (trait)
//!                      ▲
//!    ┌──────────┬──────┴─────┬────────────────┬──────────┐
//!    │          │            │                │          │
//!  Check   Transform  TransformReplace  MembershipCheck  Pipeline
//! ```
//!
//! Every action receives a value and an [`ExecutionContext`] and either
//! returns the value to hand downstream or a [`Rejection`]. Actions never
//! write the destination slot themselves; the registry writes it once after
//! the whole action (or pipeline) succeeds.

mod check;
mod debug;
mod interactive;
mod membership;
mod transform;

pub use check::{Check, CheckBuilder, Predicate};
pub use debug::DebugAction;
pub use interactive::{Notify, NotifyMode, Prompt};
pub use membership::{Classifier, MembershipCheck, MembershipCheckBuilder};
pub use transform::{
    Effect, Mapper, Transform, TransformBuilder, TransformReplace, TransformReplaceBuilder,
};

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::diagnostics::{Failure, FailureRecord, Templates};
use crate::value::Value;

/// One unit of check or transform behaviour applied to an argument value.
///
/// Implementations must not panic on user input and must validate their
/// configuration when constructed, not in `apply`.
pub trait Action: Send + Sync + fmt::Debug {
    /// Name used in failure records and logs.
    fn name(&self) -> &str;

    /// Check or transform `value`.
    ///
    /// # Returns
    /// * `Ok(Value)` - the value to pass on, same shape as the input
    /// * `Err(Rejection)` - the value was rejected, or the user asked to stop
    fn apply(&self, ctx: &ExecutionContext<'_>, value: Value) -> Result<Value, Rejection>;
}

/// Why an action did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The value failed validation.
    #[error("{0}")]
    Invalid(Failure),
    /// The program should stop without an error (e.g. declined confirmation).
    #[error("exit requested by {stage}")]
    Exit { stage: String },
}

impl Rejection {
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Rejection::Invalid(failure) => Some(failure),
            Rejection::Exit { .. } => None,
        }
    }
}

/// Reject `value` if `failing` is non-empty, rendering with `templates`.
pub(crate) fn reject_failing(
    stage: &str,
    templates: &Templates,
    value: &Value,
    failing: Vec<String>,
) -> Result<(), Rejection> {
    if failing.is_empty() {
        return Ok(());
    }
    let record = FailureRecord::new(stage, value.shape(), failing);
    Err(Rejection::Invalid(Failure::from_templates(templates, record)))
}

/// Context for one action invocation: which slot the value is headed for,
/// which flag produced it and what has been parsed so far.
///
/// Lives for one invocation; actions must not retain it.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionContext<'a> {
    pub dest: &'a str,
    pub flag: &'a str,
    pub parsed: &'a Namespace,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(dest: &'a str, flag: &'a str, parsed: &'a Namespace) -> Self {
        Self { dest, flag, parsed }
    }
}

/// Destination slots filled during one parse, keyed by `dest`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Namespace {
    slots: BTreeMap<String, Value>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, dest: &str) -> Option<&Value> {
        self.slots.get(dest)
    }

    pub fn contains(&self, dest: &str) -> bool {
        self.slots.contains_key(dest)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn set(&mut self, dest: &str, value: Value) {
        self.slots.insert(dest.to_string(), value);
    }
}
