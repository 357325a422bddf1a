//! Logs what it sees and passes the value through.

use super::{Action, ExecutionContext, Rejection};
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct DebugAction {
    name: String,
}

impl DebugAction {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for DebugAction {
    fn default() -> Self {
        Self::new("debug")
    }
}

impl Action for DebugAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, ctx: &ExecutionContext<'_>, value: Value) -> Result<Value, Rejection> {
        tracing::debug!(
            stage = %self.name,
            dest = %ctx.dest,
            flag = %ctx.flag,
            parsed = ?ctx.parsed,
            value = ?value,
            is_list = value.is_list(),
            "Debug action invoked"
        );
        Ok(value)
    }
}
