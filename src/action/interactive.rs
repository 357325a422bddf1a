//! Actions that talk to the user: notify, confirm and prompt.

use std::fmt;
use std::sync::Arc;

use super::{Action, ExecutionContext, Rejection};
use crate::console::Console;
use crate::error::ConfigError;
use crate::value::Value;

/// What a [`Notify`] action does after showing its messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyMode {
    /// Show the messages and carry on.
    Continue,
    /// Show the messages and stop the program.
    Exit,
    /// Ask for confirmation; stop unless the user says yes.
    Confirm,
}

/// Shows configured messages, then continues, exits or asks to confirm.
/// The value always passes through unchanged.
#[derive(Clone)]
pub struct Notify {
    name: String,
    messages: Vec<String>,
    mode: NotifyMode,
    console: Arc<dyn Console>,
}

impl Notify {
    pub fn new(
        name: impl Into<String>,
        messages: Vec<String>,
        mode: NotifyMode,
        console: Arc<dyn Console>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if messages.is_empty() {
            return Err(ConfigError::EmptyMessages { action: name });
        }
        Ok(Self {
            name,
            messages,
            mode,
            console,
        })
    }

    fn show(&self, messages: &[String]) {
        for message in messages {
            if let Err(err) = self.console.print(message) {
                tracing::warn!(stage = %self.name, error = %err, "Failed to print message");
            }
        }
    }

    fn confirmed(&self) -> bool {
        // A single message doubles as the prompt; several are shown first.
        let prompt = match self.messages.as_slice() {
            [only] => only.as_str(),
            many => {
                self.show(many);
                ""
            }
        };
        self.console.confirm(prompt).unwrap_or_else(|err| {
            tracing::warn!(stage = %self.name, error = %err, "Confirmation failed, treating as no");
            false
        })
    }
}

impl fmt::Debug for Notify {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notify")
            .field("name", &self.name)
            .field("messages", &self.messages)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl Action for Notify {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, _ctx: &ExecutionContext<'_>, value: Value) -> Result<Value, Rejection> {
        let stop = match self.mode {
            NotifyMode::Continue => {
                self.show(&self.messages);
                false
            }
            NotifyMode::Exit => {
                self.show(&self.messages);
                true
            }
            NotifyMode::Confirm => !self.confirmed(),
        };

        if stop {
            return Err(Rejection::Exit {
                stage: self.name.clone(),
            });
        }
        Ok(value)
    }
}

/// Reads one line from the user and replaces the value with it.
///
/// The answer keeps the incoming shape: `Scalar(answer)` or
/// `List([answer])`. If reading fails (e.g. the user interrupts), the value
/// is left unchanged.
#[derive(Clone)]
pub struct Prompt {
    name: String,
    messages: Vec<String>,
    hidden: bool,
    console: Arc<dyn Console>,
}

impl Prompt {
    pub fn new(
        name: impl Into<String>,
        messages: Vec<String>,
        hidden: bool,
        console: Arc<dyn Console>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        if messages.is_empty() {
            return Err(ConfigError::EmptyMessages { action: name });
        }
        Ok(Self {
            name,
            messages,
            hidden,
            console,
        })
    }
}

impl fmt::Debug for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prompt")
            .field("name", &self.name)
            .field("messages", &self.messages)
            .field("hidden", &self.hidden)
            .finish_non_exhaustive()
    }
}

impl Action for Prompt {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, ctx: &ExecutionContext<'_>, value: Value) -> Result<Value, Rejection> {
        let prompt = self.messages.join("\n");
        match self.console.read_line(&prompt, self.hidden) {
            Ok(answer) => Ok(match value {
                Value::Scalar(_) => Value::Scalar(answer),
                Value::List(_) => Value::List(vec![answer]),
            }),
            Err(err) => {
                tracing::warn!(
                    stage = %self.name,
                    dest = %ctx.dest,
                    error = %err,
                    "Input cancelled, keeping original value"
                );
                Ok(value)
            }
        }
    }
}
