//! Shared test utilities and a scripted console.

#![allow(dead_code, unused_imports)]

use argsmith::action::{Action, Check, ExecutionContext, Namespace, Rejection};
use argsmith::console::Console;
use argsmith::value::Value;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;
use std::sync::Arc;

/// Run `action` on `value` with a fresh namespace.
pub fn apply(action: &dyn Action, value: Value) -> Result<Value, Rejection> {
    let ns = Namespace::new();
    let ctx = ExecutionContext::new("value", "--value", &ns);
    action.apply(&ctx, value)
}

/// Every element a tracked check was called with, in order.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// A check that records each element it sees and accepts those passing `pred`.
pub fn tracked_check(name: &str, pred: fn(&str) -> bool) -> (Box<dyn Action>, CallLog) {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&log);
    let check = Check::builder(name)
        .func(move |s| {
            seen.lock().push(s.to_string());
            pred(s)
        })
        .singular(format!("{name} failed"))
        .plural(format!("{name} failed for"))
        .build()
        .expect("valid check");
    (Box::new(check), log)
}

/// One scripted reply to a console request.
#[derive(Debug, Clone)]
pub enum Reply {
    Confirm(bool),
    Line(String),
    Fail,
}

/// [`Console`] that answers from a script and records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    replies: Mutex<VecDeque<Reply>>,
    printed: Mutex<Vec<String>>,
    prompts: Mutex<Vec<(String, bool)>>,
}

impl ScriptedConsole {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        })
    }

    pub fn printed(&self) -> Vec<String> {
        self.printed.lock().clone()
    }

    /// Prompts shown so far, with whether input was hidden.
    pub fn prompts(&self) -> Vec<(String, bool)> {
        self.prompts.lock().clone()
    }

    fn next(&self) -> Option<Reply> {
        self.replies.lock().pop_front()
    }
}

impl Console for ScriptedConsole {
    fn print(&self, line: &str) -> io::Result<()> {
        self.printed.lock().push(line.to_string());
        Ok(())
    }

    fn confirm(&self, prompt: &str) -> io::Result<bool> {
        self.prompts.lock().push((prompt.to_string(), false));
        match self.next() {
            Some(Reply::Confirm(answer)) => Ok(answer),
            _ => Err(io::Error::new(io::ErrorKind::Interrupted, "no scripted answer")),
        }
    }

    fn read_line(&self, prompt: &str, hidden: bool) -> io::Result<String> {
        self.prompts.lock().push((prompt.to_string(), hidden));
        match self.next() {
            Some(Reply::Line(line)) => Ok(line),
            _ => Err(io::Error::new(io::ErrorKind::Interrupted, "no scripted line")),
        }
    }
}
