//! Binds flags to actions and bridges them to clap.
//!
//! clap parses the command line; [`ArgumentSet::resolve`] then shapes each
//! present flag's raw strings into a [`Value`], runs the flag's action and
//! writes the destination slot once the action has succeeded.

use std::collections::HashSet;

use clap::builder::ValueParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Deserialize;

use crate::action::{Action, ExecutionContext, Namespace, Rejection};
use crate::error::{ArgumentError, ConfigError};
use crate::value::Value;

/// How many values a flag takes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlagArity {
    /// Present or absent, no value (e.g. `--force`).
    Switch,
    /// Exactly one value (e.g. `--file notes.md`).
    #[default]
    Single,
    /// One or more values, flag may repeat (e.g. `--color red --color blue`).
    Repeated,
}

/// A single registered argument.
#[derive(Debug)]
pub struct Argument {
    /// Long form without dashes (e.g. "file").
    pub long: String,
    pub short: Option<char>,
    /// Destination slot in the [`Namespace`].
    pub dest: String,
    pub arity: FlagArity,
    pub help: Option<String>,
    pub action: Box<dyn Action>,
}

impl Argument {
    pub fn new(long: impl Into<String>, action: Box<dyn Action>) -> Self {
        let long = long.into();
        Self {
            dest: long.replace('-', "_"),
            long,
            short: None,
            arity: FlagArity::Single,
            help: None,
            action,
        }
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.dest = dest.into();
        self
    }

    pub fn arity(mut self, arity: FlagArity) -> Self {
        self.arity = arity;
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// The flag as the user types it (e.g. "--file").
    pub fn flag(&self) -> String {
        format!("--{}", self.long)
    }

    /// The clap definition of this argument, keyed by `dest`.
    pub fn to_clap(&self) -> Arg {
        let mut arg = Arg::new(self.dest.clone()).long(self.long.clone());
        if let Some(short) = self.short {
            arg = arg.short(short);
        }
        if let Some(help) = &self.help {
            arg = arg.help(help.clone());
        }
        match self.arity {
            FlagArity::Switch => arg.action(ArgAction::SetTrue),
            FlagArity::Single => arg
                .action(ArgAction::Set)
                .num_args(1)
                .value_parser(ValueParser::string()),
            FlagArity::Repeated => arg
                .action(ArgAction::Append)
                .num_args(1..)
                .value_parser(ValueParser::string()),
        }
    }

    /// Shape the raw matches for this argument. `None` when the flag is absent.
    fn raw_value(&self, matches: &ArgMatches) -> Option<Value> {
        match self.arity {
            FlagArity::Switch => matches
                .get_flag(&self.dest)
                .then(|| Value::scalar("")),
            FlagArity::Single => matches
                .get_one::<String>(&self.dest)
                .map(|raw| Value::scalar(raw.clone())),
            FlagArity::Repeated => matches
                .get_many::<String>(&self.dest)
                .map(|raws| Value::list(raws.cloned())),
        }
    }

    /// Run the action on `value` and, on success, write the slot.
    ///
    /// The slot is written exactly once; a rejected value leaves it untouched.
    pub fn invoke(&self, namespace: &mut Namespace, value: Value) -> Result<(), ArgumentError> {
        let flag = self.flag();
        let ctx = ExecutionContext::new(&self.dest, &flag, namespace);

        match self.action.apply(&ctx, value) {
            Ok(value) => {
                tracing::debug!(flag = %flag, dest = %self.dest, "Argument accepted");
                namespace.set(&self.dest, value);
                Ok(())
            }
            Err(Rejection::Invalid(failure)) => {
                tracing::debug!(flag = %flag, stage = %failure.record.stage, "Argument rejected");
                Err(ArgumentError::Invalid {
                    flag,
                    dest: self.dest.clone(),
                    message: failure.message,
                    record: failure.record,
                })
            }
            Err(Rejection::Exit { stage }) => Err(ArgumentError::Exit { flag, stage }),
        }
    }
}

/// Ordered collection of arguments, resolved in registration order.
#[derive(Debug, Default)]
pub struct ArgumentSet {
    arguments: Vec<Argument>,
}

impl ArgumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, argument: Argument) {
        self.arguments.push(argument);
    }

    pub fn with(mut self, argument: Argument) -> Self {
        self.push(argument);
        self
    }

    pub fn extend(&mut self, other: ArgumentSet) {
        self.arguments.extend(other.arguments);
    }

    /// Append `extra` after checking that none of its destinations, long
    /// flags or short letters are taken by this set or by `command`, the
    /// command both sets are about to be added to.
    pub fn merge(&mut self, extra: ArgumentSet, command: &Command) -> Result<(), ConfigError> {
        let mut names = FlagNames::of_command(command);
        for argument in self.arguments.iter().chain(&extra.arguments) {
            names.claim(&argument.dest, &argument.long, argument.short)?;
        }
        self.extend(extra);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.arguments.iter()
    }

    /// Add every argument to `command`.
    pub fn augment(&self, command: Command) -> Command {
        self.arguments
            .iter()
            .fold(command, |command, argument| command.arg(argument.to_clap()))
    }

    /// Run each present argument's action and collect the results.
    ///
    /// Stops at the first rejected argument. Absent flags are skipped and
    /// their slots stay unset.
    pub fn resolve(&self, matches: &ArgMatches) -> Result<Namespace, ArgumentError> {
        let mut namespace = Namespace::new();
        for argument in &self.arguments {
            let Some(value) = argument.raw_value(matches) else {
                continue;
            };
            argument.invoke(&mut namespace, value)?;
        }
        Ok(namespace)
    }
}

/// Destinations and flag names already in use.
#[derive(Debug, Default)]
pub(crate) struct FlagNames {
    dests: HashSet<String>,
    longs: HashSet<String>,
    shorts: HashSet<char>,
}

impl FlagNames {
    /// Names taken by `command`'s own arguments and by the help and version
    /// flags clap generates.
    fn of_command(command: &Command) -> Self {
        let mut names = Self::default();
        for generated in ["help", "version"] {
            names.dests.insert(generated.to_string());
            names.longs.insert(generated.to_string());
        }
        names.shorts.extend(['h', 'V']);

        for arg in command.get_arguments() {
            names.dests.insert(arg.get_id().as_str().to_string());
            if let Some(long) = arg.get_long() {
                names.longs.insert(long.to_string());
            }
            if let Some(short) = arg.get_short() {
                names.shorts.insert(short);
            }
        }
        names
    }

    /// Take `dest`, `--long` and `-short`, failing on the first one in use.
    pub(crate) fn claim(
        &mut self,
        dest: &str,
        long: &str,
        short: Option<char>,
    ) -> Result<(), ConfigError> {
        if !self.longs.insert(long.to_string()) {
            return Err(in_use(format!("Flag '--{long}'")));
        }
        if let Some(short) = short {
            if !self.shorts.insert(short) {
                return Err(in_use(format!("Flag '-{short}'")));
            }
        }
        if !self.dests.insert(dest.to_string()) {
            return Err(in_use(format!("Destination '{dest}'")));
        }
        Ok(())
    }
}

fn in_use(what: String) -> ConfigError {
    ConfigError::Validation {
        message: format!("{what} is already in use"),
    }
}
