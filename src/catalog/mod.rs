//! Named action factories.
//!
//! Argument files and [`Pipeline::from_spec`] refer to actions by name; the
//! catalog turns a name plus per-stage configuration into a ready action.
//! The built-in entries pair trivial leaf functions with their messages.

mod misc;
mod net;
mod path;
mod types;

pub use net::{is_valid_email, is_valid_ip_address, is_valid_ipv4_address, is_valid_ipv6_address};
pub use path::{
    create_directory, create_file, get_extension, is_empty_file, is_executable_path,
    is_existing_directory, is_existing_file, is_existing_path, is_readable_path, is_valid_directory,
    is_valid_file, is_valid_path, is_writable_path, resolve_path,
};
pub use types::{is_convertible_to_float, is_convertible_to_int, is_convertible_to_uuid, is_truthy};

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::action::{Action, Check};
use crate::console::{Console, TerminalConsole};
use crate::error::ConfigError;
use crate::pipeline::{Pipeline, StageConfig, StageSpec};

/// Builds an action from its per-stage configuration.
pub type Factory =
    Arc<dyn Fn(&StageConfig, &Catalog) -> Result<Box<dyn Action>, ConfigError> + Send + Sync>;

/// Registry of action factories keyed by snake_case name.
pub struct Catalog {
    factories: BTreeMap<String, Factory>,
    console: Arc<dyn Console>,
}

impl Catalog {
    /// A catalog with no entries.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
            console: Arc::new(TerminalConsole),
        }
    }

    /// A catalog with every built-in action registered.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        path::register(&mut catalog);
        types::register(&mut catalog);
        net::register(&mut catalog);
        misc::register(&mut catalog);
        catalog
    }

    /// Use `console` for interactive actions built from now on.
    pub fn with_console(mut self, console: Arc<dyn Console>) -> Self {
        self.console = console;
        self
    }

    pub fn console(&self) -> Arc<dyn Console> {
        Arc::clone(&self.console)
    }

    /// Register (or replace) a factory under `name`.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&StageConfig, &Catalog) -> Result<Box<dyn Action>, ConfigError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Instantiate the action registered as `name`.
    pub fn build(&self, name: &str, config: &StageConfig) -> Result<Box<dyn Action>, ConfigError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| ConfigError::UnknownAction {
                name: name.to_string(),
            })?;
        factory(config, self)
    }

    /// Shorthand for [`Pipeline::from_spec`].
    pub fn pipeline(&self, specs: &[StageSpec]) -> Result<Pipeline, ConfigError> {
        Pipeline::from_spec(specs, self)
    }

    /// Register a configuration-free [`Check`].
    fn register_check(
        &mut self,
        name: &'static str,
        func: fn(&str) -> bool,
        singular: &'static str,
        plural: &'static str,
    ) {
        self.register(name, move |_config: &StageConfig, _catalog: &Catalog| {
            let check = Check::builder(name)
                .func(func)
                .singular(singular)
                .plural(plural)
                .build()?;
            Ok(Box::new(check) as Box<dyn Action>)
        });
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
