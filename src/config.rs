//! Argument definition files.
//!
//! ```toml
//! [[argument]]
//! long = "file"
//! short = "f"
//! arity = "single"
//! pipeline = [
//!     { action = "file_has_extension", values = ["md", "markdown"] },
//!     "file_does_not_exist",
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::action::Action;
use crate::catalog::Catalog;
use crate::error::ConfigError;
use crate::literal::{Literal, ValueType};
use crate::pipeline::{PipelineSpec, StageConfig};
use crate::registry::{Argument, ArgumentSet, FlagArity, FlagNames};

/// A TOML file of `[[argument]]` entries.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArgumentsFile {
    #[serde(default, rename = "argument")]
    pub arguments: Vec<ArgumentEntry>,
}

/// One `[[argument]]` entry: a flag plus either a single action or a
/// pipeline of stages.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArgumentEntry {
    pub long: String,
    #[serde(default)]
    pub short: Option<char>,
    /// Defaults to `long` with dashes replaced by underscores.
    #[serde(default)]
    pub dest: Option<String>,
    #[serde(default)]
    pub arity: FlagArity,
    #[serde(default)]
    pub help: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub values: Vec<Literal>,
    #[serde(default, rename = "type")]
    pub value_type: Option<ValueType>,
    #[serde(default)]
    pub pipeline: Option<PipelineSpec>,
}

impl ArgumentEntry {
    pub fn dest(&self) -> String {
        self.dest
            .clone()
            .unwrap_or_else(|| self.long.replace('-', "_"))
    }

    fn build_action(&self, catalog: &Catalog) -> Result<Box<dyn Action>, ConfigError> {
        match (&self.action, &self.pipeline) {
            (Some(name), None) => {
                let config = StageConfig {
                    values: self.values.clone(),
                    value_type: self.value_type,
                };
                catalog.build(name, &config)
            }
            (None, Some(stages)) => Ok(Box::new(catalog.pipeline(stages)?) as Box<dyn Action>),
            _ => Err(self.shape_error()),
        }
    }

    fn shape_error(&self) -> ConfigError {
        ConfigError::Validation {
            message: format!(
                "Argument '--{}' needs exactly one of 'action' or 'pipeline'",
                self.long
            ),
        }
    }
}

impl ArgumentsFile {
    /// Returns the path to the default arguments file.
    ///
    /// Uses `~/.config/argsmith/arguments.toml` on Unix/macOS, or the
    /// equivalent via `dirs::config_dir()`. Falls back to the current
    /// directory if no config dir is available.
    pub fn default_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("argsmith").join("arguments.toml")
    }

    /// Read, parse and validate the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: ArgumentsFile = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.validate()?;
        tracing::debug!(
            path = %path.display(),
            arguments = file.arguments.len(),
            "Loaded arguments file"
        );
        Ok(file)
    }

    /// Like [`load`](Self::load) for the default path, but a missing file
    /// yields an empty set.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Checks:
    /// - every entry has exactly one of `action` / `pipeline`
    /// - `long` flags, `short` letters and destinations are unique
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = FlagNames::default();

        for entry in &self.arguments {
            if entry.action.is_some() == entry.pipeline.is_some() {
                return Err(entry.shape_error());
            }
            names.claim(&entry.dest(), &entry.long, entry.short)?;
        }
        Ok(())
    }

    /// Instantiate every entry's action eagerly.
    pub fn build(&self, catalog: &Catalog) -> Result<ArgumentSet, ConfigError> {
        let mut set = ArgumentSet::new();
        for entry in &self.arguments {
            let mut argument = Argument::new(entry.long.clone(), entry.build_action(catalog)?)
                .dest(entry.dest())
                .arity(entry.arity);
            if let Some(short) = entry.short {
                argument = argument.short(short);
            }
            if let Some(help) = &entry.help {
                argument = argument.help(help.clone());
            }
            set.push(argument);
        }
        Ok(set)
    }
}
