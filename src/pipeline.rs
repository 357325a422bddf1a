//! Chains actions against one argument value.
//!
//! ```text
//! raw value → stage 0 → stage 1 → … → stage N-1 → final value
//!                │          │               │
//!                └── first rejection stops the run ──→ Failed(i)
//! ```
//!
//! Every stage sees exactly the value left by the one before it and runs in
//! the same [`ExecutionContext`], so failures are attributed to the
//! pipeline's own flag. The pipeline never writes the destination slot; the
//! registry writes the final value once after a successful run.

use serde::Deserialize;
use std::fmt;

use crate::action::{Action, ExecutionContext, Rejection};
use crate::catalog::Catalog;
use crate::diagnostics::{Failure, FailureRecord};
use crate::error::ConfigError;
use crate::literal::{Literal, ValueType};
use crate::value::Value;

/// One pipeline item: a bare action name, or a name with its own config.
///
/// Deserializes from either `"file_exists"` or
/// `{ action = "file_has_extension", values = ["md"] }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StageSpec {
    Bare(String),
    Configured {
        action: String,
        #[serde(default)]
        values: Vec<Literal>,
        #[serde(default, rename = "type")]
        value_type: Option<ValueType>,
    },
}

impl StageSpec {
    pub fn bare(action: impl Into<String>) -> Self {
        StageSpec::Bare(action.into())
    }

    pub fn configured<I, L>(action: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        StageSpec::Configured {
            action: action.into(),
            values: values.into_iter().map(Into::into).collect(),
            value_type: None,
        }
    }

    pub fn action(&self) -> &str {
        match self {
            StageSpec::Bare(action) | StageSpec::Configured { action, .. } => action,
        }
    }

    pub fn config(&self) -> StageConfig {
        match self {
            StageSpec::Bare(_) => StageConfig::default(),
            StageSpec::Configured {
                values, value_type, ..
            } => StageConfig {
                values: values.clone(),
                value_type: *value_type,
            },
        }
    }
}

/// Ordered stage list as written in an arguments file.
pub type PipelineSpec = Vec<StageSpec>;

/// Per-stage configuration handed to an action factory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageConfig {
    /// Allow-set entries, or messages for interactive actions.
    pub values: Vec<Literal>,
    /// Coercion for membership checks.
    pub value_type: Option<ValueType>,
}

impl StageConfig {
    pub fn with_values<I, L>(values: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Literal>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            value_type: None,
        }
    }

    /// The configured values, or a missing-attribute error for `action`.
    pub fn required_values(&self, action: &str) -> Result<Vec<Literal>, ConfigError> {
        if self.values.is_empty() {
            return Err(ConfigError::missing(action, "values"));
        }
        Ok(self.values.clone())
    }

    /// The configured values rendered as message lines.
    pub fn messages(&self) -> Vec<String> {
        self.values.iter().map(ToString::to_string).collect()
    }
}

/// Where a pipeline run is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Unstarted,
    /// Stage `i` is about to run.
    Running(usize),
    Succeeded(Value),
    Failed {
        stage_index: usize,
        rejection: Rejection,
    },
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Succeeded(_) | RunState::Failed { .. })
    }
}

/// How a finished run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded(Value),
    Failed {
        stage_index: usize,
        rejection: Rejection,
    },
}

impl Outcome {
    fn to_state(&self) -> RunState {
        match self {
            Outcome::Succeeded(value) => RunState::Succeeded(value.clone()),
            Outcome::Failed {
                stage_index,
                rejection,
            } => RunState::Failed {
                stage_index: *stage_index,
                rejection: rejection.clone(),
            },
        }
    }
}

/// An ordered, non-empty composition of actions.
pub struct Pipeline {
    stages: Vec<Box<dyn Action>>,
}

impl Pipeline {
    /// Compose already-built actions. Order is preserved exactly.
    pub fn new(stages: Vec<Box<dyn Action>>) -> Result<Self, ConfigError> {
        if stages.is_empty() {
            return Err(ConfigError::EmptyPipeline);
        }
        Ok(Self { stages })
    }

    /// Instantiate each stage from the catalog, eagerly.
    ///
    /// Unknown names and invalid per-stage configuration fail here, before
    /// any value is processed.
    pub fn from_spec(specs: &[StageSpec], catalog: &Catalog) -> Result<Self, ConfigError> {
        if specs.is_empty() {
            return Err(ConfigError::EmptyPipeline);
        }
        let stages = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                catalog
                    .build(spec.action(), &spec.config())
                    .map_err(|err| ConfigError::InvalidStage {
                        index,
                        name: spec.action().to_string(),
                        reason: err.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(stages)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Run every stage in order, reporting each state to `observe`.
    ///
    /// The first rejection stops the run; later stages never see the value.
    pub fn run(
        &self,
        ctx: &ExecutionContext<'_>,
        value: Value,
        observe: &mut dyn FnMut(&RunState),
    ) -> Outcome {
        observe(&RunState::Unstarted);

        let shape = value.shape();
        let mut current = value;

        for (index, stage) in self.stages.iter().enumerate() {
            observe(&RunState::Running(index));
            tracing::debug!(
                flag = %ctx.flag,
                stage = %stage.name(),
                index = index,
                "Running pipeline stage"
            );

            let rejection = match stage.apply(ctx, current) {
                Ok(next) if next.shape() == shape => {
                    current = next;
                    continue;
                }
                Ok(next) => {
                    let record = FailureRecord::new(stage.name(), next.shape(), next.into_vec());
                    let message = format!("{} changed the shape of the value", stage.name());
                    Rejection::Invalid(Failure::with_message(record, message))
                }
                Err(rejection) => rejection,
            };

            tracing::debug!(
                flag = %ctx.flag,
                stage = %stage.name(),
                index = index,
                reason = %rejection,
                "Pipeline stage rejected value"
            );
            let failed = Outcome::Failed {
                stage_index: index,
                rejection,
            };
            observe(&failed.to_state());
            return failed;
        }

        let succeeded = Outcome::Succeeded(current);
        observe(&succeeded.to_state());
        succeeded
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages)
            .finish()
    }
}

impl Action for Pipeline {
    fn name(&self) -> &str {
        "pipeline"
    }

    fn apply(&self, ctx: &ExecutionContext<'_>, value: Value) -> Result<Value, Rejection> {
        match self.run(ctx, value, &mut |_| {}) {
            Outcome::Succeeded(value) => Ok(value),
            Outcome::Failed { rejection, .. } => Err(rejection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Check, Namespace, TransformReplace};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn check(name: &str, func: impl Fn(&str) -> bool + Send + Sync + 'static) -> Box<dyn Action> {
        Box::new(
            Check::builder(name)
                .func(func)
                .message(format!("{name} failed"))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn empty_pipeline_is_rejected() {
        assert!(matches!(Pipeline::new(Vec::new()), Err(ConfigError::EmptyPipeline)));
        assert!(matches!(
            Pipeline::from_spec(&[], &Catalog::builtin()),
            Err(ConfigError::EmptyPipeline)
        ));
    }

    #[test]
    fn unknown_stage_fails_at_construction() {
        let specs = [StageSpec::bare("file_exists"), StageSpec::bare("no_such_action")];
        let err = Pipeline::from_spec(&specs, &Catalog::builtin()).unwrap_err();
        match err {
            ConfigError::InvalidStage { index, name, .. } => {
                assert_eq!(index, 1);
                assert_eq!(name, "no_such_action");
            }
            other => panic!("expected InvalidStage, got {other:?}"),
        }
    }

    #[test]
    fn stage_config_errors_surface_at_construction() {
        let specs = [StageSpec::bare("file_has_extension")];
        let err = Pipeline::from_spec(&specs, &Catalog::builtin()).unwrap_err();
        assert!(err.to_string().contains("values"));
    }

    #[test]
    fn states_progress_in_order() {
        let pipeline = Pipeline::new(vec![check("a", |_| true), check("b", |_| true)]).unwrap();
        let ns = Namespace::new();
        let ctx = ExecutionContext::new("v", "--v", &ns);

        let mut seen = Vec::new();
        let outcome = pipeline.run(&ctx, Value::scalar("x"), &mut |state| seen.push(state.clone()));

        assert_eq!(
            seen,
            vec![
                RunState::Unstarted,
                RunState::Running(0),
                RunState::Running(1),
                RunState::Succeeded(Value::scalar("x")),
            ]
        );
        assert_eq!(outcome, Outcome::Succeeded(Value::scalar("x")));
        assert!(seen.iter().rev().skip(1).all(|state| !state.is_terminal()));
    }

    #[test]
    fn first_failure_stops_the_run() {
        let later_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&later_calls);
        let pipeline = Pipeline::new(vec![
            check("first", |s| s != "bad"),
            check("second", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                true
            }),
        ])
        .unwrap();
        let ns = Namespace::new();
        let ctx = ExecutionContext::new("v", "--v", &ns);

        let outcome = pipeline.run(&ctx, Value::scalar("bad"), &mut |_| {});

        assert!(matches!(outcome, Outcome::Failed { stage_index: 0, .. }));
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failure_is_the_stage_diagnostic_unwrapped() {
        let pipeline = Pipeline::new(vec![check("first", |_| false)]).unwrap();
        let ns = Namespace::new();
        let ctx = ExecutionContext::new("v", "--v", &ns);

        let err = pipeline.apply(&ctx, Value::scalar("x")).unwrap_err();
        assert_eq!(err.to_string(), "first failed: x");
    }

    #[test]
    fn later_stage_sees_replaced_value() {
        let upper: Box<dyn Action> = Box::new(
            TransformReplace::builder("upper")
                .func(|s| s.to_uppercase())
                .build()
                .unwrap(),
        );
        let pipeline = Pipeline::new(vec![upper, check("is_upper", |s| s == "ABC")]).unwrap();
        let ns = Namespace::new();
        let ctx = ExecutionContext::new("v", "--v", &ns);

        let out = pipeline.apply(&ctx, Value::scalar("abc")).unwrap();
        assert_eq!(out, Value::scalar("ABC"));
    }

    #[derive(Debug)]
    struct Flatten;

    impl Action for Flatten {
        fn name(&self) -> &str {
            "flatten"
        }

        fn apply(&self, _ctx: &ExecutionContext<'_>, value: Value) -> Result<Value, Rejection> {
            Ok(Value::Scalar(value.into_vec().join(",")))
        }
    }

    #[test]
    fn shape_change_is_rejected() {
        let pipeline = Pipeline::new(vec![Box::new(Flatten) as Box<dyn Action>]).unwrap();
        let ns = Namespace::new();
        let ctx = ExecutionContext::new("v", "--v", &ns);

        let err = pipeline.apply(&ctx, Value::list(["a", "b"])).unwrap_err();
        assert_eq!(err.failure().unwrap().record.stage, "flatten");
    }

    #[test]
    fn stage_specs_deserialize_mixed() {
        #[derive(Deserialize)]
        struct Holder {
            pipeline: Vec<StageSpec>,
        }
        let holder: Holder = toml::from_str(
            r#"pipeline = [{ action = "choices", values = [1, 2], type = "int" }, "file_exists"]"#,
        )
        .unwrap();
        assert_eq!(holder.pipeline[0].action(), "choices");
        assert_eq!(holder.pipeline[0].config().value_type, Some(ValueType::Int));
        assert_eq!(holder.pipeline[1], StageSpec::bare("file_exists"));
    }
}
