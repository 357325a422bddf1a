//! Choices plus the interactive and debug entries.

use super::Catalog;
use crate::action::{Action, DebugAction, MembershipCheck, Notify, NotifyMode, Prompt};
use crate::literal::ValueType;
use crate::pipeline::StageConfig;

fn notify(
    name: &str,
    mode: NotifyMode,
    config: &StageConfig,
    catalog: &Catalog,
) -> Result<Box<dyn Action>, crate::error::ConfigError> {
    let action = Notify::new(name, config.messages(), mode, catalog.console())?;
    Ok(Box::new(action) as Box<dyn Action>)
}

fn prompt(
    name: &str,
    hidden: bool,
    config: &StageConfig,
    catalog: &Catalog,
) -> Result<Box<dyn Action>, crate::error::ConfigError> {
    let action = Prompt::new(name, config.messages(), hidden, catalog.console())?;
    Ok(Box::new(action) as Box<dyn Action>)
}

pub(super) fn register(catalog: &mut Catalog) {
    catalog.register("choices", |config: &StageConfig, _catalog: &Catalog| {
        let allowed = config.required_values("choices")?;
        // Without an explicit type, elements are read as the allow-set's type.
        let coercion = config
            .value_type
            .or_else(|| allowed.first().map(|literal| literal.value_type()))
            .unwrap_or(ValueType::Str);
        let action = MembershipCheck::builder("choices")
            .identity()
            .coercion(coercion)
            .allowed(allowed)
            .singular("Value is not in the allowed choices")
            .plural("Values are not in the allowed choices")
            .build()?;
        Ok(Box::new(action) as Box<dyn Action>)
    });

    catalog.register("notify_and_continue", |config: &StageConfig, catalog: &Catalog| {
        notify("notify_and_continue", NotifyMode::Continue, config, catalog)
    });
    catalog.register("notify_and_exit", |config: &StageConfig, catalog: &Catalog| {
        notify("notify_and_exit", NotifyMode::Exit, config, catalog)
    });
    catalog.register("confirm", |config: &StageConfig, catalog: &Catalog| {
        notify("confirm", NotifyMode::Confirm, config, catalog)
    });
    catalog.register("get_input", |config: &StageConfig, catalog: &Catalog| {
        prompt("get_input", false, config, catalog)
    });
    catalog.register("get_secret_input", |config: &StageConfig, catalog: &Catalog| {
        prompt("get_secret_input", true, config, catalog)
    });
    catalog.register("debug", |_config: &StageConfig, _catalog: &Catalog| {
        Ok(Box::new(DebugAction::default()) as Box<dyn Action>)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ExecutionContext, Namespace};
    use crate::error::ConfigError;
    use crate::literal::Literal;
    use crate::value::Value;

    fn run(action: &dyn Action, value: Value) -> Result<Value, crate::action::Rejection> {
        let ns = Namespace::new();
        let ctx = ExecutionContext::new("v", "--v", &ns);
        action.apply(&ctx, value)
    }

    #[test]
    fn choices_infers_coercion_from_allow_set() {
        let catalog = Catalog::builtin();
        let action = catalog
            .build("choices", &StageConfig::with_values([Literal::Int(1), Literal::Int(2)]))
            .unwrap();

        assert!(run(action.as_ref(), Value::list(["1", " 2"])).is_ok());
        let err = run(action.as_ref(), Value::list(["1", "3", "x"])).unwrap_err();
        assert_eq!(err.to_string(), "Values are not in the allowed choices: 3, x");
    }

    #[test]
    fn choices_with_conflicting_type_is_rejected() {
        let config = StageConfig {
            values: vec![Literal::from("a")],
            value_type: Some(ValueType::Int),
        };
        let err = Catalog::builtin().build("choices", &config).unwrap_err();
        assert!(matches!(err, ConfigError::AllowSetTypeMismatch { .. }));
    }

    #[test]
    fn choices_without_values_is_missing_attribute() {
        let err = Catalog::builtin()
            .build("choices", &StageConfig::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingAttribute { attribute: "values", .. }
        ));
    }

    #[test]
    fn interactive_entries_need_messages() {
        let catalog = Catalog::builtin();
        for name in ["notify_and_continue", "confirm", "get_secret_input"] {
            let err = catalog.build(name, &StageConfig::default()).unwrap_err();
            assert!(matches!(err, ConfigError::EmptyMessages { .. }), "{name}");
        }
    }

    #[test]
    fn debug_passes_value_through() {
        let action = Catalog::builtin()
            .build("debug", &StageConfig::default())
            .unwrap();
        assert_eq!(
            run(action.as_ref(), Value::scalar("x")).unwrap(),
            Value::scalar("x")
        );
    }
}
