use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use argsmith::catalog::Catalog;
use argsmith::config::ArgumentsFile;
use argsmith::error::ArgumentError;
use argsmith::pipeline::StageSpec;
use argsmith::registry::{Argument, ArgumentSet, FlagArity};
use argsmith::value::Value;
use clap::{CommandFactory, FromArgMatches, Parser};

/// Count lines in text files whose flags are checked before use.
#[derive(Parser, Debug)]
#[command(name = "argsmith", version)]
struct Cli {
    /// Extra argument definitions (TOML). Defaults to the user config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print only the total line count
    #[arg(long)]
    count_only: bool,

    /// Print the resolved arguments as JSON and exit
    #[arg(long)]
    json: bool,
}

fn builtin_arguments(catalog: &Catalog) -> anyhow::Result<ArgumentSet> {
    let file = catalog.pipeline(&[
        StageSpec::bare("resolve_path"),
        StageSpec::configured("file_has_extension", ["md", "markdown", "txt"]),
        StageSpec::bare("file_is_readable"),
    ])?;
    let color = catalog.pipeline(&[StageSpec::configured("choices", ["red", "green", "blue"])])?;

    Ok(ArgumentSet::new()
        .with(
            Argument::new("file", Box::new(file))
                .short('f')
                .arity(FlagArity::Repeated)
                .help("Text file to count (.md, .markdown or .txt)"),
        )
        .with(
            Argument::new("color", Box::new(color))
                .short('c')
                .arity(FlagArity::Repeated)
                .help("Accent colour for the report"),
        ))
}

fn load_extra(path: Option<&PathBuf>, catalog: &Catalog) -> anyhow::Result<ArgumentSet> {
    let file = match path {
        Some(path) => ArgumentsFile::load(path)?,
        None => ArgumentsFile::load_default()?,
    };
    Ok(file.build(catalog)?)
}

/// Find `--config PATH` or `--config=PATH` in `args` (program name first).
///
/// The full parse needs the file's arguments, so this runs before it. The
/// last occurrence wins; scanning stops at `--`.
fn config_path_from<I, S>(args: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args = args.into_iter().map(Into::into).skip(1);
    let mut found = None;
    while let Some(arg) = args.next() {
        if arg == "--" {
            break;
        }
        if arg == "--config" {
            found = args.next().map(PathBuf::from);
        } else if let Some(path) = arg.to_str().and_then(|arg| arg.strip_prefix("--config=")) {
            found = Some(PathBuf::from(path));
        }
    }
    found
}

fn count_lines(path: &str) -> anyhow::Result<usize> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read '{path}'"))?;
    Ok(content.lines().count())
}

fn main() -> anyhow::Result<ExitCode> {
    argsmith::tracing::init_tracing();

    let config_path = config_path_from(std::env::args_os());

    let catalog = Catalog::builtin();
    let mut arguments = builtin_arguments(&catalog)?;
    arguments.merge(load_extra(config_path.as_ref(), &catalog)?, &Cli::command())?;

    let mut command = arguments.augment(Cli::command());
    let matches = command.clone().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };
    if let Some(path) = &cli.config {
        tracing::debug!(path = %path.display(), "Extra arguments loaded");
    }

    let namespace = match arguments.resolve(&matches) {
        Ok(namespace) => namespace,
        Err(ArgumentError::Exit { flag, stage }) => {
            tracing::info!(flag = %flag, stage = %stage, "Exit requested");
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => err.into_clap(&mut command).exit(),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&namespace)?);
        return Ok(ExitCode::SUCCESS);
    }

    let files = namespace.get("file").map(Value::elements).unwrap_or_default();
    let mut total = 0;
    for path in files {
        let lines = count_lines(path)?;
        total += lines;
        if !cli.count_only {
            println!("{lines:>8} {path}");
        }
    }

    match namespace.get("color").map(Value::elements) {
        Some(colors) if !cli.count_only => println!("{total:>8} total ({})", colors.join(", ")),
        _ => println!("{total:>8} total"),
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_found_after_other_flags() {
        assert_eq!(
            config_path_from(["argsmith", "--config", "x.toml"]),
            Some(PathBuf::from("x.toml"))
        );
        assert_eq!(
            config_path_from(["argsmith", "--file", "a.md", "--config", "x.toml"]),
            Some(PathBuf::from("x.toml"))
        );
        assert_eq!(
            config_path_from(["argsmith", "-f", "a.md", "--config=y.toml", "--json"]),
            Some(PathBuf::from("y.toml"))
        );
    }

    #[test]
    fn config_path_absent_or_after_separator() {
        assert_eq!(config_path_from(["argsmith", "--file", "a.md"]), None);
        assert_eq!(config_path_from(["argsmith", "--", "--config", "x.toml"]), None);
    }

    #[test]
    fn builtin_arguments_fit_the_command() {
        let catalog = Catalog::builtin();
        let mut arguments = builtin_arguments(&catalog).unwrap();
        arguments.merge(ArgumentSet::new(), &Cli::command()).unwrap();

        let clash = ArgumentsFile {
            arguments: vec![toml::from_str(
                r#"
                long = "files"
                short = "f"
                action = "file_exists"
                "#,
            )
            .unwrap()],
        }
        .build(&catalog)
        .unwrap();
        assert!(arguments.merge(clash, &Cli::command()).is_err());
    }
}
