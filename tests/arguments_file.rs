mod common;

use argsmith::action::Namespace;
use argsmith::catalog::Catalog;
use argsmith::config::ArgumentsFile;
use argsmith::error::{ArgumentError, ConfigError};
use argsmith::registry::{Argument, ArgumentSet, FlagArity};
use argsmith::value::Value;
use clap::Command;
use common::ScriptedConsole;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_file(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("arguments.toml");
    std::fs::write(&path, content).expect("Failed to write arguments file");
    (temp_dir, path)
}

const NOTES: &str = r#"
[[argument]]
long = "note"
short = "n"
help = "Markdown note to create"
pipeline = [
    { action = "file_has_extension", values = ["md", "markdown"] },
    "file_does_not_exist",
]

[[argument]]
long = "level"
dest = "verbosity"
action = "choices"
values = [1, 2, 3]

[[argument]]
long = "tag"
arity = "repeated"
action = "choices"
values = ["work", "home"]
"#;

/// Test that the default path ends with the expected filename.
#[test]
fn test_default_path_ends_with_expected() {
    let path = ArgumentsFile::default_path();
    assert!(path.ends_with("argsmith/arguments.toml"));
}

/// Test loading a complete file and resolving a command line through it.
#[test]
fn test_load_build_and_resolve() {
    let (_dir, path) = write_file(NOTES);
    let file = ArgumentsFile::load(&path).unwrap();
    assert_eq!(file.arguments.len(), 3);
    assert_eq!(file.arguments[2].arity, FlagArity::Repeated);

    let set = file.build(&Catalog::builtin()).unwrap();
    let matches = set
        .augment(Command::new("notes"))
        .try_get_matches_from([
            "notes", "-n", "TODAY.md", "--level", "2", "--tag", "work", "--tag", "home",
        ])
        .unwrap();

    let ns = set.resolve(&matches).unwrap();
    assert_eq!(ns.get("note"), Some(&Value::scalar("TODAY.md")));
    assert_eq!(ns.get("verbosity"), Some(&Value::scalar("2")));
    assert_eq!(ns.get("tag"), Some(&Value::list(["work", "home"])));
}

/// Test that a missing file is a read error carrying the path.
#[test]
fn test_missing_file_is_read_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let err = ArgumentsFile::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Read { path: p, .. } if p == path));
}

/// Test that malformed TOML is a parse error.
#[test]
fn test_malformed_toml_is_parse_error() {
    let (_dir, path) = write_file("[[argument]\nlong = ");
    let err = ArgumentsFile::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

/// Test that an unknown arity is rejected at parse time.
#[test]
fn test_unknown_arity_is_parse_error() {
    let (_dir, path) = write_file(
        r#"
        [[argument]]
        long = "x"
        arity = "several"
        action = "debug"
        "#,
    );
    let err = ArgumentsFile::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

/// Test that duplicate flags fail validation during load.
#[test]
fn test_duplicate_long_fails_validation() {
    let (_dir, path) = write_file(
        r#"
        [[argument]]
        long = "file"
        action = "file_exists"

        [[argument]]
        long = "file"
        dest = "other"
        action = "file_exists"
        "#,
    );
    let err = ArgumentsFile::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Validation { .. }));
    assert!(err.to_string().contains("'--file'"));
}

/// Test that a mixed allow-set is caught when building, before parsing.
#[test]
fn test_mixed_allow_set_fails_build() {
    let (_dir, path) = write_file(
        r#"
        [[argument]]
        long = "level"
        action = "choices"
        values = [1, "two"]
        "#,
    );
    let file = ArgumentsFile::load(&path).unwrap();
    let err = file.build(&Catalog::builtin()).unwrap_err();
    assert!(matches!(err, ConfigError::MixedAllowSet { .. }));
}

/// Test that an empty file yields no arguments.
#[test]
fn test_empty_file_has_no_arguments() {
    let (_dir, path) = write_file("");
    let file = ArgumentsFile::load(&path).unwrap();
    assert!(file.arguments.is_empty());
    assert!(file.build(&Catalog::builtin()).unwrap().is_empty());
}

/// Test that notify_and_exit from a file requests exit and leaves its slot unset.
#[test]
fn test_notify_and_exit_requests_exit() {
    let (_dir, path) = write_file(
        r#"
        [[argument]]
        long = "about"
        arity = "switch"
        action = "notify_and_exit"
        values = ["argsmith counts lines"]
        "#,
    );
    let console = ScriptedConsole::new([]);
    let catalog = Catalog::builtin().with_console(console.clone());
    let set = ArgumentsFile::load(&path).unwrap().build(&catalog).unwrap();

    let matches = set
        .augment(Command::new("notes"))
        .try_get_matches_from(["notes", "--about"])
        .unwrap();
    let err = set.resolve(&matches).unwrap_err();
    assert!(matches!(
        &err,
        ArgumentError::Exit { flag, stage } if flag == "--about" && stage == "notify_and_exit"
    ));
    assert_eq!(console.printed(), vec!["argsmith counts lines"]);

    let mut ns = Namespace::new();
    let argument = set.iter().next().unwrap();
    assert!(argument.invoke(&mut ns, Value::scalar("")).is_err());
    assert!(!ns.contains("about"));
}

/// Test that duplicate short letters fail validation during load.
#[test]
fn test_duplicate_short_fails_validation() {
    let (_dir, path) = write_file(
        r#"
        [[argument]]
        long = "alpha"
        short = "x"
        action = "debug"

        [[argument]]
        long = "beta"
        short = "x"
        action = "debug"
        "#,
    );
    let err = ArgumentsFile::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Validation { .. }));
    assert!(err.to_string().contains("'-x'"));
}

/// Test that file entries clashing with existing arguments are refused
/// before clap sees them.
#[test]
fn test_clashing_entries_are_refused_on_merge() {
    let catalog = Catalog::builtin();
    let builtin = || {
        ArgumentSet::new().with(
            Argument::new("file", catalog.build("file_exists", &Default::default()).unwrap())
                .short('f')
                .arity(FlagArity::Repeated),
        )
    };

    for entry in [
        "long = \"file\"\ndest = \"other\"",
        "long = \"format\"\nshort = \"f\"",
        "long = \"path\"\ndest = \"file\"",
        "long = \"help\"",
    ] {
        let (_dir, path) = write_file(&format!("[[argument]]\n{entry}\naction = \"debug\"\n"));
        let extra = ArgumentsFile::load(&path).unwrap().build(&catalog).unwrap();

        let mut set = builtin();
        let err = set.merge(extra, &Command::new("notes")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { .. }), "{entry}");
        assert_eq!(set.len(), 1);
    }
}

/// Test that a merged set builds a command clap accepts.
#[test]
fn test_merged_entries_parse() {
    let (_dir, path) = write_file(NOTES);
    let catalog = Catalog::builtin();
    let extra = ArgumentsFile::load(&path).unwrap().build(&catalog).unwrap();
    let mut set = ArgumentSet::new().with(
        Argument::new("file", catalog.build("debug", &Default::default()).unwrap()).short('f'),
    );
    set.merge(extra, &Command::new("notes")).unwrap();

    let matches = set
        .augment(Command::new("notes"))
        .try_get_matches_from(["notes", "-f", "a.txt", "-n", "b.md"])
        .unwrap();
    let ns = set.resolve(&matches).unwrap();
    assert_eq!(ns.get("file"), Some(&Value::scalar("a.txt")));
    assert_eq!(ns.get("note"), Some(&Value::scalar("b.md")));
}
