//! Path leaf functions and the actions built on them.

use std::fs;
use std::path::Path;

use super::Catalog;
use crate::action::{Action, MembershipCheck, Transform, TransformReplace};
use crate::literal::{Literal, ValueType};
use crate::pipeline::StageConfig;

/// Canonical form of `path` with symlinks resolved.
///
/// Paths that do not exist are made absolute instead; if even that fails
/// the input comes back unchanged.
pub fn resolve_path(path: &str) -> String {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .map(|resolved| resolved.to_string_lossy().into_owned())
        .unwrap_or_else(|_| path.to_string())
}

pub fn is_existing_path(path: &str) -> bool {
    Path::new(path).exists()
}

pub fn is_existing_directory(path: &str) -> bool {
    Path::new(path).is_dir()
}

pub fn is_existing_file(path: &str) -> bool {
    Path::new(path).is_file()
}

pub fn is_readable_path(path: &str) -> bool {
    let path = Path::new(path);
    if path.is_dir() {
        fs::read_dir(path).is_ok()
    } else {
        fs::File::open(path).is_ok()
    }
}

pub fn is_writable_path(path: &str) -> bool {
    fs::metadata(path).is_ok_and(|meta| !meta.permissions().readonly())
}

#[cfg(unix)]
pub fn is_executable_path(path: &str) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).is_ok_and(|meta| meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
pub fn is_executable_path(path: &str) -> bool {
    is_existing_path(path)
}

/// Whether `path` exists or could be created inside an existing, writable
/// parent directory. A NUL byte or a trailing separator makes it invalid.
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || path.contains('\0') {
        return false;
    }
    if is_existing_path(path) {
        return true;
    }
    if path.ends_with('/') || path.ends_with(std::path::MAIN_SEPARATOR) {
        return false;
    }
    let parent = match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    parent
        .to_str()
        .is_some_and(|parent| is_existing_directory(parent) && is_writable_path(parent))
}

/// An existing directory, or a valid path where one could be created.
pub fn is_valid_directory(path: &str) -> bool {
    is_existing_directory(path) || (!is_existing_path(path) && is_valid_path(path))
}

/// An existing file, or a valid path where one could be created.
pub fn is_valid_file(path: &str) -> bool {
    is_existing_file(path) || (!is_existing_path(path) && is_valid_path(path))
}

pub fn is_empty_file(path: &str) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.is_file() && meta.len() == 0)
}

/// Extension without the leading dot; `None` when there is none.
pub fn get_extension(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
}

pub fn create_directory(path: &str) -> std::io::Result<()> {
    fs::create_dir_all(path)
}

pub fn create_file(path: &str) -> std::io::Result<()> {
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(drop)
}

fn ensure_directory(path: &str) {
    if is_existing_directory(path) {
        return;
    }
    if let Err(err) = create_directory(path) {
        tracing::warn!(path = %path, error = %err, "Failed to create directory");
    }
}

fn ensure_file(path: &str) {
    if is_existing_file(path) {
        return;
    }
    if let Err(err) = create_file(path) {
        tracing::warn!(path = %path, error = %err, "Failed to create file");
    }
}

pub(super) fn register(catalog: &mut Catalog) {
    catalog.register("resolve_path", |_config: &StageConfig, _catalog: &Catalog| {
        let action = TransformReplace::builder("resolve_path")
            .func(resolve_path)
            .build()?;
        Ok(Box::new(action) as Box<dyn Action>)
    });
    catalog.register("ensure_directory", |_config: &StageConfig, _catalog: &Catalog| {
        let action = Transform::builder("ensure_directory")
            .func(ensure_directory)
            .build()?;
        Ok(Box::new(action) as Box<dyn Action>)
    });
    catalog.register("ensure_file", |_config: &StageConfig, _catalog: &Catalog| {
        let action = Transform::builder("ensure_file").func(ensure_file).build()?;
        Ok(Box::new(action) as Box<dyn Action>)
    });
    catalog.register("file_has_extension", |config: &StageConfig, _catalog: &Catalog| {
        let allowed = config.required_values("file_has_extension")?;
        let action = MembershipCheck::builder("file_has_extension")
            .classifier(|path: Literal| {
                path.as_str()
                    .and_then(get_extension)
                    .map(Literal::Str)
            })
            .output_type(ValueType::Str)
            .allowed(allowed)
            .singular("File has unexpected extension")
            .plural("Files with unexpected extensions")
            .build()?;
        Ok(Box::new(action) as Box<dyn Action>)
    });

    catalog.register_check(
        "path_is_valid",
        is_valid_path,
        "Invalid path",
        "Invalid paths",
    );
    catalog.register_check(
        "path_exists",
        is_existing_path,
        "Non-existent path",
        "Non-existent paths",
    );
    catalog.register_check(
        "path_does_not_exist",
        |p| !is_existing_path(p),
        "Existing path",
        "Existing paths",
    );
    catalog.register_check(
        "path_is_readable",
        is_readable_path,
        "Unreadable path",
        "Unreadable paths",
    );
    catalog.register_check(
        "path_is_not_readable",
        |p| !is_readable_path(p),
        "Readable path",
        "Readable paths",
    );
    catalog.register_check(
        "path_is_writable",
        is_writable_path,
        "Unwritable path",
        "Unwritable paths",
    );
    catalog.register_check(
        "path_is_not_writable",
        |p| !is_writable_path(p),
        "Writable path",
        "Writable paths",
    );
    catalog.register_check(
        "path_is_executable",
        is_executable_path,
        "Inexecutable path",
        "Inexecutable paths",
    );
    catalog.register_check(
        "path_is_not_executable",
        |p| !is_executable_path(p),
        "Executable path",
        "Executable paths",
    );

    catalog.register_check(
        "directory_exists",
        is_existing_directory,
        "Non-existent directory",
        "Non-existent directories",
    );
    catalog.register_check(
        "directory_does_not_exist",
        |p| !is_existing_directory(p),
        "Existing directory",
        "Existing directories",
    );
    catalog.register_check(
        "directory_is_readable",
        |p| is_existing_directory(p) && is_readable_path(p),
        "Unreadable directory",
        "Unreadable directories",
    );
    catalog.register_check(
        "directory_is_writable",
        |p| is_existing_directory(p) && is_writable_path(p),
        "Unwritable directory",
        "Unwritable directories",
    );
    catalog.register_check(
        "directory_is_not_readable",
        |p| is_existing_directory(p) && !is_readable_path(p),
        "Readable directory",
        "Readable directories",
    );
    catalog.register_check(
        "directory_is_not_writable",
        |p| is_existing_directory(p) && !is_writable_path(p),
        "Writable directory",
        "Writable directories",
    );
    catalog.register_check(
        "directory_is_executable",
        |p| is_existing_directory(p) && is_executable_path(p),
        "Inexecutable directory",
        "Inexecutable directories",
    );
    catalog.register_check(
        "directory_is_not_executable",
        |p| is_existing_directory(p) && !is_executable_path(p),
        "Executable directory",
        "Executable directories",
    );
    catalog.register_check(
        "directory_is_valid",
        is_valid_directory,
        "Invalid directory",
        "Invalid directories",
    );

    catalog.register_check(
        "file_exists",
        is_existing_file,
        "Non-existent file",
        "Non-existent files",
    );
    catalog.register_check(
        "file_does_not_exist",
        |p| !is_existing_file(p),
        "Existing file",
        "Existing files",
    );
    catalog.register_check(
        "file_is_readable",
        |p| is_existing_file(p) && is_readable_path(p),
        "Unreadable file",
        "Unreadable files",
    );
    catalog.register_check(
        "file_is_writable",
        |p| is_existing_file(p) && is_writable_path(p),
        "Unwritable file",
        "Unwritable files",
    );
    catalog.register_check(
        "file_is_executable",
        |p| is_existing_file(p) && is_executable_path(p),
        "Inexecutable file",
        "Inexecutable files",
    );
    catalog.register_check(
        "file_is_not_readable",
        |p| is_existing_file(p) && !is_readable_path(p),
        "Readable file",
        "Readable files",
    );
    catalog.register_check(
        "file_is_not_writable",
        |p| is_existing_file(p) && !is_writable_path(p),
        "Writable file",
        "Writable files",
    );
    catalog.register_check(
        "file_is_not_executable",
        |p| is_existing_file(p) && !is_executable_path(p),
        "Executable file",
        "Executable files",
    );
    catalog.register_check(
        "file_is_valid",
        is_valid_file,
        "Invalid file",
        "Invalid files",
    );
    catalog.register_check("file_is_empty", is_empty_file, "Non-empty file", "Non-empty files");
    catalog.register_check(
        "file_is_not_empty",
        |p| is_existing_file(p) && !is_empty_file(p),
        "Empty file",
        "Empty files",
    );
}
