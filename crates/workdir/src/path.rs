//! Lexical path handling for the working directory
//!
//! Nothing in this module touches the filesystem except [`absolutize`],
//! which reads the process's current directory.

use crate::{Error, Result};
use std::path::{Component, Path, PathBuf};

/// The home-directory marker recognized at the start of a path.
pub const HOME_MARKER: &str = "~";

/// Expand a leading `~` component to the user's home directory.
///
/// Paths that do not start with the marker, or systems without a
/// resolvable home directory, are returned unchanged.
pub fn expand_home(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == HOME_MARKER => match dirs::home_dir() {
            Some(home) if components.as_path().as_os_str().is_empty() => home,
            Some(home) => home.join(components.as_path()),
            None => path.to_path_buf(),
        },
        _ => path.to_path_buf(),
    }
}

/// Resolve `path` to a lexically clean absolute path.
///
/// Relative input is resolved against the current directory at the time of
/// the call. `.` components are dropped and `..` pops the preceding
/// component; symlinks are not resolved and the path need not exist.
pub fn absolutize(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(Error::invalid_path(path, "path is empty"));
    }
    if path.as_os_str().as_encoded_bytes().contains(&0) {
        return Err(Error::invalid_path(path, "path contains a NUL byte"));
    }

    let expanded = expand_home(path);
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        let cwd = std::env::current_dir().map_err(|e| {
            Error::invalid_path(path, format!("current directory is unavailable: {e}"))
        })?;
        cwd.join(expanded)
    };

    Ok(clean(&absolute))
}

/// Lexically normalize a path without consulting the filesystem.
pub fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `..` at the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(part) => out.push(part),
        }
    }
    out
}

/// Join zero or more segments onto `base`.
///
/// An absolute segment replaces everything before it, as [`Path::join`] does.
pub fn join_parts<I>(base: &Path, parts: I) -> PathBuf
where
    I: IntoIterator,
    I::Item: AsRef<Path>,
{
    parts
        .into_iter()
        .fold(base.to_path_buf(), |acc, part| acc.join(part))
}

/// Render a relative path with forward slashes.
///
/// Exclusion patterns are written against `/`-separated paths regardless of
/// platform, so every relative path is converted before matching.
pub fn to_slash(path: &Path) -> String {
    let parts: Vec<_> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some("..".into()),
            _ => None,
        })
        .collect();
    parts.join("/")
}

/// Whether `inner` is `outer` or lies beneath it, comparing canonical forms
/// where they exist.
pub fn is_within(inner: &Path, outer: &Path) -> bool {
    let inner = dunce::canonicalize(inner).unwrap_or_else(|_| clean(inner));
    let outer = dunce::canonicalize(outer).unwrap_or_else(|_| clean(outer));
    inner.starts_with(outer)
}
