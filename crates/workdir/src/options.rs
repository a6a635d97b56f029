//! Working directory options

use crate::{Error, Result, path};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings read by every working directory operation.
///
/// `path` is private so that it can only be assigned through
/// [`Options::set_path`], which keeps it absolute. Deserialization goes
/// through the same check: a relative `path` is resolved against the
/// current directory at the time it is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OptionsFile")]
pub struct Options {
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
    /// Raise logging to the detailed level
    pub debug: bool,
    /// Default source directory for sync
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_sourcedir: Option<PathBuf>,
    /// Whether sync honors the source's `.gitignore` by default
    pub sync_exclude_gitignore_entries: bool,
    /// Exclusion patterns sync applies by default
    pub sync_exclude_regex_list: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            path: None,
            debug: false,
            sync_sourcedir: None,
            sync_exclude_gitignore_entries: true,
            sync_exclude_regex_list: Vec::new(),
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// The working directory, if one has been assigned.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The working directory, or [`Error::NotConfigured`].
    pub fn require_path(&self) -> Result<&Path> {
        self.path().ok_or(Error::NotConfigured)
    }

    /// Assign the working directory.
    ///
    /// Relative input is resolved against the current directory now, not
    /// when the path is later used. On error the previous value is kept.
    pub fn set_path(&mut self, value: impl AsRef<Path>) -> Result<()> {
        let resolved = path::absolutize(value)?;
        tracing::debug!(path = %resolved.display(), "Working directory path set");
        self.path = Some(resolved);
        Ok(())
    }

    /// Forget the working directory.
    pub fn clear_path(&mut self) {
        self.path = None;
    }

    pub fn with_path(mut self, value: impl AsRef<Path>) -> Result<Self> {
        self.set_path(value)?;
        Ok(self)
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_sourcedir(mut self, sourcedir: impl Into<PathBuf>) -> Self {
        self.sync_sourcedir = Some(sourcedir.into());
        self
    }

    pub fn with_exclude_gitignore_entries(mut self, exclude: bool) -> Self {
        self.sync_exclude_gitignore_entries = exclude;
        self
    }

    pub fn with_exclude_regex(mut self, pattern: impl Into<String>) -> Self {
        self.sync_exclude_regex_list.push(pattern.into());
        self
    }
}

/// Options as written in a file, before `path` has been validated.
#[derive(Debug, Deserialize)]
pub(crate) struct OptionsFile {
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    debug: bool,
    #[serde(default)]
    sync_sourcedir: Option<PathBuf>,
    #[serde(default = "default_exclude_gitignore_entries")]
    sync_exclude_gitignore_entries: bool,
    #[serde(default)]
    sync_exclude_regex_list: Vec<String>,
}

fn default_exclude_gitignore_entries() -> bool {
    true
}

impl OptionsFile {
    /// Build validated options. Relative `path` and `sync_sourcedir` values
    /// are joined onto `base` when given. Without a base, `path` resolves
    /// against the current directory and `sync_sourcedir` is kept as written.
    pub(crate) fn resolve(self, base: Option<&Path>) -> Result<Options> {
        let mut options = Options {
            path: None,
            debug: self.debug,
            sync_sourcedir: None,
            sync_exclude_gitignore_entries: self.sync_exclude_gitignore_entries,
            sync_exclude_regex_list: self.sync_exclude_regex_list,
        };
        let rebase = |p: PathBuf| match base {
            Some(base) if !path::expand_home(&p).is_absolute() => base.join(p),
            _ => p,
        };
        if let Some(p) = self.path {
            options.set_path(rebase(p))?;
        }
        if let Some(src) = self.sync_sourcedir {
            let expanded = path::expand_home(rebase(src));
            options.sync_sourcedir = Some(if expanded.is_absolute() {
                path::clean(&expanded)
            } else {
                expanded
            });
        }
        Ok(options)
    }
}

impl TryFrom<OptionsFile> for Options {
    type Error = Error;

    fn try_from(file: OptionsFile) -> Result<Self> {
        file.resolve(None)
    }
}
