//! Working directory operations
//!
//! Every operation reads its [`Options`] when it is called, so changes made
//! through [`Workdir::options_mut`] apply to the next call.

use crate::cwd::CwdGuard;
use crate::mirror::{Exclusions, Mirror, SyncReport};
use crate::{Error, Options, Result, ignore, logging, path};
use std::fs;
use std::path::{Path, PathBuf};

/// Per-call overrides for [`Workdir::sync`].
///
/// Anything left unset falls back to the stored options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncArgs {
    /// Source tree; defaults to `sync_sourcedir`, then the current directory
    pub sourcedir: Option<PathBuf>,
    /// Whether to honor the source's `.gitignore`
    pub exclude_gitignore_entries: Option<bool>,
    /// Exclusion patterns replacing the stored list; an empty list counts
    /// as unset
    pub exclude_regex_list: Option<Vec<String>>,
}

impl SyncArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sourcedir(mut self, sourcedir: impl Into<PathBuf>) -> Self {
        self.sourcedir = Some(sourcedir.into());
        self
    }

    pub fn exclude_gitignore_entries(mut self, exclude: bool) -> Self {
        self.exclude_gitignore_entries = Some(exclude);
        self
    }

    pub fn exclude_regex_list<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_regex_list = Some(patterns.into_iter().map(Into::into).collect());
        self
    }
}

/// A managed working directory and the options that describe it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workdir {
    options: Options,
}

impl Workdir {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub fn into_options(self) -> Options {
        self.options
    }

    /// The configured directory, or [`Error::NotConfigured`].
    pub fn path(&self) -> Result<&Path> {
        self.options.require_path()
    }

    /// Make logging respect the debug setting.
    pub fn set_log_level(&self) -> logging::LogLevels {
        logging::set_log_level(self.options.debug)
    }

    /// Make the working directory the current directory until the returned
    /// guard is dropped.
    pub fn as_cwd(&self) -> Result<CwdGuard> {
        self.set_log_level();
        CwdGuard::enter(self.path()?)
    }

    /// Run `f` with the working directory as the current directory.
    ///
    /// The previous directory is restored even if `f` panics.
    pub fn with_cwd<T>(&self, f: impl FnOnce() -> T) -> Result<T> {
        let _guard = self.as_cwd()?;
        Ok(f())
    }

    /// Create and populate the working directory from a source tree.
    ///
    /// The target ends up matching the source: new and changed files are
    /// copied and entries missing from the source are purged. Paths
    /// matching an exclusion pattern are left alone on both sides. This runs
    /// in full on every call.
    pub fn sync(&self, args: SyncArgs) -> Result<SyncReport> {
        self.set_log_level();
        let target = self.path()?;

        let non_empty = |p: &PathBuf| !p.as_os_str().is_empty();
        let sourcedir = match args.sourcedir.filter(non_empty).or_else(|| {
            self.options
                .sync_sourcedir
                .clone()
                .filter(non_empty)
        }) {
            Some(dir) => path::absolutize(dir)?,
            None => std::env::current_dir().map_err(|e| Error::sync(".", e))?,
        };
        let exclude_gitignore_entries = args
            .exclude_gitignore_entries
            .unwrap_or(self.options.sync_exclude_gitignore_entries);
        let mut exclude_regex_list = match args.exclude_regex_list {
            Some(list) if !list.is_empty() => list,
            _ => self.options.sync_exclude_regex_list.clone(),
        };

        if exclude_gitignore_entries {
            exclude_regex_list.extend(ignore::read_gitignore(&sourcedir)?);
        }
        let exclusions = Exclusions::new(&exclude_regex_list)?;

        tracing::info!("syncing {} to {}", sourcedir.display(), target.display());
        tracing::debug!("excluding {:?} from sync", exclude_regex_list);

        Mirror::new(&sourcedir, target, &exclusions)
            .create(true)
            .purge(true)
            .run()
    }

    /// Create the working directory and any missing parents.
    pub fn create(&self) -> Result<()> {
        let target = self.path()?;
        if target.is_dir() {
            return Ok(());
        }
        tracing::info!("creating working directory: {}", target.display());
        fs::create_dir_all(target).map_err(|source| Error::PathCreation {
            path: target.to_path_buf(),
            source,
        })
    }

    /// Remove everything inside the working directory, keeping the
    /// directory itself.
    ///
    /// Stops at the first failure; entries already removed stay removed.
    pub fn clean(&self) -> Result<()> {
        let target = self.path()?;
        if !target.is_dir() {
            return Ok(());
        }
        tracing::info!("cleaning working directory: {}", target.display());

        let clean_err = |path: &Path, source| Error::PathClean {
            path: path.to_path_buf(),
            source,
        };
        for entry in fs::read_dir(target).map_err(|e| clean_err(target, e))? {
            let entry = entry.map_err(|e| clean_err(target, e))?;
            let entry_path = entry.path();
            let file_type = entry.file_type().map_err(|e| clean_err(&entry_path, e))?;
            let removed = if file_type.is_dir() {
                fs::remove_dir_all(&entry_path)
            } else {
                fs::remove_file(&entry_path)
            };
            removed.map_err(|e| clean_err(&entry_path, e))?;
        }
        Ok(())
    }

    /// Delete the working directory and everything in it.
    pub fn remove(&self) -> Result<()> {
        let target = self.path()?;
        if !target.is_dir() {
            return Ok(());
        }
        tracing::info!("removing working directory: {}", target.display());
        fs::remove_dir_all(target).map_err(|source| Error::PathRemove {
            path: target.to_path_buf(),
            source,
        })
    }

    /// Path of a file inside the working directory. Nothing is checked on
    /// disk.
    pub fn path_to_file<I>(&self, parts: I) -> Result<PathBuf>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        Ok(path::join_parts(self.path()?, parts))
    }

    /// Whether a file or directory exists inside the working directory.
    pub fn has_file<I>(&self, parts: I) -> Result<bool>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        Ok(self.path_to_file(parts)?.exists())
    }
}

impl From<Options> for Workdir {
    fn from(options: Options) -> Self {
        Self::new(options)
    }
}
