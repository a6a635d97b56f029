//! Scoped change of the process's current directory

use crate::{Error, Result, path};
use std::path::{Path, PathBuf};

/// Restores the previous current directory when dropped.
///
/// Guards nest: each one restores exactly the directory that was current
/// when it was created. The current directory is process-wide, so guards on
/// different threads race with each other.
#[must_use = "the previous directory is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct CwdGuard {
    previous: PathBuf,
    entered: PathBuf,
}

impl CwdGuard {
    /// Record the current directory and switch to `dir`.
    ///
    /// A leading `~` is expanded to the home directory.
    pub fn enter(dir: impl AsRef<Path>) -> Result<Self> {
        let entered = path::expand_home(dir);
        let previous = std::env::current_dir().map_err(|e| Error::PathNotFound {
            path: PathBuf::from("."),
            source: e,
        })?;

        tracing::debug!("entering working directory: {}", entered.display());
        std::env::set_current_dir(&entered).map_err(|e| Error::PathNotFound {
            path: entered.clone(),
            source: e,
        })?;

        Ok(Self { previous, entered })
    }

    /// The directory restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }

    /// The directory this guard switched to.
    pub fn entered(&self) -> &Path {
        &self.entered
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        tracing::debug!("returning to original directory: {}", self.previous.display());
        if let Err(e) = std::env::set_current_dir(&self.previous) {
            tracing::error!(
                "Failed to return to {}: {}",
                self.previous.display(),
                e
            );
        }
    }
}
