//! The process-wide working directory
//!
//! A single [`Options`] value shared by the whole process, for callers that
//! want one ambient working directory instead of passing a [`Workdir`]
//! around. Each free function takes a snapshot of the options when it is
//! called and releases the lock before touching the filesystem.
//!
//! The options are serialized by a mutex, but the current directory changed
//! by [`as_cwd`] is not: use from a single thread.

use crate::cwd::CwdGuard;
use crate::mirror::SyncReport;
use crate::ops::{SyncArgs, Workdir};
use crate::{Options, Result, logging};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

static OPTIONS: LazyLock<Mutex<Options>> = LazyLock::new(|| Mutex::new(Options::default()));

/// Lock the shared options for reading or mutation.
///
/// Do not hold the guard across calls to the other functions in this
/// module; they lock it themselves.
pub fn options() -> MutexGuard<'static, Options> {
    // A panic mid-update cannot leave Options in an invalid state
    OPTIONS.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Assign the shared working directory path.
pub fn set_path(value: impl AsRef<Path>) -> Result<()> {
    options().set_path(value)
}

/// Set the shared debug flag.
pub fn set_debug(debug: bool) {
    options().debug = debug;
}

/// Replace the shared options wholesale, returning the old ones.
pub fn replace(new: Options) -> Options {
    std::mem::replace(&mut *options(), new)
}

/// A [`Workdir`] holding a copy of the current shared options.
pub fn snapshot() -> Workdir {
    Workdir::new(options().clone())
}

pub fn set_log_level() -> logging::LogLevels {
    snapshot().set_log_level()
}

pub fn as_cwd() -> Result<CwdGuard> {
    snapshot().as_cwd()
}

pub fn sync(args: SyncArgs) -> Result<SyncReport> {
    snapshot().sync(args)
}

pub fn create() -> Result<()> {
    snapshot().create()
}

pub fn clean() -> Result<()> {
    snapshot().clean()
}

pub fn remove() -> Result<()> {
    snapshot().remove()
}

pub fn path_to_file<I>(parts: I) -> Result<PathBuf>
where
    I: IntoIterator,
    I::Item: AsRef<Path>,
{
    snapshot().path_to_file(parts)
}

pub fn has_file<I>(parts: I) -> Result<bool>
where
    I: IntoIterator,
    I::Item: AsRef<Path>,
{
    snapshot().has_file(parts)
}
