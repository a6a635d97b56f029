//! Managed working directory
//!
//! Create a working directory, populate it from a source tree (honoring a
//! `.gitignore` and extra exclusion patterns), make it the current directory
//! for a while, clean it out, or remove it.
//!
//! Operations hang off a [`Workdir`], which owns its [`Options`]. The
//! [`global`] module keeps one process-wide set of options for callers that
//! prefer an ambient working directory.
//!
//! # Example
//!
//! ```no_run
//! use workdir::{Options, SyncArgs, Workdir};
//!
//! # fn main() -> workdir::Result<()> {
//! let wd = Workdir::new(Options::new().with_path("build/work")?);
//! wd.sync(SyncArgs::new().sourcedir("."))?;
//! let _cwd = wd.as_cwd()?;
//! // run tools inside build/work
//! # Ok(())
//! # }
//! ```

pub mod checksum;
pub mod config;
pub mod cwd;
pub mod error;
pub mod global;
pub mod ignore;
pub mod logging;
pub mod mirror;
pub mod ops;
pub mod options;
pub mod path;

pub use config::ConfigStore;
pub use cwd::CwdGuard;
pub use error::{Error, Result};
pub use ignore::gitignore_entry_to_regex;
pub use logging::{LogLevels, set_log_level};
pub use mirror::{Exclusions, SyncReport};
pub use ops::{SyncArgs, Workdir};
pub use options::Options;

/// Package version, stamped at build time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
