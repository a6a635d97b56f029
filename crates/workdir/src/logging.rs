//! Logging setup and debug-flag driven verbosity
//!
//! Operations log under the [`TARGET`] target; the directory mirror logs
//! under [`MIRROR_TARGET`]. Both levels follow a single debug flag.

use crate::{Error, Result};
use std::sync::{Mutex, OnceLock, PoisonError};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

/// Target used by the working directory operations.
pub const TARGET: &str = "workdir";

/// Target used by the directory mirror behind sync.
pub const MIRROR_TARGET: &str = "workdir::mirror";

/// Verbosity applied to the two logging targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevels {
    pub workdir: LevelFilter,
    pub mirror: LevelFilter,
}

impl LogLevels {
    /// Levels used when the debug flag is off.
    pub const QUIET: Self = Self {
        workdir: LevelFilter::INFO,
        mirror: LevelFilter::ERROR,
    };

    /// Levels used when the debug flag is on.
    pub const VERBOSE: Self = Self {
        workdir: LevelFilter::DEBUG,
        mirror: LevelFilter::INFO,
    };

    pub fn for_debug(debug: bool) -> Self {
        if debug { Self::VERBOSE } else { Self::QUIET }
    }

    /// `EnvFilter` directives for these levels.
    pub fn directives(&self) -> String {
        format!(
            "{TARGET}={},{MIRROR_TARGET}={}",
            self.workdir, self.mirror
        )
    }
}

static CURRENT: Mutex<LogLevels> = Mutex::new(LogLevels::QUIET);
static RELOAD: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();
static BASE_DIRECTIVES: OnceLock<String> = OnceLock::new();

fn build_filter(levels: LogLevels) -> EnvFilter {
    // The debug flag owns the workdir targets; RUST_LOG still governs the rest.
    match BASE_DIRECTIVES.get() {
        Some(base) if !base.is_empty() => {
            EnvFilter::new(format!("{base},{}", levels.directives()))
        }
        _ => EnvFilter::new(levels.directives()),
    }
}

/// Initialize a tracing subscriber whose workdir levels can be changed at
/// runtime by [`set_log_level`].
///
/// Directives in `RUST_LOG` are kept for every other target. Only the first
/// successful call installs a subscriber; later calls return an error.
pub fn init() -> Result<()> {
    if let Ok(env) = std::env::var(EnvFilter::DEFAULT_ENV) {
        let _ = BASE_DIRECTIVES.set(env);
    }

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .compact();

    let (filter_layer, handle) = reload::Layer::new(build_filter(current_levels()));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::Logging {
            message: e.to_string(),
        })?;

    RELOAD.set(handle).map_err(|_| Error::Logging {
        message: "reload handle already installed".into(),
    })
}

/// Make logging respect the debug flag.
///
/// Idempotent. Returns the levels now in effect.
pub fn set_log_level(debug: bool) -> LogLevels {
    let levels = LogLevels::for_debug(debug);
    let previous = {
        let mut current = CURRENT.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, levels)
    };

    if previous != levels {
        if let Some(handle) = RELOAD.get() {
            if let Err(e) = handle.reload(build_filter(levels)) {
                tracing::warn!("Failed to apply log levels {:?}: {}", levels, e);
            }
        }
    }
    levels
}

/// The levels most recently applied by [`set_log_level`].
pub fn current_levels() -> LogLevels {
    *CURRENT.lock().unwrap_or_else(PoisonError::into_inner)
}
