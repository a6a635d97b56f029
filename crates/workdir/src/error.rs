//! Error types for workdir

use std::path::PathBuf;

/// Result type for workdir operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in workdir operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A value assigned to the working directory path could not be resolved
    #[error("Invalid working directory path {input:?}: {reason}")]
    InvalidPath { input: String, reason: String },

    /// An operation needed the working directory path before it was set
    #[error("Working directory path is not configured")]
    NotConfigured,

    /// The directory context could not be entered
    #[error("Cannot enter {path}: {source}")]
    PathNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Sync failed at {path}: {source}")]
    Sync {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid exclusion pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to create working directory {path}: {source}")]
    PathCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to clean working directory {path}: {source}")]
    PathClean {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove working directory {path}: {source}")]
    PathRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Failed to serialize {format} config for {path}: {message}")]
    ConfigSerialize {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Logging setup failed: {message}")]
    Logging { message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn sync(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Sync {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_path(input: impl AsRef<std::path::Path>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            input: input.as_ref().to_string_lossy().into_owned(),
            reason: reason.into(),
        }
    }
}
