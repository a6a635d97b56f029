//! Loading and saving [`Options`] from configuration files

use crate::options::OptionsFile;
use crate::{Error, Options, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    /// Detect the format from a file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// Reads and writes working directory options.
#[derive(Debug, Default)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load options from a file.
    ///
    /// Relative `path` and `sync_sourcedir` values are resolved against the
    /// directory containing the file.
    pub fn load(&self, path: &Path) -> Result<Options> {
        let format = Format::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let parse_err = |message: String| Error::ConfigParse {
            path: path.to_path_buf(),
            format: format.name().into(),
            message,
        };

        let file: OptionsFile = match format {
            Format::Toml => toml::from_str(&content).map_err(|e| parse_err(e.to_string()))?,
            Format::Json => {
                serde_json::from_str(&content).map_err(|e| parse_err(e.to_string()))?
            }
            Format::Yaml => {
                serde_yaml::from_str(&content).map_err(|e| parse_err(e.to_string()))?
            }
        };

        let base = crate::path::absolutize(path)?
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let options = file.resolve(Some(&base))?;

        tracing::debug!(path = %path.display(), "Loaded working directory options");
        Ok(options)
    }

    /// Save options to a file, replacing it atomically.
    pub fn save(&self, path: &Path, options: &Options) -> Result<()> {
        let format = Format::from_path(path)?;
        let serialize_err = |message: String| Error::ConfigSerialize {
            path: path.to_path_buf(),
            format: format.name().into(),
            message,
        };

        let content = match format {
            Format::Toml => {
                toml::to_string_pretty(options).map_err(|e| serialize_err(e.to_string()))?
            }
            Format::Json => serde_json::to_string_pretty(options)
                .map_err(|e| serialize_err(e.to_string()))?,
            Format::Yaml => {
                serde_yaml::to_string(options).map_err(|e| serialize_err(e.to_string()))?
            }
        };

        write_atomic(path, content.as_bytes())
    }
}

/// Write to a temporary sibling file, then rename over `path`.
fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file
        .write_all(content)
        .and_then(|()| temp_file.sync_all())
        .map_err(|e| Error::io(&temp_path, e))?;
    drop(temp_file);

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::io(path, e)
    })
}
