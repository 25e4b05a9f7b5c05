use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub list: ListConfig,
    pub font: FontConfig,
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListConfig {
    /// Indentation added per nesting level, in device-independent units.
    /// Clamped to at least 1 when rendering; negative marker widths are
    /// clamped to 0.
    pub base_indent: i32,
    pub bullet: String,
    pub ordered_marker_width: i32,
    pub unordered_marker_width: i32,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            base_indent: 20,
            bullet: "•".to_string(),
            ordered_marker_width: 40,
            unordered_marker_width: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FontConfig {
    pub path: Option<PathBuf>,
    pub size: f32,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            size: 16.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PreviewConfig {
    pub width: usize,
    pub units_per_column: i32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            width: 60,
            units_per_column: 10,
        }
    }
}

impl Config {
    /// The defaults bundled into the binary from `default_config.toml`.
    pub fn compiled_default() -> Self {
        // build.rs rejects a malformed default file, so this only falls back
        // if the file and the Default impls disagree on types.
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config not found, using defaults");
                return Ok(Self::compiled_default());
            }
            Err(source) => {
                return Err(Error::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
