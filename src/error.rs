use std::path::PathBuf;

use thiserror::Error;

/// Errors raised at the crate's I/O boundaries.
///
/// Rendering itself never fails; these only come from reading input,
/// configuration and fonts, or from serializing output.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse font {}", path.display())]
    Font {
        path: PathBuf,
        #[source]
        source: ttf_parser::FaceParsingError,
    },

    #[error("failed to serialize rendered text")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
