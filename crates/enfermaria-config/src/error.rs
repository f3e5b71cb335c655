//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// The running executable has no parent directory to hold the file.
    #[error("Cannot locate the executable directory: {reason}")]
    NoExecutableDir { reason: String },

    /// Writing the configuration file failed.
    #[error("Cannot write configuration file {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    /// The in-memory configuration could not be rendered as TOML.
    #[error("Cannot serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}
