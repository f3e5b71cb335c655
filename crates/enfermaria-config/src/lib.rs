//! # enfermaria-config
//!
//! Layered configuration for the visit recorder using figment.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`ENFERMARIA_*` prefix, `__` as separator)
//! 2. `enfermaria.toml` in the configuration directory (the executable's
//!    directory unless overridden)
//! 3. Built-in defaults
//!
//! `ENFERMARIA_DATABASE__PATH` maps to `database.path`, and so on.
//!
//! Relative paths in the file are resolved against the configuration
//! directory, so the file travels with the executable.

mod error;

pub use error::ConfigError;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the configuration directory
pub const CONFIG_FILE_NAME: &str = "enfermaria.toml";

/// Default option-sets document, next to the configuration file
pub const DEFAULT_OPTIONS_FILE: &str = "opcoes.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Store file; unset until the operator picks one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OptionsConfig {
    #[serde(default = "default_options_path")]
    pub path: PathBuf,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            path: default_options_path(),
        }
    }
}

fn default_options_path() -> PathBuf {
    PathBuf::from(DEFAULT_OPTIONS_FILE)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `development`, `production` or `test`
    #[serde(default = "default_profile")]
    pub profile: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
        }
    }
}

fn default_profile() -> String {
    "production".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub options: OptionsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Directory the file was read from; never written back
    #[serde(skip)]
    dir: PathBuf,
}

impl AppConfig {
    /// Load from the executable's directory.
    ///
    /// # Errors
    ///
    /// `NoExecutableDir` if the executable path cannot be resolved,
    /// `Figment` if a layer holds a malformed value.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::executable_dir()?)
    }

    /// Load with `dir` as the configuration directory.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// `Figment` if the file or an environment variable holds a malformed value.
    pub fn load_from(dir: &Path) -> Result<Self, ConfigError> {
        let mut config: AppConfig = Self::figment(dir).extract()?;
        config.dir = dir.to_path_buf();
        tracing::debug!(dir = %dir.display(), "Configuration loaded");
        Ok(config)
    }

    /// Build the provider chain for `dir`.
    pub fn figment(dir: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let file = dir.join(CONFIG_FILE_NAME);
        if file.exists() {
            figment = figment.merge(Toml::file(file));
        }

        figment.merge(Env::prefixed("ENFERMARIA_").split("__"))
    }

    fn executable_dir() -> Result<PathBuf, ConfigError> {
        let exe = std::env::current_exe().map_err(|e| ConfigError::NoExecutableDir {
            reason: e.to_string(),
        })?;
        exe.parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| ConfigError::NoExecutableDir {
                reason: format!("{} has no parent", exe.display()),
            })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        }
    }

    /// The configured store file, only if it exists on disk.
    ///
    /// `None` means the caller has to ask the operator for a path and
    /// persist it with [`AppConfig::save_database_path`].
    pub fn resolved_database_path(&self) -> Option<PathBuf> {
        let path = self.resolve(self.database.path.as_deref()?);
        if path.is_file() {
            Some(path)
        } else {
            tracing::warn!(path = %path.display(), "Configured store file not found");
            None
        }
    }

    /// The option-sets document path, resolved against the directory.
    pub fn options_path(&self) -> PathBuf {
        self.resolve(&self.options.path)
    }

    /// Remember `path` as the store file and rewrite the configuration file.
    ///
    /// # Errors
    ///
    /// `Serialize` or `Write` if the file cannot be rendered or written; the
    /// in-memory value is updated regardless.
    pub fn save_database_path(&mut self, path: &Path) -> Result<(), ConfigError> {
        self.database.path = Some(path.to_path_buf());
        self.save()
    }

    /// Rewrite the configuration file wholesale.
    ///
    /// # Errors
    ///
    /// `Serialize` or `Write` on failure.
    pub fn save(&self) -> Result<(), ConfigError> {
        let file = self.file_path();
        let rendered = toml::to_string_pretty(self)?;
        std::fs::write(&file, rendered).map_err(|e| ConfigError::Write {
            path: file.clone(),
            reason: e.to_string(),
        })?;
        tracing::info!(path = %file.display(), "Configuration saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_store() {
        let config = AppConfig::default();
        assert!(config.database.path.is_none());
        assert_eq!(config.options.path, PathBuf::from(DEFAULT_OPTIONS_FILE));
        assert_eq!(config.logging.profile, "production");
    }

    #[test]
    fn relative_paths_resolve_against_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig::load_from(dir.path()).unwrap();
        assert_eq!(config.options_path(), dir.path().join(DEFAULT_OPTIONS_FILE));
    }

    #[test]
    fn unset_store_path_is_not_resolved() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig::load_from(dir.path()).unwrap();
        assert!(config.resolved_database_path().is_none());
    }
}
