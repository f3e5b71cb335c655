//! Integration tests for configuration layering and persistence.
//!
//! figment::Jail sandboxes the working directory and environment variables.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use enfermaria_config::{AppConfig, CONFIG_FILE_NAME};
use figment::Jail;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

#[test]
fn loads_values_from_toml_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            CONFIG_FILE_NAME,
            r#"
[database]
path = "dados/atendimentos.db"

[options]
path = "/srv/enfermaria/opcoes.json"

[logging]
profile = "development"
"#,
        )?;

        let config = AppConfig::load_from(jail.directory()).expect("config loads");

        assert_eq!(
            config.database.path,
            Some(PathBuf::from("dados/atendimentos.db"))
        );
        assert_eq!(
            config.options_path(),
            PathBuf::from("/srv/enfermaria/opcoes.json")
        );
        assert_eq!(config.logging.profile, "development");
        Ok(())
    });
}

#[test]
fn env_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            CONFIG_FILE_NAME,
            r#"
[database]
path = "from_file.db"
"#,
        )?;
        jail.set_env("ENFERMARIA_DATABASE__PATH", "from_env.db");
        jail.set_env("ENFERMARIA_LOGGING__PROFILE", "test");

        let config = AppConfig::load_from(jail.directory()).expect("config loads");

        assert_eq!(config.database.path, Some(PathBuf::from("from_env.db")));
        assert_eq!(config.logging.profile, "test");
        Ok(())
    });
}

#[test]
fn partial_file_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(CONFIG_FILE_NAME, "[logging]\nprofile = \"dev\"\n")?;

        let config = AppConfig::load_from(jail.directory()).expect("config loads");

        assert!(config.database.path.is_none());
        assert_eq!(config.options.path, PathBuf::from("opcoes.json"));
        Ok(())
    });
}

#[test]
fn malformed_file_is_an_error() {
    Jail::expect_with(|jail| {
        jail.create_file(CONFIG_FILE_NAME, "[database]\npath = [1, 2]\n")?;

        assert!(AppConfig::load_from(jail.directory()).is_err());
        Ok(())
    });
}

#[test]
fn saved_store_path_survives_reload() {
    Jail::expect_with(|jail| {
        // Given: A store file the operator picked
        jail.create_file("atendimentos.db", "")?;
        let store = jail.directory().join("atendimentos.db");
        let mut config = AppConfig::load_from(jail.directory()).expect("config loads");
        assert!(config.resolved_database_path().is_none());

        // When: The path is saved and the configuration reloaded
        config.save_database_path(&store).expect("path saved");
        let reloaded = AppConfig::load_from(jail.directory()).expect("config reloads");

        // Then: The store resolves and other keys keep their values
        assert_eq!(reloaded.resolved_database_path(), Some(store));
        assert_eq!(reloaded.logging, config.logging);
        assert!(jail.directory().join(CONFIG_FILE_NAME).is_file());
        Ok(())
    });
}

#[test]
fn configured_but_missing_store_is_not_resolved() {
    Jail::expect_with(|jail| {
        jail.set_env("ENFERMARIA_DATABASE__PATH", "sumiu.db");

        let config = AppConfig::load_from(jail.directory()).expect("config loads");

        assert!(config.database.path.is_some());
        assert!(config.resolved_database_path().is_none());
        Ok(())
    });
}
