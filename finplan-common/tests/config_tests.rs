//! Unit tests for configuration and graceful degradation
//!
//! Tests cover:
//! - Missing TOML files fall back to compiled defaults
//! - Partial TOML files fill the rest from defaults
//! - Root folder priority: CLI → environment → TOML → OS default
//! - Analysis API key precedence
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.

use finplan_common::config::{
    database_path, default_root_folder, RootFolderResolver, TomlConfig, ANALYSIS_API_KEY_ENV,
    DATABASE_FILE_NAME, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_compiled_defaults() {
    let config = TomlConfig::default();

    assert_eq!(config.port, 5780);
    assert_eq!(config.logging.level, "info");
    assert!(config.root_folder.is_none());
    assert!(config.database_path.is_none());
    assert_eq!(config.analysis.timeout_secs, 60);
    assert_eq!(config.analysis.requests_per_minute, 5);
    assert!(config.analysis.api_key.is_none());
}

#[test]
fn test_partial_toml_fills_defaults() {
    let config = TomlConfig::from_toml_str(
        r#"
        port = 9000

        [analysis]
        endpoint = "https://llm.example.com/analyze"
        "#,
    )
    .unwrap();

    assert_eq!(config.port, 9000);
    assert_eq!(config.analysis.endpoint, "https://llm.example.com/analyze");
    assert_eq!(config.analysis.timeout_secs, 60);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_invalid_toml_is_config_error() {
    let result = TomlConfig::from_toml_str("port = \"not a number\"");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Configuration error"));
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("does-not-exist.toml");

    let config = TomlConfig::load_or_default(Some(&missing)).unwrap();
    assert_eq!(config.port, TomlConfig::default().port);
}

#[test]
fn test_existing_config_file_is_loaded() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
        root_folder = "/srv/finplan"

        [logging]
        level = "debug"
        "#,
    )
    .unwrap();

    let config = TomlConfig::load_or_default(Some(&path)).unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/finplan")));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_database_path_defaults_into_root_folder() {
    let root = PathBuf::from("/tmp/finplan-root");
    let config = TomlConfig::default();
    assert_eq!(database_path(&config, &root), root.join(DATABASE_FILE_NAME));

    let explicit = TomlConfig {
        database_path: Some(PathBuf::from("/data/plans.db")),
        ..TomlConfig::default()
    };
    assert_eq!(database_path(&explicit, &root), PathBuf::from("/data/plans.db"));
}

#[test]
#[serial]
fn test_resolver_cli_takes_precedence() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/finplan-env");

    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/finplan-toml")),
        ..TomlConfig::default()
    };
    let resolver = RootFolderResolver::new(Some(PathBuf::from("/tmp/finplan-cli")), &config);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/finplan-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_env_over_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/finplan-env");

    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/finplan-toml")),
        ..TomlConfig::default()
    };
    let resolver = RootFolderResolver::new(None, &config);
    assert_eq!(resolver.resolve(), PathBuf::from("/tmp/finplan-env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_toml_then_default() {
    env::remove_var(ROOT_FOLDER_ENV);

    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/finplan-toml")),
        ..TomlConfig::default()
    };
    assert_eq!(
        RootFolderResolver::new(None, &config).resolve(),
        PathBuf::from("/tmp/finplan-toml")
    );

    let resolver = RootFolderResolver::new(None, &TomlConfig::default());
    assert_eq!(resolver.resolve(), default_root_folder());
}

#[test]
#[serial]
fn test_api_key_env_overrides_toml() {
    let config = TomlConfig::from_toml_str(
        r#"
        [analysis]
        api_key = "from-toml"
        "#,
    )
    .unwrap();

    env::remove_var(ANALYSIS_API_KEY_ENV);
    assert_eq!(config.analysis_api_key(), Some("from-toml".to_string()));

    env::set_var(ANALYSIS_API_KEY_ENV, "from-env");
    assert_eq!(config.analysis_api_key(), Some("from-env".to_string()));

    env::set_var(ANALYSIS_API_KEY_ENV, "");
    assert_eq!(config.analysis_api_key(), Some("from-toml".to_string()));

    env::remove_var(ANALYSIS_API_KEY_ENV);
}
