//! Configuration loading tests
//!
//! Tests that touch PMDASH_CONFIG are marked #[serial] so they never race.

use pmdash_common::config::{TomlConfig, CONFIG_ENV_VAR};
use serial_test::serial;
use std::env;
use tempfile::TempDir;

#[test]
#[serial]
fn test_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.toml");

    let config = TomlConfig::load_or_default(Some(&missing)).unwrap();

    assert_eq!(config.port, 8000);
    assert_eq!(config.classifier.timeout_ms, 30_000);
}

#[test]
#[serial]
fn test_explicit_path_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
database_path = "/var/lib/pmdash/test.db"
port = 9001
cors_origins = ["http://dashboard.test"]

[logging]
level = "debug"

[classifier]
endpoint = "http://classifier.test/v1/kpi"
timeout_ms = 2500
"#,
    )
    .unwrap();

    let config = TomlConfig::load_or_default(Some(&path)).unwrap();

    assert_eq!(config.port, 9001);
    assert_eq!(config.cors_origins, vec!["http://dashboard.test".to_string()]);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.classifier.endpoint, "http://classifier.test/v1/kpi");
    assert_eq!(config.classifier.effective_max_wait_ms(), 2500);
    assert_eq!(
        config.resolved_database_path(),
        std::path::PathBuf::from("/var/lib/pmdash/test.db")
    );
}

#[test]
#[serial]
fn test_env_var_selects_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("from-env.toml");
    std::fs::write(&path, "port = 7777\n").unwrap();

    env::set_var(CONFIG_ENV_VAR, &path);
    let config = TomlConfig::load_or_default(None);
    env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(config.unwrap().port, 7777);
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "port = \"not a number\"\n").unwrap();

    assert!(TomlConfig::load_or_default(Some(&path)).is_err());
}
