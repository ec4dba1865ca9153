//! Settings loading from files and CLI configuration.

use edl_language_server::config::{Args, Config, Settings};
use std::path::PathBuf;

#[test]
fn test_load_missing_file_falls_back_to_defaults() {
    let settings = Settings::load(&PathBuf::from("/nonexistent/edl-ls/config.toml")).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_load_settings_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[linting]\nenabled = false\n\n[intellisense]\nenabled = true\n",
    )
    .expect("write settings file");

    let settings = Settings::load(&path).unwrap();
    assert!(!settings.linting_enabled);
    assert!(settings.intellisense_enabled);
}

#[test]
fn test_load_invalid_toml_is_an_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "linting = [not toml").expect("write settings file");

    assert!(Settings::load(&path).is_err());
}

#[test]
fn test_cli_settings_file_takes_precedence() {
    let config = Config::from_args(Args {
        settings_file: Some(PathBuf::from("/tmp/custom.toml")),
        log_level: "debug".to_string(),
    })
    .unwrap();

    assert_eq!(config.settings_path, Some(PathBuf::from("/tmp/custom.toml")));
    assert_eq!(config.log_level, "debug");
}

#[test]
fn test_default_log_level_is_info() {
    let config = Config::from_args(Args {
        settings_file: None,
        log_level: "info".to_string(),
    })
    .unwrap();
    assert_eq!(config.log_level, "info");
}
