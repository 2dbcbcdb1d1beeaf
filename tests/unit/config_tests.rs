// ==========================
// tests/unit/config_tests.rs
// ==========================
//! Unit tests for the configuration module
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

use gym_backend_lib::config::Settings;
use gym_backend_lib::error::AppError;
use tempfile::tempdir;

#[test]
fn test_settings_default() {
    let settings = Settings::default();

    assert_eq!(settings.bind_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
    assert_eq!(settings.data_dir, PathBuf::from("data"));
    assert_eq!(settings.log_level, "info");
    assert_eq!(settings.jwt.ttl_secs, 36_000);
    assert!(settings.jwt.secret.is_none());
    assert_eq!(settings.lockout.max_attempts, 3);
    assert_eq!(settings.lockout.duration_secs, 300);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_load_config_from_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let config_content = r#"
        bind_addr = "0.0.0.0:9000"
        data_dir = "test_data"

        [jwt]
        secret = "a-file-configured-secret-of-32-bytes!!"
        ttl_secs = 600

        [lockout]
        max_attempts = 5
    "#;
    fs::write(&config_path, config_content).unwrap();

    let settings = Settings::load_from(&config_path).unwrap();

    assert_eq!(settings.bind_addr, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
    assert_eq!(settings.data_dir, PathBuf::from("test_data"));
    assert_eq!(settings.jwt.ttl_secs, 600);
    assert_eq!(settings.lockout.max_attempts, 5);
    // unset keys keep their defaults
    assert_eq!(settings.lockout.duration_secs, 300);
    assert_eq!(settings.password.requirements.min_length, 10);
}

#[test]
fn test_missing_config_file_uses_defaults() {
    let temp_dir = tempdir().unwrap();
    let settings = Settings::load_from(temp_dir.path().join("absent.toml")).unwrap();
    assert_eq!(settings.lockout.max_attempts, 3);
}

#[test]
fn test_load_settings_from_environment() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[revocation]\nprune_interval_secs = 10\n").unwrap();

    // no other test reads the revocation section
    std::env::set_var("GYM_REVOCATION__PRUNE_INTERVAL_SECS", "42");
    let settings = Settings::load_from(&config_path);
    std::env::remove_var("GYM_REVOCATION__PRUNE_INTERVAL_SECS");

    assert_eq!(settings.unwrap().revocation.prune_interval_secs, 42);
}

#[test]
fn test_short_secret_is_rejected() {
    let mut settings = Settings::default();
    settings.jwt.secret = Some("too-short".to_string());
    assert!(matches!(settings.validate(), Err(AppError::Config(_))));
}

#[test]
fn test_invalid_values_are_rejected() {
    let mut settings = Settings::default();
    settings.lockout.max_attempts = 0;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.jwt.ttl_secs = 0;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.log_level = "loud".to_string();
    assert!(settings.validate().is_err());
}

#[test]
fn test_invalid_file_is_config_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[lockout]\nmax_attempts = \"three\"\n").unwrap();

    assert!(matches!(
        Settings::load_from(&config_path),
        Err(AppError::Config(_))
    ));
}
