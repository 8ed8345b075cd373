//! SDK configuration file round trips.

use kinetic_sdk::sdk::config::{load_config_from, save_config_to};
use kinetic_sdk::sdk::{ConfigError, SdkConfig};
use tempfile::TempDir;

#[test]
fn test_missing_file_gives_defaults() {
    let dir = TempDir::new().unwrap();
    let config = load_config_from(&dir.path().join("kinetic.toml")).unwrap();
    assert_eq!(config, SdkConfig::default());
}

#[test]
fn test_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("kinetic.toml");

    let mut config = SdkConfig::default();
    config.api_key = Some("3f2a-demo-key".to_string());
    config.logging.filter = "kinetic_sdk=debug".to_string();
    config.usb.max_pending_bytes = 128;

    save_config_to(&path, &config).unwrap();
    let loaded = load_config_from(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kinetic.toml");
    std::fs::write(&path, "api_key = [").unwrap();

    assert!(matches!(
        load_config_from(&path),
        Err(ConfigError::ParseError(_))
    ));
}
