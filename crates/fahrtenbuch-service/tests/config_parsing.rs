use std::{env, fs};

use fahrtenbuch_db_memory::StorageBackend;
use fahrtenbuch_service::config::{AppConfig, loader::load_config};

#[test]
fn config_parsing_and_env_overrides_and_validation() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let path = dir.path().join("fahrtenbuch.toml");

    let toml_content = r#"
[logging]
level = "debug"

[storage]
backend = "memory"

[blob]
base_url = "https://files.example.de"

[access]
normalize_emails = false
default_admin_name = "Fuhrparkleitung"
max_trip_km = 1500.0
"#;
    fs::write(&path, toml_content).expect("write toml");

    // 1) Valid config parses
    let cfg = load_config(path.to_str()).expect("should parse config");
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(cfg.storage.backend, StorageBackend::Memory);
    assert_eq!(cfg.blob.base_url, "https://files.example.de");
    assert!(!cfg.access.normalize_emails);
    assert_eq!(cfg.access.default_admin_name, "Fuhrparkleitung");
    assert_eq!(cfg.access.max_trip_km, Some(1500.0));

    // 2) Env override should win over file
    unsafe {
        env::set_var("FAHRTENBUCH__ACCESS__DEFAULT_ADMIN_NAME", "Chef");
    }
    let cfg_env = load_config(path.to_str()).expect("should parse config with env overrides");
    assert_eq!(cfg_env.access.default_admin_name, "Chef");
    unsafe {
        env::remove_var("FAHRTENBUCH__ACCESS__DEFAULT_ADMIN_NAME");
    }

    // 3) Invalid config should error
    let invalid_path = dir.path().join("invalid.toml");
    let invalid_toml = r#"
[access]
max_trip_km = -5.0
"#;
    fs::write(&invalid_path, invalid_toml).expect("write invalid toml");
    let err = load_config(invalid_path.to_str()).expect_err("expected validation error");
    assert!(err.contains("max_trip_km"));

    // 4) Unknown log level is rejected
    let noisy_path = dir.path().join("noisy.toml");
    fs::write(&noisy_path, "[logging]\nlevel = \"chatty\"\n").expect("write toml");
    let err = load_config(noisy_path.to_str()).expect_err("expected validation error");
    assert!(err.contains("logging.level"));
}

#[test]
fn default_config_round_trips_through_toml() {
    let rendered = toml::to_string(&AppConfig::default()).expect("serialize");
    let parsed: AppConfig = toml::from_str(&rendered).expect("parse");
    assert!(parsed.validate().is_ok());
    assert_eq!(parsed.blob.base_url, "memory://blobs");
}
