//! TOML Storage Integration Tests
//!
//! Tests for TOML documents layered with JSON ones:
//! - Reading TOML files by extension
//! - Native TOML scalars (integers, booleans, datetimes)
//! - Precedence against bundled JSON defaults

#![cfg(feature = "toml")]

mod common;

use common::{env, write_file, AppSettings, BASE_JSON};
use confbind::chat::AiSupporterSettings;
use confbind::{ConfigBuilder, Error, Format, StorageBackend, TomlStorage};
use std::time::Duration;
use tempfile::TempDir;

const SETTINGS_TOML: &str = r#"
[database_config]
host = "toml-db"
port = 7000

[qwen]
base_uri = "https://dashscope.example.com/"
chat_url = "compatible-mode/v1/chat/completions"
timeout = "00:02:00"
"#;

// =============================================================================
// Basic TOML Documents
// =============================================================================

#[test]
fn test_toml_file_binds() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(temp_dir.path(), "appsettings.toml", SETTINGS_TOML);

    let root = ConfigBuilder::new()
        .with_env_source(env(&[]))
        .add_file(&path, false)
        .build()
        .unwrap();

    let settings: AiSupporterSettings = confbind::bind(&root);
    assert_eq!(settings.app.database.host, "toml-db");
    assert_eq!(settings.app.database.port, "7000");
    assert_eq!(settings.qwen.timeout, Duration::from_secs(120));
}

#[test]
fn test_toml_overrides_bundled_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_file(temp_dir.path(), "override.toml", SETTINGS_TOML);

    let root = ConfigBuilder::new()
        .with_env_source(env(&[]))
        .add_json_str("appsettings.base.json", BASE_JSON)
        .add_file(&path, true)
        .build()
        .unwrap();

    let settings: AppSettings = confbind::bind(&root);
    assert_eq!(settings.base.database.host, "toml-db");
    // Keys absent from the TOML document keep the bundled value
    assert_eq!(settings.base.database.database, "victor");
    assert_eq!(settings.database_setting.name, "victor_base");
}

// =============================================================================
// Edge Cases
// =============================================================================

#[test]
fn test_toml_native_scalars_become_strings() {
    let value = TomlStorage
        .parse(
            "inline.toml",
            "enabled = true\nratio = 0.5\nstarted = 2024-05-01T08:00:00Z\n",
        )
        .unwrap();

    let root = confbind::ConfigNode::from_value(&value);
    assert_eq!(root.get("enabled"), Some("true"));
    assert_eq!(root.get("ratio"), Some("0.5"));
    assert_eq!(root.get("started"), Some("2024-05-01T08:00:00Z"));
}

#[test]
fn test_toml_parse_error() {
    let err = ConfigBuilder::new()
        .add_str("broken.toml", Format::Toml, "[database_config\nhost = 1")
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::Parse { .. }));
}
