//! Integration tests for confbind-derive macro
//!
//! Tests the `#[derive(DeriveSettings)]` macro with various attribute combinations.

use confbind::settings::AppConfigurationSettings;
use confbind::{Binder, ConfigNode, DeriveSettings, Field, FieldKind, Settings};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

fn node(value: serde_json::Value) -> ConfigNode {
    ConfigNode::from_value(&value)
}

// =============================================================================
// Basic Derive Tests
// =============================================================================

#[derive(Debug, Default, PartialEq, DeriveSettings)]
struct QueueSettings {
    mq_address: String,
    prefetch: u16,
    timeout: Duration,
    tag: Option<String>,
}

#[test]
fn test_declared_names_are_pascal_case() {
    let names: Vec<&str> = QueueSettings::fields().iter().map(|f| f.declared()).collect();
    assert_eq!(names, vec!["MqAddress", "Prefetch", "Timeout", "Tag"]);
}

#[test]
fn test_basic_derive_binds() {
    let settings = Binder::new()
        .bind::<QueueSettings>(&node(json!({
            "mq-address": "amqp://q",
            "Prefetch": 16,
            "timeout": "00:01:30",
            "tag": "blue"
        })))
        .into_strict()
        .unwrap();

    assert_eq!(settings.mq_address, "amqp://q");
    assert_eq!(settings.prefetch, 16);
    assert_eq!(settings.timeout, Duration::from_secs(90));
    assert_eq!(settings.tag.as_deref(), Some("blue"));
}

// =============================================================================
// Attribute Tests
// =============================================================================

#[derive(Debug, Default, PartialEq, DeriveSettings)]
struct DatabaseSetting {
    #[setting(key = "database_name")]
    name: String,

    #[setting(skip)]
    cached: String,
}

#[derive(Debug, Default, PartialEq, DeriveSettings)]
struct AppSettings {
    #[setting(flatten)]
    base: AppConfigurationSettings,

    #[setting(key = "database")]
    database_setting: DatabaseSetting,
}

#[test]
fn test_explicit_key_and_skip() {
    let fields = DatabaseSetting::fields();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].explicit_key(), Some("database_name"));
}

#[test]
fn test_nested_and_flatten_inferred() {
    let fields = AppSettings::fields();
    assert!(matches!(fields[0].kind(), FieldKind::Flatten { .. }));
    assert!(matches!(fields[1].kind(), FieldKind::Nested { .. }));
}

#[test]
fn test_flattened_base_binds_from_same_section() {
    let settings: AppSettings = confbind::bind(&node(json!({
        "rabbit_mq": {"mq_address": "amqp://base"},
        "database_config": {"host": "db"},
        "database": {"database_name": "victor", "cached": "ignored"}
    })));

    assert_eq!(settings.base.rabbit_mq.mq_address, "amqp://base");
    assert_eq!(settings.base.database.host, "db");
    assert_eq!(settings.database_setting.name, "victor");
    assert_eq!(settings.database_setting.cached, "");
}

#[derive(Debug, Default, Deserialize, DeriveSettings)]
struct RenamedSettings {
    #[serde(rename = "base_uri")]
    base: String,

    #[setting(name = "ChatPath", key = "chat_url")]
    #[serde(rename = "ignored")]
    chat: String,
}

#[test]
fn test_serde_rename_used_as_key() {
    let fields = RenamedSettings::fields();
    assert_eq!(fields[0].explicit_key(), Some("base_uri"));
    assert_eq!(fields[1].declared(), "ChatPath");
    assert_eq!(fields[1].explicit_key(), Some("chat_url"));
}

// =============================================================================
// Equivalence With Hand-Written Manifests
// =============================================================================

#[derive(Debug, Default, PartialEq)]
struct HandWritten {
    mq_address: String,
    prefetch: u16,
    timeout: Duration,
    tag: Option<String>,
}

impl Settings for HandWritten {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::leaf("MqAddress", |s: &mut Self| &mut s.mq_address),
            Field::leaf("Prefetch", |s: &mut Self| &mut s.prefetch),
            Field::leaf("Timeout", |s: &mut Self| &mut s.timeout),
            Field::leaf("Tag", |s: &mut Self| &mut s.tag),
        ]
    }
}

#[test]
fn test_derived_matches_hand_written() {
    let source = node(json!({
        "MQ_ADDRESS": "amqp://same",
        "prefetch": "not-a-number",
        "timeout": "1"
    }));

    let derived = Binder::new().bind::<QueueSettings>(&source);
    let manual = Binder::new().bind::<HandWritten>(&source);

    assert_eq!(derived.value.mq_address, manual.value.mq_address);
    assert_eq!(derived.value.prefetch, manual.value.prefetch);
    assert_eq!(derived.value.timeout, manual.value.timeout);
    assert_eq!(derived.value.timeout, Duration::from_secs(86_400));
    assert_eq!(derived.value.tag, manual.value.tag);
    assert_eq!(derived.report, manual.report);
}

#[test]
fn test_derived_manifest_validates() {
    assert!(Binder::validate::<AppSettings>().is_ok());
    assert!(Binder::validate::<RenamedSettings>().is_ok());
}
