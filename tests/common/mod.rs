//! Common test utilities for confbind integration tests
//!
//! Provides shared documents, settings types, and helper functions.

#![allow(dead_code)]

use confbind::settings::AppConfigurationSettings;
use confbind::{Field, MapEnvSource, Settings};
use std::path::{Path, PathBuf};
use std::sync::Arc;

// =============================================================================
// Documents
// =============================================================================

/// Bundled defaults, snake_case keys
pub const BASE_JSON: &str = r#"{
    "rabbit_mq": {
        "mq_address": "amqp://localhost:5672",
        "user_name": "guest",
        "user_pwd": "guest"
    },
    "database_config": {
        "host": "localhost",
        "port": 5432,
        "database": "victor",
        "username": "postgres",
        "pwd": "postgres"
    },
    "database": {
        "database_name": "victor_base"
    }
}"#;

/// Development override, keys spelled with different casing
pub const DEVELOPMENT_JSON: &str = r#"{
    "Database_Config": {
        "Host": "dev-db.internal",
        "Port": "6432"
    },
    "Database": {
        "Database_Name": "victor_dev"
    }
}"#;

// =============================================================================
// Test Settings
// =============================================================================

/// Settings of the web host: the shared settings plus its own database entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppSettings {
    pub base: AppConfigurationSettings,
    pub database_setting: DatabaseSetting,
}

impl Settings for AppSettings {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::flatten("AppConfigurationSettings", |s: &mut Self| &mut s.base),
            Field::nested("DatabaseSetting", |s: &mut Self| &mut s.database_setting)
                .key("database"),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseSetting {
    pub name: String,
}

impl Settings for DatabaseSetting {
    fn fields() -> Vec<Field<Self>> {
        vec![Field::leaf("Name", |s: &mut Self| &mut s.name).key("database_name")]
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Write `content` to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write test document");
    path
}

/// Environment source holding exactly `vars`
pub fn env(vars: &[(&str, &str)]) -> Arc<MapEnvSource> {
    Arc::new(
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}
