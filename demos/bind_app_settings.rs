// Startup binding example for confbind
//
// Run with: cargo run --example bind_app_settings
//
// Set RUST_LOG=debug to see which layers were merged and which keys matched.
// Override any value with VICTOR_{SECTION}__{KEY}, e.g.
// VICTOR_DATABASE_CONFIG__HOST=db.internal

use confbind::settings::{AppConfigurationSettings, DatabaseSettings};
use confbind::{ConfigBuilder, Field, Settings, SettingsRegistry};
use std::sync::Arc;

const BASE_JSON: &str = r#"{
    "rabbit_mq": {"mq_address": "amqp://localhost:5672", "user_name": "guest", "user_pwd": "guest"},
    "database_config": {"host": "localhost", "port": 5432, "database": "victor", "username": "postgres", "pwd": "postgres"},
    "database": {"database_name": "victor"}
}"#;

/// Settings of the web host
#[derive(Debug, Clone, Default)]
struct AppSettings {
    base: AppConfigurationSettings,
    database_setting: DatabaseSetting,
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

#[derive(Debug, Clone, Default)]
struct DatabaseSetting {
    name: String,
}

impl Settings for DatabaseSetting {
    fn fields() -> Vec<Field<Self>> {
        vec![Field::leaf("Name", |s: &mut Self| &mut s.name).key("database_name")]
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "Development".into());

    let registry = SettingsRegistry::from_builder(
        ConfigBuilder::new()
            .add_json_str("appsettings.base.json", BASE_JSON)
            .with_environment(".", &environment)
            .add_env_prefixed("VICTOR"),
    )?;

    let settings = registry.register::<AppSettings>()?;
    registry.insert(Arc::new(settings.base.clone()));
    registry.insert(Arc::new(settings.base.database.clone()));

    println!("Environment: {environment}");
    println!("Message queue: {}", settings.base.rabbit_mq.mq_address);
    println!("Database name: {}", settings.database_setting.name);

    let database = registry.require::<DatabaseSettings>()?;
    println!("Connection string: {}", database.connection_string());

    for skipped in registry.skipped() {
        println!(
            "Skipped {}: '{}' is not a valid {}",
            skipped.path, skipped.raw, skipped.target_type
        );
    }

    Ok(())
}
