//! Shared application settings
//!
//! The settings every host binds from its configuration root: message queue
//! access and the relational database connection. Keys are the snake_case
//! names used by the bundled defaults documents.

use crate::binder::manifest::{Field, Settings};

/// Settings shared by every application.
///
/// Applications embed this type with [`Field::flatten`] so its sections sit
/// next to their own ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfigurationSettings {
    pub rabbit_mq: RabbitMqSettings,
    pub database: DatabaseSettings,
}

impl Settings for AppConfigurationSettings {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::nested("RabbitMqSettings", |s: &mut Self| &mut s.rabbit_mq).key("rabbit_mq"),
            Field::nested("DatabaseSettings", |s: &mut Self| &mut s.database)
                .key("database_config"),
        ]
    }
}

/// Message queue access
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RabbitMqSettings {
    pub mq_address: String,
    pub user_name: String,
    pub user_pwd: String,
}

impl Settings for RabbitMqSettings {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::leaf("MqAddress", |s: &mut Self| &mut s.mq_address).key("mq_address"),
            Field::leaf("UserName", |s: &mut Self| &mut s.user_name).key("user_name"),
            Field::leaf("UserPwd", |s: &mut Self| &mut s.user_pwd).key("user_pwd"),
        ]
    }
}

/// Relational database connection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub host: String,
    /// Forwarded as is into the connection string
    pub port: String,
    pub database: String,
    pub user_name: String,
    pub pwd: String,
}

impl DatabaseSettings {
    /// Connection string in the `Key=Value;` layout expected by the ORM
    pub fn connection_string(&self) -> String {
        format!(
            "Host={};Port={};Database={};Username={};Password={}",
            self.host, self.port, self.database, self.user_name, self.pwd
        )
    }
}

impl Settings for DatabaseSettings {
    fn fields() -> Vec<Field<Self>> {
        vec![
            Field::leaf("Host", |s: &mut Self| &mut s.host).key("host"),
            Field::leaf("Port", |s: &mut Self| &mut s.port).key("port"),
            Field::leaf("Database", |s: &mut Self| &mut s.database).key("database"),
            Field::leaf("UserName", |s: &mut Self| &mut s.user_name).key("username"),
            Field::leaf("Pwd", |s: &mut Self| &mut s.pwd).key("pwd"),
        ]
    }
}

// =============================================================================
// Tests
// =============================================================================
