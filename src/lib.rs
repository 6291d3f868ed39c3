//! # confbind - convention-driven configuration binding
//!
//! Binds a hierarchical configuration view (bundled defaults, environment
//! override documents, environment variables) onto strongly typed settings,
//! tolerating the usual drift in key spelling between documents.
//!
//! ## Features
//!
//! - **Flexible names**: a field declared as `MqAddress` matches `MqAddress`,
//!   `mqAddress`, `mq_address`, `mq-address` or `mq.address`
//! - **Explicit keys**: `.key("database_config")` pins a field to one key
//! - **Best effort**: unconvertible values keep their default and are reported
//! - **Layered sources**: JSON, TOML and YAML documents plus prefixed env vars
//! - **Registry**: one bound `Arc<T>` per settings type for the whole process
//! - **Secrets**: API keys resolved through a pluggable `SecretProvider`
//!
//! ## Quick Start
//!
//! ```rust
//! use confbind::{ConfigBuilder, Field, Settings, SettingsRegistry};
//!
//! #[derive(Debug, Default)]
//! struct QueueSettings {
//!     mq_address: String,
//!     prefetch: u16,
//! }
//!
//! impl Settings for QueueSettings {
//!     fn fields() -> Vec<Field<Self>> {
//!         vec![
//!             Field::leaf("MqAddress", |s: &mut Self| &mut s.mq_address),
//!             Field::leaf("Prefetch", |s: &mut Self| &mut s.prefetch),
//!         ]
//!     }
//! }
//!
//! let registry = SettingsRegistry::from_builder(
//!     ConfigBuilder::new().add_json_str("base", r#"{"mq-address": "amqp://q", "Prefetch": 8}"#),
//! )?;
//! let queue = registry.register::<QueueSettings>()?;
//! assert_eq!(queue.mq_address, "amqp://q");
//! assert_eq!(queue.prefetch, 8);
//! # Ok::<(), confbind::Error>(())
//! ```
//!
//! ## Missing and Invalid Values
//!
//! A key that is absent leaves the field at its `Default` value. A value that
//! cannot be converted does the same, and is recorded in the [`BindReport`]:
//!
//! ```rust
//! use confbind::{Binder, ConfigNode};
//! use confbind::chat::{QwenSettings, DEFAULT_TIMEOUT};
//!
//! let root = ConfigNode::from_value(&serde_json::json!({"timeout": "soon"}));
//! let bound = Binder::new().bind::<QwenSettings>(&root);
//! assert_eq!(bound.value.timeout, DEFAULT_TIMEOUT);
//! assert!(bound.report.contains("Timeout"));
//! assert!(bound.into_strict().is_err());
//! ```

pub mod binder;
pub mod chat;
pub mod credentials;
mod error;
pub mod registry;
pub mod settings;
pub mod source;
pub mod storage;
mod sync;

// Re-exports from core
pub use binder::convert::{ConvertError, FromConfigValue};
pub use binder::manifest::{validate_manifest, Field, FieldKind, Settings};
pub use binder::{naming, BindContext, BindReport, Binder, Bound, SkippedField};
pub use error::{Error, Result};
pub use registry::SettingsRegistry;
pub use source::{ConfigBuilder, ConfigNode, DefaultEnvSource, EnvSource, MapEnvSource};
pub use storage::{Format, JsonStorage, StorageBackend};

#[cfg(feature = "toml")]
pub use storage::TomlStorage;
#[cfg(feature = "yaml")]
pub use storage::YamlStorage;

// Credential re-exports
pub use credentials::{EnvSecretProvider, MemorySecretProvider, SecretProvider};

/// Bind `T` from `node` with the default binder, ignoring skipped fields.
///
/// Shorthand for `Binder::new().bind::<T>(node).into_value()`.
pub fn bind<T: Settings>(node: &ConfigNode) -> T {
    Binder::new().bind::<T>(node).into_value()
}

// Derive macro re-export (requires `derive` feature)
/// Derive macro generating a [`Settings`] manifest from struct fields.
///
/// # Example
///
/// ```rust,ignore
/// use confbind::DeriveSettings;
///
/// #[derive(Default, DeriveSettings)]
/// struct DatabaseSetting {
///     #[setting(key = "database_name")]
///     name: String,
///     #[setting(skip)]
///     cached: Option<String>,
/// }
/// ```
#[cfg(feature = "derive")]
pub use confbind_derive::Settings as DeriveSettings;
