//! Settings registry
//!
//! Holds the merged configuration root and one bound instance per settings
//! type. Hosts build it once at startup and hand it to whatever needs a
//! settings value.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::binder::manifest::Settings;
use crate::binder::{Binder, SkippedField};
use crate::error::{Error, Result};
use crate::source::{ConfigBuilder, ConfigNode};
use crate::sync::RwLockExt;

type Instance = Arc<dyn Any + Send + Sync>;

/// Registry of bound settings, keyed by type
///
/// # Example
/// ```rust
/// use confbind::{ConfigBuilder, SettingsRegistry};
/// use confbind::settings::AppConfigurationSettings;
///
/// let registry = SettingsRegistry::from_builder(
///     ConfigBuilder::new().add_json_str("base", r#"{"rabbit_mq": {"mq_address": "amqp://q"}}"#),
/// )?;
/// let settings = registry.register::<AppConfigurationSettings>()?;
/// assert_eq!(settings.rabbit_mq.mq_address, "amqp://q");
/// # Ok::<(), confbind::Error>(())
/// ```
pub struct SettingsRegistry {
    root: ConfigNode,
    binder: Binder,
    instances: RwLock<HashMap<TypeId, Instance>>,
    skipped: RwLock<Vec<SkippedField>>,
}

impl SettingsRegistry {
    pub fn new(root: ConfigNode) -> Self {
        Self {
            root,
            binder: Binder::new(),
            instances: RwLock::new(HashMap::new()),
            skipped: RwLock::new(Vec::new()),
        }
    }

    /// Build the configuration root and wrap it
    ///
    /// # Errors
    ///
    /// Propagates any layer failure from [`ConfigBuilder::build`].
    pub fn from_builder(builder: ConfigBuilder) -> Result<Self> {
        Ok(Self::new(builder.build()?))
    }

    /// Use a different binder for later registrations
    #[must_use]
    pub fn with_binder(mut self, binder: Binder) -> Self {
        self.binder = binder;
        self
    }

    /// Bind `T` from the root and publish it.
    ///
    /// Registering the same type again replaces the earlier instance.
    /// Fields that fail conversion keep their default and are logged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] if the manifest of `T` is malformed.
    pub fn register<T>(&self) -> Result<Arc<T>>
    where
        T: Settings + Send + Sync,
    {
        Binder::validate::<T>()?;

        let bound = self.binder.bind::<T>(&self.root);
        for skipped in bound.report.skipped() {
            log::warn!(
                "Setting {} of {} left at default: '{}' is not a valid {} ({})",
                skipped.path,
                type_name::<T>(),
                skipped.raw,
                skipped.target_type,
                skipped.reason
            );
        }

        let value = Arc::new(bound.value);
        self.skipped.write_recovered().extend(bound.report);
        self.instances
            .write_recovered()
            .insert(TypeId::of::<T>(), value.clone());

        log::debug!("Registered settings {}", type_name::<T>());
        Ok(value)
    }

    /// Publish an already built instance, e.g. the shared base of an
    /// application settings type.
    pub fn insert<T>(&self, value: Arc<T>)
    where
        T: Settings + Send + Sync,
    {
        self.instances.write_recovered().insert(TypeId::of::<T>(), value);
    }

    /// The registered instance of `T`, if any
    pub fn get<T>(&self) -> Option<Arc<T>>
    where
        T: Settings + Send + Sync,
    {
        let instance = self.instances.read_recovered().get(&TypeId::of::<T>())?.clone();
        instance.downcast::<T>().ok()
    }

    /// The registered instance of `T`
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRegistered`] if `T` was never registered.
    pub fn require<T>(&self) -> Result<Arc<T>>
    where
        T: Settings + Send + Sync,
    {
        self.get::<T>()
            .ok_or_else(|| Error::NotRegistered(type_name::<T>()))
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.instances.read_recovered().contains_key(&TypeId::of::<T>())
    }

    /// Raw merged configuration
    pub fn root(&self) -> &ConfigNode {
        &self.root
    }

    /// Every field skipped by registrations so far
    pub fn skipped(&self) -> Vec<SkippedField> {
        self.skipped.read_recovered().clone()
    }
}

impl std::fmt::Debug for SettingsRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsRegistry")
            .field("binder", &self.binder)
            .field("registered", &self.instances.read_recovered().len())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::manifest::Field;
    use crate::chat::{QwenSettings, DEFAULT_TIMEOUT};
    use crate::settings::{AppConfigurationSettings, DatabaseSettings};
    use serde_json::json;

    fn registry(value: serde_json::Value) -> SettingsRegistry {
        SettingsRegistry::new(ConfigNode::from_value(&value))
    }

    #[test]
    fn test_register_and_get() {
        let registry = registry(json!({"database_config": {"host": "db"}}));
        let registered = registry.register::<AppConfigurationSettings>().unwrap();

        let fetched = registry.get::<AppConfigurationSettings>().unwrap();
        assert!(Arc::ptr_eq(&registered, &fetched));
        assert_eq!(fetched.database.host, "db");
        assert!(registry.contains::<AppConfigurationSettings>());
    }

    #[test]
    fn test_insert_publishes_base() {
        let registry = registry(json!({"database_config": {"host": "db"}}));
        let app = registry.register::<AppConfigurationSettings>().unwrap();
        registry.insert(Arc::new(app.database.clone()));

        assert_eq!(registry.require::<DatabaseSettings>().unwrap().host, "db");
    }

    #[test]
    fn test_require_unregistered() {
        let registry = registry(json!({}));
        let err = registry.require::<DatabaseSettings>().unwrap_err();
        assert!(err.is_not_found());
        assert!(registry.get::<DatabaseSettings>().is_none());
    }

    #[test]
    fn test_register_replaces_previous() {
        let registry = registry(json!({"host": "h"}));
        let first = registry.register::<DatabaseSettings>().unwrap();
        let second = registry.register::<DatabaseSettings>().unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&second, &registry.require::<DatabaseSettings>().unwrap()));
    }

    #[test]
    fn test_skipped_fields_collected() {
        let registry = registry(json!({"timeout": "soon", "model": "qwen-max"}));
        let qwen = registry.register::<QwenSettings>().unwrap();

        assert_eq!(qwen.timeout, DEFAULT_TIMEOUT);
        assert_eq!(qwen.model, "qwen-max");
        let skipped = registry.skipped();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].path, "Timeout");
    }

    #[test]
    fn test_register_rejects_bad_manifest() {
        #[derive(Default)]
        struct Broken {
            a: String,
        }
        impl Settings for Broken {
            fn fields() -> Vec<Field<Self>> {
                vec![Field::leaf("", |s: &mut Self| &mut s.a)]
            }
        }

        let registry = registry(json!({}));
        assert!(matches!(
            registry.register::<Broken>(),
            Err(Error::Schema { .. })
        ));
        assert!(!registry.contains::<Broken>());
    }

    #[test]
    fn test_concurrent_reads() {
        let registry = Arc::new(registry(json!({"database_config": {"port": "5432"}})));
        registry.register::<AppConfigurationSettings>().unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry
                        .require::<AppConfigurationSettings>()
                        .unwrap()
                        .database
                        .port
                        .clone()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "5432");
        }
    }
}
