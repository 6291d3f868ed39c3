//! In-memory secret provider for testing

use super::SecretProvider;
use crate::sync::RwLockExt;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory secret storage (not persisted)
pub struct MemorySecretProvider {
    store: RwLock<HashMap<String, String>>,
}

impl MemorySecretProvider {
    /// Create an empty provider
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    /// Create a provider holding a single secret
    pub fn with_secret(name: impl Into<String>, value: impl Into<String>) -> Self {
        let provider = Self::new();
        provider.store(name, value);
        provider
    }

    /// Store or replace a secret
    pub fn store(&self, name: impl Into<String>, value: impl Into<String>) {
        self.store.write_recovered().insert(name.into(), value.into());
    }

    /// Remove a secret
    pub fn remove(&self, name: &str) {
        self.store.write_recovered().remove(name);
    }

    /// All stored secret names
    pub fn list_names(&self) -> Vec<String> {
        self.store.read_recovered().keys().cloned().collect()
    }
}

impl Default for MemorySecretProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretProvider for MemorySecretProvider {
    fn get(&self, name: &str) -> Option<String> {
        self.store.read_recovered().get(name).cloned()
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_and_get() {
        let provider = MemorySecretProvider::new();

        provider.store("key1", "value1");
        provider.store("key2", "value2");

        assert_eq!(provider.get("key1"), Some("value1".to_string()));
        assert_eq!(provider.get("key2"), Some("value2".to_string()));
        assert_eq!(provider.get("key3"), None);
    }

    #[test]
    fn test_memory_remove() {
        let provider = MemorySecretProvider::with_secret("key", "value");
        assert!(provider.exists("key"));

        provider.remove("key");
        assert!(!provider.exists("key"));
    }

    #[test]
    fn test_memory_list_names() {
        let provider = MemorySecretProvider::new();

        provider.store("a", "1");
        provider.store("b", "2");

        let mut names = provider.list_names();
        names.sort();
        assert_eq!(names, vec!["a", "b"]);
    }
}
