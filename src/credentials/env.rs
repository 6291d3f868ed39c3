//! Environment-variable secret provider

use super::SecretProvider;
use crate::source::{DefaultEnvSource, EnvSource};
use std::sync::Arc;

/// Reads secrets from environment variables
#[derive(Clone)]
pub struct EnvSecretProvider {
    source: Arc<dyn EnvSource>,
}

impl EnvSecretProvider {
    /// Provider over the real process environment
    pub fn new() -> Self {
        Self {
            source: Arc::new(DefaultEnvSource),
        }
    }

    /// Provider over a custom variable source
    pub fn with_source(source: Arc<dyn EnvSource>) -> Self {
        Self { source }
    }
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EnvSecretProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSecretProvider").finish_non_exhaustive()
    }
}

impl SecretProvider for EnvSecretProvider {
    fn get(&self, name: &str) -> Option<String> {
        self.source.var(name)
    }

    fn provider_name(&self) -> &'static str {
        "environment"
    }
}
