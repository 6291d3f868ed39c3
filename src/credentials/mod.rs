//! Secret lookup
//!
//! Secrets (API keys, passwords) never live in the settings graph. They are
//! read through a [`SecretProvider`] so tests can inject fake values:
//! - **Environment**: process environment variables (production)
//! - **Memory**: in-memory only for testing

mod env;
mod memory;

pub use env::EnvSecretProvider;
pub use memory::MemorySecretProvider;

use crate::error::{Error, Result};

/// Trait for secret sources
pub trait SecretProvider: Send + Sync {
    /// Look up a secret by name
    fn get(&self, name: &str) -> Option<String>;

    /// Check if a secret exists
    fn exists(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Provider name for logging/debugging
    fn provider_name(&self) -> &'static str;
}

/// Fetch a secret that must be present and non-blank.
///
/// # Errors
///
/// Returns [`Error::MissingCredential`] if the secret is unset, empty or
/// whitespace only.
pub fn require_secret(provider: &dyn SecretProvider, name: &str) -> Result<String> {
    match provider.get(name) {
        Some(value) if !value.trim().is_empty() => {
            log::debug!("Resolved secret '{name}' from {}", provider.provider_name());
            Ok(value)
        }
        _ => {
            log::debug!("Secret '{name}' missing from {}", provider.provider_name());
            Err(Error::MissingCredential(name.to_string()))
        }
    }
}
