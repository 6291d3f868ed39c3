//! Environment variable layer
//!
//! Variables named `{PREFIX}_{SECTION}__{KEY}` become the configuration path
//! `SECTION:KEY`. A double underscore separates sections so that single
//! underscores stay available for snake_case keys.

use super::node::{ConfigNode, PATH_SEPARATOR};
use std::collections::HashMap;

/// Section separator inside environment variable names
pub const ENV_SECTION_SEPARATOR: &str = "__";

/// Source of environment variables
pub trait EnvSource: Send + Sync {
    /// Get a single variable
    fn var(&self, name: &str) -> Option<String>;

    /// Snapshot of all variables
    fn vars(&self) -> Vec<(String, String)>;
}

/// Reads the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEnvSource;

impl EnvSource for DefaultEnvSource {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn vars(&self) -> Vec<(String, String)> {
        std::env::vars().collect()
    }
}

/// Fixed set of variables, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MapEnvSource {
    vars: HashMap<String, String>,
}

impl MapEnvSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl FromIterator<(String, String)> for MapEnvSource {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

impl EnvSource for MapEnvSource {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn vars(&self) -> Vec<(String, String)> {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// Map an environment variable name to a configuration path.
///
/// Returns `None` when the variable does not carry the prefix. An empty
/// prefix accepts every variable.
pub fn env_var_to_path(prefix: &str, name: &str) -> Option<String> {
    let rest = if prefix.is_empty() {
        name
    } else {
        let head = name.get(..prefix.len())?;
        if !head.eq_ignore_ascii_case(prefix) {
            return None;
        }
        name[prefix.len()..].strip_prefix('_')?
    };

    let segments: Vec<&str> = rest
        .split(ENV_SECTION_SEPARATOR)
        .filter(|s| !s.is_empty())
        .collect();
    if segments.is_empty() {
        return None;
    }
    Some(segments.join(&PATH_SEPARATOR.to_string()))
}

/// Collect the prefixed variables of `source` into a configuration layer
pub fn env_layer(prefix: &str, source: &dyn EnvSource) -> ConfigNode {
    let mut vars = source.vars();
    // Deterministic layering when two spellings map to the same path
    vars.sort();

    let mut node = ConfigNode::new();
    for (name, value) in vars {
        if let Some(path) = env_var_to_path(prefix, &name) {
            log::debug!("Environment override {name} -> {path}");
            node.set(&path, value);
        }
    }
    node
}
