//! Document format backends
//!
//! Every format is parsed into a `serde_json::Value`, which is then flattened
//! into a [`ConfigNode`](crate::ConfigNode) tree. JSON is always available;
//! TOML and YAML sit behind the `toml` and `yaml` features.

use crate::error::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// Trait for document format implementations
pub trait StorageBackend: Send + Sync {
    /// File extension for this format (e.g., "json", "toml")
    fn extension(&self) -> &str;

    /// Parse a document into a JSON value tree
    ///
    /// `source_name` is only used for error messages.
    fn parse(&self, source_name: &str, content: &str) -> Result<Value>;

    /// Read and parse a document from disk
    fn read(&self, path: &Path) -> Result<Value> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;
        self.parse(&path.display().to_string(), &content)
    }
}

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    #[cfg(feature = "toml")]
    Toml,
    #[cfg(feature = "yaml")]
    Yaml,
}

impl Format {
    /// Pick a format from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            #[cfg(feature = "toml")]
            "toml" => Some(Format::Toml),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }

    /// Get the backend implementing this format
    pub fn backend(self) -> Box<dyn StorageBackend> {
        match self {
            Format::Json => Box::new(JsonStorage),
            #[cfg(feature = "toml")]
            Format::Toml => Box::new(TomlStorage),
            #[cfg(feature = "yaml")]
            Format::Yaml => Box::new(YamlStorage),
        }
    }
}

/// Select a backend based on the extension of `path`
pub fn backend_for_path(path: &Path) -> Result<Box<dyn StorageBackend>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    Format::from_extension(ext)
        .map(Format::backend)
        .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))
}

// =============================================================================
// JSON
// =============================================================================

/// JSON documents (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStorage;

impl StorageBackend for JsonStorage {
    fn extension(&self) -> &str {
        "json"
    }

    fn parse(&self, source_name: &str, content: &str) -> Result<Value> {
        serde_json::from_str(content).map_err(|e| Error::Parse {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })
    }
}

// =============================================================================
// TOML
// =============================================================================

/// TOML documents
#[cfg(feature = "toml")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlStorage;

#[cfg(feature = "toml")]
impl StorageBackend for TomlStorage {
    fn extension(&self) -> &str {
        "toml"
    }

    fn parse(&self, source_name: &str, content: &str) -> Result<Value> {
        let table: toml::Table = toml::from_str(content).map_err(|e| Error::Parse {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(toml_to_json(toml::Value::Table(table)))
    }
}

#[cfg(feature = "toml")]
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

// =============================================================================
// YAML
// =============================================================================

/// YAML documents
#[cfg(feature = "yaml")]
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlStorage;

#[cfg(feature = "yaml")]
impl StorageBackend for YamlStorage {
    fn extension(&self) -> &str {
        "yaml"
    }

    fn parse(&self, source_name: &str, content: &str) -> Result<Value> {
        if content.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        serde_yaml::from_str(content).map_err(|e| Error::Parse {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_json_parse() {
        let value = JsonStorage
            .parse("inline", r#"{"rabbit_mq": {"mq_address": "amqp://localhost"}}"#)
            .unwrap();
        assert_eq!(value["rabbit_mq"]["mq_address"], "amqp://localhost");
    }

    #[test]
    fn test_json_parse_error_names_source() {
        let err = JsonStorage.parse("appsettings.base.json", "{ nope").unwrap_err();
        match err {
            Error::Parse { source_name, .. } => assert_eq!(source_name, "appsettings.base.json"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("appsettings.json");
        std::fs::write(&path, r#"{"qwen": {"base_uri": "https://example.com/"}}"#).unwrap();

        let value = backend_for_path(&path).unwrap().read(&path).unwrap();
        assert_eq!(value["qwen"]["base_uri"], "https://example.com/");
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = JsonStorage.read(Path::new("/nonexistent/appsettings.json"));
        assert!(matches!(result.unwrap_err(), Error::FileRead { .. }));
    }

    #[test]
    fn test_unknown_extension() {
        let result = backend_for_path(Path::new("settings.ini"));
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(Format::from_extension("JSON"), Some(Format::Json));
    }
}
