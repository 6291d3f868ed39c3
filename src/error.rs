//! Error types for confbind library

use crate::binder::SkippedField;
use thiserror::Error;

/// Result type alias for confbind operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for confbind library
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(String),

    // -------------------------------------------------------------------------
    // Document Errors
    // -------------------------------------------------------------------------
    #[error("Failed to parse '{source_name}': {reason}")]
    Parse { source_name: String, reason: String },

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    // -------------------------------------------------------------------------
    // Binding Errors
    // -------------------------------------------------------------------------
    #[error("Invalid settings schema for {type_name}: {reason}")]
    Schema {
        type_name: &'static str,
        reason: String,
    },

    #[error("{} setting(s) could not be converted: {}", .0.len(), summarize(.0))]
    Conversion(Vec<SkippedField>),

    #[error("Settings type '{0}' not registered")]
    NotRegistered(&'static str),

    // -------------------------------------------------------------------------
    // Credential Errors
    // -------------------------------------------------------------------------
    #[error("Required credential '{0}' is missing or blank")]
    MissingCredential(String),

    // -------------------------------------------------------------------------
    // Outbound Call Errors
    // -------------------------------------------------------------------------
    #[error("Invalid URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl Error {
    /// Check if this is a "not found" type error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::PathNotFound(_) | Error::NotRegistered(_))
    }

    /// Check if this error comes from a missing secret
    #[must_use]
    pub fn is_credential_error(&self) -> bool {
        matches!(self, Error::MissingCredential(_))
    }
}

fn summarize(skipped: &[SkippedField]) -> String {
    skipped
        .iter()
        .map(|s| format!("{} ({})", s.path, s.target_type))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_message_lists_paths() {
        let err = Error::Conversion(vec![SkippedField {
            path: "Database.Port".into(),
            raw: "abc".into(),
            target_type: "u16",
            reason: "invalid digit found in string".into(),
        }]);

        let msg = err.to_string();
        assert!(msg.starts_with("1 setting(s)"));
        assert!(msg.contains("Database.Port (u16)"));
    }

    #[test]
    fn test_parse_message_names_source() {
        use crate::storage::{JsonStorage, StorageBackend};

        let err = JsonStorage
            .parse("appsettings.base.json", "{ not json")
            .unwrap_err();
        assert!(matches!(&err, Error::Parse { source_name, .. } if source_name == "appsettings.base.json"));
        assert!(err.to_string().starts_with("Failed to parse 'appsettings.base.json'"));
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::NotRegistered("AppSettings").is_not_found());
        assert!(Error::MissingCredential("KEY".into()).is_credential_error());
        assert!(!Error::Transport("timeout".into()).is_credential_error());
    }
}
