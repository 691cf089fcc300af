//! Error types for regcfg

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for regcfg operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for regcfg
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Addressing Errors
    // -------------------------------------------------------------------------
    #[error("Invalid base address '{address}': {reason}")]
    InvalidBaseAddress { address: String, reason: String },

    #[error("Invalid path '{address}': {reason}")]
    InvalidPath { address: String, reason: String },

    #[error("Failed to parse address '{input}': {source}")]
    AddressParse {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unknown {kind} selector '{token}'")]
    UnknownSelector { kind: &'static str, token: String },

    #[error("Invalid key name '{name}': {reason}")]
    InvalidKeyName { name: String, reason: String },

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Root '{0}' is not available in this store")]
    UnknownRoot(String),

    #[error("Container not found: {0}")]
    ContainerNotFound(String),

    #[error("Type mismatch for {key}: expected {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    // -------------------------------------------------------------------------
    // I/O Errors (file store)
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to parse store document: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Configuration / Concurrency Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal lock was poisoned - possible thread panic")]
    LockPoisoned,
}

impl Error {
    /// Check if this is a "not found" type error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ContainerNotFound(_) | Error::UnknownRoot(_))
    }

    /// Check if this error was caused by a malformed or mis-kinded address
    #[must_use]
    pub fn is_path_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidBaseAddress { .. }
                | Error::InvalidPath { .. }
                | Error::AddressParse { .. }
                | Error::UnknownSelector { .. }
                | Error::InvalidKeyName { .. }
        )
    }

    pub(crate) fn invalid_path(address: impl ToString, reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(Error::ContainerNotFound("Software".into()).is_not_found());
        assert!(Error::UnknownRoot("HKEY_DYN_DATA".into()).is_not_found());
        assert!(!Error::LockPoisoned.is_not_found());

        assert!(Error::invalid_path("registry://HKEY_USERS/a/", "must point to a value").is_path_error());
        assert!(
            Error::UnknownSelector {
                kind: "hive",
                token: "HKEY_NOWHERE".into()
            }
            .is_path_error()
        );
        assert!(!Error::Config("bad".into()).is_path_error());
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = Error::TypeMismatch {
            key: "Value1".into(),
            expected: "string".into(),
            actual: "dword".into(),
        };
        assert_eq!(
            err.to_string(),
            "Type mismatch for Value1: expected string, got dword"
        );
    }
}
