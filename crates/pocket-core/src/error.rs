//! Error types for Pocket core operations.
//!
//! Errors are descriptive at the core level; the CLI layer shows the
//! message to the user verbatim.

use thiserror::Error;

/// Result type alias for Pocket operations.
pub type Result<T> = std::result::Result<T, PocketError>;

/// Core error type for Pocket operations.
#[derive(Debug, Error)]
pub enum PocketError {
    /// Malformed caller input (passphrase syntax, page numbers, timestamps)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Key material of the wrong size
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Wrong passphrase or probe mismatch
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Ciphertext malformed or authentication tag invalid
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// Schema bootstrap failure
    #[error("Schema error: {0}")]
    Schema(String),

    /// Read or write failure on notes or configuration
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PocketError {
    /// Whether the error means the passphrase was rejected.
    pub fn is_authentication(&self) -> bool {
        matches!(self, PocketError::Authentication(_))
    }
}

impl From<rusqlite::Error> for PocketError {
    fn from(err: rusqlite::Error) -> Self {
        PocketError::Storage(err.to_string())
    }
}

impl From<std::io::Error> for PocketError {
    fn from(err: std::io::Error) -> Self {
        PocketError::Storage(err.to_string())
    }
}

impl From<hex::FromHexError> for PocketError {
    fn from(err: hex::FromHexError) -> Self {
        PocketError::Decryption(format!("invalid hex encoding: {}", err))
    }
}
