//! Error types for the connection registry.

use thiserror::Error;

/// A result type using `RegistryError`.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The requested record was not found.
    #[error("connection record not found")]
    NotFound,

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}
