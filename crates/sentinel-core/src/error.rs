//! Error types for sentinel-core

use thiserror::Error;

/// Result type alias for Sentinel Prime operations
pub type Result<T> = std::result::Result<T, SentinelError>;

/// Sentinel Prime error types
#[derive(Error, Debug)]
pub enum SentinelError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationError(String),

    #[error("Encryption failed: {0}")]
    EncryptionError(String),

    #[error("Decryption failed: {0}")]
    DecryptionError(String),

    #[error("Password generation failed: {0}")]
    GenerationError(String),

    #[error("Secret not found: {0}")]
    SecretNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl SentinelError {
    /// Message that is safe to show to end users.
    ///
    /// Cryptographic failure detail stays out of user-facing output; callers
    /// should log the full error and display this instead.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::Configuration(_) | Self::KeyDerivationError(_) => "Service is not configured",
            Self::SecretNotFound(_) => "Secret not found",
            Self::InvalidInput(_) => "Invalid request",
            Self::DecryptionError(_) => "Stored secret could not be read",
            Self::EncryptionError(_)
            | Self::GenerationError(_)
            | Self::StorageError(_)
            | Self::IoError(_)
            | Self::SerializationError(_) => "Failed to process request",
        }
    }

    /// Whether the error was caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::SecretNotFound(_) | Self::InvalidInput(_))
    }
}
