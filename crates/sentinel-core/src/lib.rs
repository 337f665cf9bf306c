//! # sentinel-core
//!
//! Core functionality for Sentinel Prime including:
//! - AES-256-CBC encryption of individual vault secrets with a fresh IV per write
//! - Key derivation from the operator secret (SHA-256, optional Argon2id hardening)
//! - Secure password generation from the OS random source
//! - Vault records with per-owner CRUD over pluggable storage

pub mod crypto;
pub mod error;
pub mod settings;
pub mod storage;
pub mod vault;

pub use crypto::{
    generate_secure_password, EncryptedSecret, KeyDerivation, SecretCipher, SecretKey,
    SecretString, DEFAULT_PASSWORD_LENGTH, PASSWORD_ALPHABET,
};
pub use error::{Result, SentinelError};
pub use settings::Settings;
pub use storage::{FileStorage, MemoryStorage, RecordStorage};
pub use vault::{
    clamp_password_length, Category, DecryptedSecret, NewSecret, SecretSummary, SecretUpdate,
    VaultManager, VaultSecret,
};
