//! Vault secrets: record types and per-owner CRUD

mod manager;
mod types;

pub use manager::{clamp_password_length, VaultManager};
pub use types::{Category, DecryptedSecret, NewSecret, SecretSummary, SecretUpdate, VaultSecret};
