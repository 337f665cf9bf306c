//! Process configuration
//!
//! Settings come from environment variables. The operator secret is optional
//! at load time so that `Settings` can be inspected, but building a cipher
//! without it is a configuration error.

use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::debug;

use crate::crypto::{KeyDerivation, KeyDerivationParams, SecretCipher, SecretString};
use crate::error::{Result, SentinelError};

/// Operator secret the vault key is derived from
pub const ENCRYPTION_KEY_VAR: &str = "ENCRYPTION_KEY";
/// Key derivation scheme: `sha256` (default) or `argon2id`
pub const KDF_VAR: &str = "SENTINEL_KDF";
/// Salt for the `argon2id` scheme
pub const KDF_SALT_VAR: &str = "SENTINEL_KDF_SALT";
/// Directory holding the record store
pub const DATA_DIR_VAR: &str = "SENTINEL_DATA_DIR";

/// Application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Operator secret (`ENCRYPTION_KEY`)
    pub encryption_key: Option<SecretString>,
    /// How the vault key is derived from the operator secret
    pub key_derivation: KeyDerivation,
    /// Override for the data directory
    pub data_dir: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let encryption_key = lookup(ENCRYPTION_KEY_VAR)
            .filter(|v| !v.is_empty())
            .map(SecretString::new);

        let key_derivation = match lookup(KDF_VAR).as_deref().map(str::trim) {
            None | Some("") | Some("sha256") => KeyDerivation::Sha256,
            Some("argon2id") => {
                let salt = lookup(KDF_SALT_VAR).filter(|v| !v.is_empty()).ok_or_else(|| {
                    SentinelError::Configuration(format!(
                        "{} is required when {}=argon2id",
                        KDF_SALT_VAR, KDF_VAR
                    ))
                })?;
                KeyDerivation::Argon2id {
                    salt,
                    params: KeyDerivationParams::default(),
                }
            }
            Some(other) => {
                return Err(SentinelError::Configuration(format!(
                    "unknown {} value: {}",
                    KDF_VAR, other
                )))
            }
        };

        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        debug!(
            "Loaded settings (kdf: {}, operator secret set: {})",
            key_derivation.name(),
            encryption_key.is_some()
        );

        Ok(Self {
            encryption_key,
            key_derivation,
            data_dir,
        })
    }

    /// Derive the vault key and build the cipher
    ///
    /// Fails with [`SentinelError::Configuration`] when no operator secret is set.
    pub fn cipher(&self) -> Result<SecretCipher> {
        let secret = self.encryption_key.as_ref().ok_or_else(|| {
            SentinelError::Configuration(format!("{} not set", ENCRYPTION_KEY_VAR))
        })?;

        SecretCipher::with_derivation(secret, &self.key_derivation)
    }

    /// Directory for persistent data
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }

        ProjectDirs::from("com", "sentinel-prime", "sentinel-prime")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| {
                SentinelError::StorageError("Could not determine data directory".to_string())
            })
    }
}
