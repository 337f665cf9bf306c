//! Key derivation from the operator secret
//!
//! The default scheme is a single SHA-256 over the operator secret. It treats
//! the secret as high-entropy input, not as a human password, and is the scheme
//! existing stored records were written with. Argon2id is available as an
//! opt-in hardening; switching schemes changes the key and makes previously
//! written records unreadable.

use argon2::{Algorithm, Argon2, Params, Version};
use sha2::{Digest, Sha256};

use super::SecretKey;
use crate::error::{Result, SentinelError};

/// Minimum salt length accepted by Argon2
const MIN_SALT_LEN: usize = 8;

/// Parameters for Argon2id key derivation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDerivationParams {
    /// Memory cost in KiB (default: 65536 = 64MB)
    pub memory_cost: u32,
    /// Time cost / iterations (default: 3)
    pub time_cost: u32,
    /// Parallelism (default: 4)
    pub parallelism: u32,
}

impl Default for KeyDerivationParams {
    fn default() -> Self {
        Self {
            memory_cost: 65536, // 64 MB
            time_cost: 3,
            parallelism: 4,
        }
    }
}

/// How the 256-bit key is obtained from the operator secret
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeyDerivation {
    /// SHA-256 digest of the secret
    #[default]
    Sha256,
    /// Argon2id over the secret with an operator-supplied salt
    Argon2id {
        salt: String,
        params: KeyDerivationParams,
    },
}

impl KeyDerivation {
    /// Derive a key from the operator secret using this scheme
    pub fn derive(&self, secret: &str) -> Result<SecretKey> {
        if secret.is_empty() {
            return Err(SentinelError::Configuration(
                "operator secret is empty".to_string(),
            ));
        }

        match self {
            Self::Sha256 => Ok(derive_key(secret)),
            Self::Argon2id { salt, params } => derive_key_argon2(secret, salt, params),
        }
    }

    /// Short name used in configuration and logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Argon2id { .. } => "argon2id",
        }
    }
}

/// Derive a 256-bit key as the SHA-256 digest of the operator secret
pub fn derive_key(secret: &str) -> SecretKey {
    let digest = Sha256::digest(secret.as_bytes());
    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    SecretKey::new(key)
}

/// Derive a 256-bit key from the operator secret using Argon2id
///
/// # Arguments
/// * `secret` - The operator secret
/// * `salt` - Salt string, at least 8 bytes
/// * `params` - Argon2 cost parameters
pub fn derive_key_argon2(
    secret: &str,
    salt: &str,
    params: &KeyDerivationParams,
) -> Result<SecretKey> {
    if salt.len() < MIN_SALT_LEN {
        return Err(SentinelError::KeyDerivationError(format!(
            "salt must be at least {} bytes",
            MIN_SALT_LEN
        )));
    }

    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(32), // Output length: 32 bytes = 256 bits
    )
    .map_err(|e| SentinelError::KeyDerivationError(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key = [0u8; 32];
    argon2
        .hash_password_into(secret.as_bytes(), salt.as_bytes(), &mut key)
        .map_err(|e| SentinelError::KeyDerivationError(e.to_string()))?;

    Ok(SecretKey::new(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> KeyDerivationParams {
        KeyDerivationParams {
            memory_cost: 8192, // 8 MB (faster for testing)
            time_cost: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_sha256_known_answer() {
        let key = derive_key("test-secret-value");
        assert_eq!(
            hex::encode(key.as_bytes()),
            "afbb9b6c7c26d7b5ce487d7eed36223352f315eadc14e39bdd30fe08fb7c8555"
        );
    }

    #[test]
    fn test_sha256_deterministic_and_distinct() {
        let key1 = derive_key("secret-a");
        let key2 = derive_key("secret-a");
        let key3 = derive_key("secret-b");

        assert_eq!(key1.as_bytes(), key2.as_bytes());
        assert_ne!(key1.as_bytes(), key3.as_bytes());
    }

    #[test]
    fn test_empty_secret_is_configuration_error() {
        let result = KeyDerivation::Sha256.derive("");
        assert!(matches!(result, Err(SentinelError::Configuration(_))));
    }

    #[test]
    fn test_argon2_deterministic() {
        let key1 = derive_key_argon2("operator", "pepper-salt", &fast_params()).unwrap();
        let key2 = derive_key_argon2("operator", "pepper-salt", &fast_params()).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_argon2_differs_from_sha256() {
        let scheme = KeyDerivation::Argon2id {
            salt: "pepper-salt".to_string(),
            params: fast_params(),
        };
        let hardened = scheme.derive("operator").unwrap();
        let plain = KeyDerivation::Sha256.derive("operator").unwrap();
        assert_ne!(hardened.as_bytes(), plain.as_bytes());
    }

    #[test]
    fn test_argon2_different_salts() {
        let key1 = derive_key_argon2("operator", "salt-one-1", &fast_params()).unwrap();
        let key2 = derive_key_argon2("operator", "salt-two-2", &fast_params()).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_argon2_short_salt_rejected() {
        let result = derive_key_argon2("operator", "short", &fast_params());
        assert!(matches!(result, Err(SentinelError::KeyDerivationError(_))));
    }
}
