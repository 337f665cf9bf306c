//! Secret cipher - the key-owning entry point for vault encryption

use tracing::debug;

use super::encryption::{self, EncryptedSecret};
use super::key_derivation::KeyDerivation;
use super::password;
use super::{SecretKey, SecretString};
use crate::error::Result;

/// Encrypts and decrypts individual secrets under a key derived once at
/// construction.
///
/// The key is immutable for the lifetime of the cipher, so a single instance
/// can be shared behind an `Arc` by any number of concurrent callers.
pub struct SecretCipher {
    key: SecretKey,
    derivation: &'static str,
}

impl SecretCipher {
    /// Build a cipher from the operator secret using SHA-256 key derivation
    pub fn new(secret: &SecretString) -> Result<Self> {
        Self::with_derivation(secret, &KeyDerivation::Sha256)
    }

    /// Build a cipher from the operator secret using the given derivation scheme
    pub fn with_derivation(secret: &SecretString, derivation: &KeyDerivation) -> Result<Self> {
        let key = derivation.derive(secret.expose())?;
        debug!("Derived vault key using {}", derivation.name());

        Ok(Self {
            key,
            derivation: derivation.name(),
        })
    }

    /// Build a cipher around an already derived key
    pub fn from_key(key: SecretKey) -> Self {
        Self {
            key,
            derivation: "raw",
        }
    }

    /// Encrypt a plaintext under a fresh random IV
    pub fn encrypt(&self, plaintext: &str) -> Result<EncryptedSecret> {
        encryption::encrypt(plaintext, &self.key)
    }

    /// Decrypt a hex ciphertext with the hex IV it was written with
    pub fn decrypt(&self, ciphertext: &str, iv: &str) -> Result<String> {
        encryption::decrypt(ciphertext, iv, &self.key)
    }

    /// Decrypt a stored ciphertext/IV pair
    pub fn decrypt_secret(&self, secret: &EncryptedSecret) -> Result<String> {
        self.decrypt(&secret.ciphertext, &secret.iv)
    }

    /// Generate a random password of exactly `length` characters
    pub fn generate_secure_password(&self, length: usize) -> Result<String> {
        password::generate_secure_password(length)
    }

    /// Name of the scheme the key was derived with
    pub fn derivation(&self) -> &'static str {
        self.derivation
    }
}

impl std::fmt::Debug for SecretCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCipher")
            .field("key", &self.key)
            .field("derivation", &self.derivation)
            .finish()
    }
}
