//! Cryptographic primitives for vault secrets
//!
//! This module provides:
//! - AES-256-CBC encryption with a fresh random IV per secret
//! - Key derivation from the operator secret
//! - Secure password generation
//! - Secure memory handling with zeroize

mod cipher;
mod encryption;
mod key_derivation;
mod password;
mod secure_memory;

pub use cipher::SecretCipher;
pub use encryption::{decrypt, encrypt, EncryptedSecret, IV_LENGTH};
pub use key_derivation::{derive_key, derive_key_argon2, KeyDerivation, KeyDerivationParams};
pub use password::{generate_secure_password, DEFAULT_PASSWORD_LENGTH, PASSWORD_ALPHABET};
pub use secure_memory::{SecretKey, SecretString};
