//! Secure password generation
//!
//! Each password character is one OS random byte reduced modulo the alphabet
//! size. 256 is not a multiple of 88, so the first 80 characters of the
//! alphabet are slightly more likely than the last 8. Changing the mapping
//! changes the output distribution, so it stays as is.

use rand::{rngs::OsRng, RngCore};
use zeroize::Zeroize;

use crate::error::{Result, SentinelError};

/// Characters a generated password is drawn from. The order is significant.
pub const PASSWORD_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Length used when the caller does not ask for one
pub const DEFAULT_PASSWORD_LENGTH: usize = 24;

/// Generate a random password of exactly `length` characters
///
/// The generator does not clamp `length`; callers that want bounds apply
/// them before calling.
pub fn generate_secure_password(length: usize) -> Result<String> {
    let alphabet = PASSWORD_ALPHABET.as_bytes();

    let mut random_bytes = vec![0u8; length];
    OsRng
        .try_fill_bytes(&mut random_bytes)
        .map_err(|e| SentinelError::GenerationError(format!("random source unavailable: {}", e)))?;

    let password: String = random_bytes
        .iter()
        .map(|b| alphabet[*b as usize % alphabet.len()] as char)
        .collect();

    random_bytes.zeroize();
    Ok(password)
}
