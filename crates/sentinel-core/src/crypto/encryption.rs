//! AES-256-CBC encryption of individual secrets
//!
//! Storage format: two lowercase hex strings kept side by side on the record
//! - `encryptedPassword`: PKCS#7-padded ciphertext, a multiple of 16 bytes
//! - `iv`: 16 bytes (32 hex characters), freshly random for every encryption
//!
//! CBC carries no authentication tag. A modified ciphertext or IV is detected
//! only when it breaks the padding or the UTF-8 decoding; otherwise it decrypts
//! to a different plaintext.

use aes::Aes256;
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

use super::SecretKey;
use crate::error::{Result, SentinelError};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// IV length in bytes (the AES block size)
pub const IV_LENGTH: usize = 16;

/// Ciphertext and IV pair, both hex encoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedSecret {
    /// Hex-encoded ciphertext
    #[serde(rename = "encryptedPassword")]
    pub ciphertext: String,
    /// Hex-encoded initialization vector
    pub iv: String,
}

/// Encrypt a plaintext string under a freshly generated IV
///
/// # Arguments
/// * `plaintext` - The value to encrypt (may be empty)
/// * `key` - The 256-bit encryption key
///
/// # Returns
/// The hex-encoded ciphertext and IV
pub fn encrypt(plaintext: &str, key: &SecretKey) -> Result<EncryptedSecret> {
    let mut iv = [0u8; IV_LENGTH];
    OsRng
        .try_fill_bytes(&mut iv)
        .map_err(|e| SentinelError::EncryptionError(format!("random source unavailable: {}", e)))?;

    let cipher = Aes256CbcEnc::new_from_slices(key.as_bytes(), &iv)
        .map_err(|e| SentinelError::EncryptionError(e.to_string()))?;

    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    Ok(EncryptedSecret {
        ciphertext: hex::encode(ciphertext),
        iv: hex::encode(iv),
    })
}

/// Decrypt a hex ciphertext with its hex IV
///
/// # Arguments
/// * `ciphertext` - Hex ciphertext produced by [`encrypt`]
/// * `iv` - Hex IV stored alongside the ciphertext
/// * `key` - The 256-bit decryption key
///
/// # Returns
/// The original plaintext
pub fn decrypt(ciphertext: &str, iv: &str, key: &SecretKey) -> Result<String> {
    if ciphertext.is_empty() {
        return Err(SentinelError::DecryptionError(
            "missing ciphertext".to_string(),
        ));
    }
    if iv.is_empty() {
        return Err(SentinelError::DecryptionError("missing IV".to_string()));
    }

    let iv_bytes = hex::decode(iv)
        .map_err(|e| SentinelError::DecryptionError(format!("Invalid IV hex: {}", e)))?;
    if iv_bytes.len() != IV_LENGTH {
        return Err(SentinelError::DecryptionError(format!(
            "Invalid IV length: expected {}, got {}",
            IV_LENGTH,
            iv_bytes.len()
        )));
    }

    let ciphertext_bytes = hex::decode(ciphertext)
        .map_err(|e| SentinelError::DecryptionError(format!("Invalid ciphertext hex: {}", e)))?;
    if ciphertext_bytes.len() % IV_LENGTH != 0 {
        return Err(SentinelError::DecryptionError(format!(
            "Invalid ciphertext length: {} is not a multiple of the block size",
            ciphertext_bytes.len()
        )));
    }

    let cipher = Aes256CbcDec::new_from_slices(key.as_bytes(), &iv_bytes)
        .map_err(|e| SentinelError::DecryptionError(e.to_string()))?;

    let plaintext = cipher
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext_bytes)
        .map_err(|e| SentinelError::DecryptionError(format!("Invalid padding: {}", e)))?;

    String::from_utf8(plaintext)
        .map_err(|e| SentinelError::DecryptionError(format!("Invalid UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_derivation::derive_key;

    fn test_key() -> SecretKey {
        derive_key("test-secret-value")
    }

    fn flip_hex_bit(hex_str: &str, bit: usize) -> String {
        let mut bytes = hex::decode(hex_str).unwrap();
        bytes[bit / 8] ^= 1 << (bit % 8);
        hex::encode(bytes)
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = test_key();
        let plaintext = "Sup3r$ecret!";

        let encrypted = encrypt(plaintext, &key).unwrap();

        assert_eq!(hex::decode(&encrypted.iv).unwrap().len(), 16);
        assert_eq!(hex::decode(&encrypted.ciphertext).unwrap().len() % 16, 0);

        let decrypted = decrypt(&encrypted.ciphertext, &encrypted.iv, &key).unwrap();
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_roundtrip_edge_plaintexts() {
        let key = test_key();
        let plaintexts = vec![
            String::new(),
            "a".to_string(),
            "pässwörd 🔐 密码".to_string(),
            "x".repeat(24),
            "y".repeat(64),
            "é".repeat(256),
        ];

        for plaintext in plaintexts {
            let encrypted = encrypt(&plaintext, &key).unwrap();
            let decrypted = decrypt(&encrypted.ciphertext, &encrypted.iv, &key).unwrap();
            assert_eq!(decrypted, plaintext);
        }
    }

    #[test]
    fn test_empty_plaintext_is_one_block() {
        let key = test_key();
        let encrypted = encrypt("", &key).unwrap();
        assert_eq!(encrypted.ciphertext.len(), 32);
    }

    #[test]
    fn test_output_is_lowercase_hex() {
        let key = test_key();
        let encrypted = encrypt("check the case", &key).unwrap();

        for s in [&encrypted.ciphertext, &encrypted.iv] {
            assert!(s.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
        assert_eq!(encrypted.iv.len(), 32);
    }

    #[test]
    fn test_known_vector_decrypts() {
        // AES-256-CBC/PKCS#7 under SHA-256("test-secret-value"), IV 00..0f
        let key = test_key();
        let iv = "000102030405060708090a0b0c0d0e0f";

        let decrypted = decrypt("634c84984c97eb1b8a6c0f081c093523", iv, &key).unwrap();
        assert_eq!(decrypted, "Sup3r$ecret!");

        let decrypted = decrypt("41b00636679693cc45c79693ccd4639e", iv, &key).unwrap();
        assert_eq!(decrypted, "pässwörd 🔐");
    }

    #[test]
    fn test_different_ivs_produce_different_ciphertext() {
        let key = test_key();

        let encrypted1 = encrypt("same plaintext", &key).unwrap();
        let encrypted2 = encrypt("same plaintext", &key).unwrap();

        assert_ne!(encrypted1.iv, encrypted2.iv);
        assert_ne!(encrypted1.ciphertext, encrypted2.ciphertext);
    }

    #[test]
    fn test_wrong_key_never_returns_original() {
        let key1 = test_key();
        let key2 = derive_key("another-secret");
        let plaintext = "secret data";

        let encrypted = encrypt(plaintext, &key1).unwrap();
        match decrypt(&encrypted.ciphertext, &encrypted.iv, &key2) {
            Ok(decrypted) => assert_ne!(decrypted, plaintext),
            Err(e) => assert!(matches!(e, SentinelError::DecryptionError(_))),
        }
    }

    #[test]
    fn test_tampered_ciphertext_or_iv_is_detectable() {
        let key = test_key();
        let plaintext = "a secret spanning two blocks";
        let encrypted = encrypt(plaintext, &key).unwrap();

        let ciphertext_bits = encrypted.ciphertext.len() / 2 * 8;
        for bit in 0..ciphertext_bits {
            let tampered = flip_hex_bit(&encrypted.ciphertext, bit);
            match decrypt(&tampered, &encrypted.iv, &key) {
                Ok(decrypted) => assert_ne!(decrypted, plaintext),
                Err(e) => assert!(matches!(e, SentinelError::DecryptionError(_))),
            }
        }

        for bit in 0..IV_LENGTH * 8 {
            let tampered = flip_hex_bit(&encrypted.iv, bit);
            match decrypt(&encrypted.ciphertext, &tampered, &key) {
                Ok(decrypted) => assert_ne!(decrypted, plaintext),
                Err(e) => assert!(matches!(e, SentinelError::DecryptionError(_))),
            }
        }
    }

    #[test]
    fn test_corrupted_padding_block_rejected() {
        let key = test_key();
        // A full-block plaintext puts a whole 0x10 padding block at the end
        let encrypted = encrypt("exactly16bytes!!", &key).unwrap();
        assert_eq!(encrypted.ciphertext.len(), 64);

        // Flipping a bit in the previous ciphertext block flips the same bit of the padding
        for byte in [15usize, 14, 0] {
            let tampered = flip_hex_bit(&encrypted.ciphertext, byte * 8);
            assert!(matches!(
                decrypt(&tampered, &encrypted.iv, &key),
                Err(SentinelError::DecryptionError(_))
            ));
        }
    }

    #[test]
    fn test_invalid_utf8_plaintext_rejected() {
        let key = test_key();
        let iv = [7u8; IV_LENGTH];
        let ciphertext = Aes256CbcEnc::new_from_slices(key.as_bytes(), &iv)
            .unwrap()
            .encrypt_padded_vec_mut::<Pkcs7>(&[0xff, 0xfe]);

        let result = decrypt(&hex::encode(ciphertext), &hex::encode(iv), &key);
        match result {
            Err(SentinelError::DecryptionError(msg)) => assert!(msg.contains("UTF-8")),
            other => panic!("expected DecryptionError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_halves_rejected() {
        let key = test_key();
        let encrypted = encrypt("pair", &key).unwrap();

        assert!(matches!(
            decrypt("", &encrypted.iv, &key),
            Err(SentinelError::DecryptionError(_))
        ));
        assert!(matches!(
            decrypt(&encrypted.ciphertext, "", &key),
            Err(SentinelError::DecryptionError(_))
        ));
    }

    #[test]
    fn test_malformed_input_rejected() {
        let key = test_key();
        let encrypted = encrypt("malformed", &key).unwrap();

        let cases = [
            // not hex
            ("zz", encrypted.iv.as_str()),
            (encrypted.ciphertext.as_str(), "not-hex"),
            // odd-length hex
            (encrypted.ciphertext.as_str(), "abc"),
            // wrong IV length
            (encrypted.ciphertext.as_str(), "00112233"),
            // truncated ciphertext
            (&encrypted.ciphertext[..30], encrypted.iv.as_str()),
        ];

        for (ciphertext, iv) in cases {
            assert!(matches!(
                decrypt(ciphertext, iv, &key),
                Err(SentinelError::DecryptionError(_))
            ));
        }
    }
}
