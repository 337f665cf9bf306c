//! Vault manager for per-owner CRUD over encrypted secrets

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::types::{DecryptedSecret, NewSecret, SecretSummary, SecretUpdate, VaultSecret};
use crate::crypto::{SecretCipher, DEFAULT_PASSWORD_LENGTH};
use crate::error::{Result, SentinelError};
use crate::storage::RecordStorage;

/// Storage key prefix for vault secrets
const SECRET_PREFIX: &str = "secret:";

const TITLE_MAX_CHARS: usize = 100;
const NOTES_MAX_CHARS: usize = 500;

/// Shortest generated password length accepted from callers
pub const MIN_GENERATED_LENGTH: usize = 12;
/// Longest generated password length accepted from callers
pub const MAX_GENERATED_LENGTH: usize = 64;

/// Apply the caller-side bounds for generated passwords: lengths within
/// `[12, 64]` are kept, anything else falls back to 24
pub fn clamp_password_length(requested: Option<usize>) -> usize {
    match requested {
        Some(n) if (MIN_GENERATED_LENGTH..=MAX_GENERATED_LENGTH).contains(&n) => n,
        _ => DEFAULT_PASSWORD_LENGTH,
    }
}

/// Vault manager
///
/// Passwords are encrypted before they reach storage and decrypted only in
/// [`VaultManager::get_decrypted`].
pub struct VaultManager {
    /// Storage backend
    storage: Arc<dyn RecordStorage>,
    /// Cipher holding the vault key
    cipher: Arc<SecretCipher>,
}

impl VaultManager {
    /// Create a new vault manager
    pub fn new(storage: Arc<dyn RecordStorage>, cipher: Arc<SecretCipher>) -> Self {
        Self { storage, cipher }
    }

    /// Store a new secret for `owner`
    pub async fn create(&self, owner: Uuid, new: NewSecret) -> Result<SecretSummary> {
        let title = validate_title(&new.title)?;
        if new.password.is_empty() {
            return Err(SentinelError::InvalidInput(
                "Title and password are required".to_string(),
            ));
        }
        let notes = new.notes.unwrap_or_default();
        validate_notes(&notes)?;

        let encrypted = self.cipher.encrypt(new.password.expose())?;
        let now = Utc::now();

        let record = VaultSecret {
            id: Uuid::new_v4(),
            owner,
            title,
            encrypted_password: encrypted.ciphertext,
            iv: encrypted.iv,
            category: new.category.unwrap_or_default(),
            tags: new.tags,
            website_url: new.website_url.unwrap_or_default().trim().to_string(),
            username: new.username.unwrap_or_default().trim().to_string(),
            notes,
            created_at: now,
            updated_at: now,
        };

        self.save(&record).await?;

        info!("Created secret {} for owner {}", record.id, owner);
        Ok(record.summary())
    }

    /// List the owner's secrets, newest first
    pub async fn list(&self, owner: Uuid) -> Result<Vec<SecretSummary>> {
        let keys = self.storage.list_keys(&owner_prefix(owner)).await?;
        let mut secrets = Vec::with_capacity(keys.len());

        for key in keys {
            if let Some(data) = self.storage.retrieve(&key).await? {
                let record: VaultSecret = serde_json::from_slice(&data)?;
                secrets.push(record.summary());
            }
        }

        secrets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(secrets)
    }

    /// Get a secret with its password decrypted
    pub async fn get_decrypted(&self, owner: Uuid, id: Uuid) -> Result<DecryptedSecret> {
        let record = self.load(owner, id).await?;
        let password = self.cipher.decrypt_secret(&record.encrypted())?;

        debug!("Decrypted secret {}", id);
        Ok(DecryptedSecret::new(&record, password))
    }

    /// Apply a partial update. A new password gets a brand-new ciphertext/IV pair.
    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        update: SecretUpdate,
    ) -> Result<SecretSummary> {
        let mut record = self.load(owner, id).await?;

        if let Some(title) = update.title.filter(|t| !t.trim().is_empty()) {
            record.title = validate_title(&title)?;
        }
        if let Some(category) = update.category {
            record.category = category;
        }
        if let Some(tags) = update.tags {
            record.tags = tags;
        }
        if let Some(url) = update.website_url {
            record.website_url = url.trim().to_string();
        }
        if let Some(username) = update.username {
            record.username = username.trim().to_string();
        }
        if let Some(notes) = update.notes {
            validate_notes(&notes)?;
            record.notes = notes;
        }
        if let Some(password) = update.password.filter(|p| !p.is_empty()) {
            record.set_encrypted(self.cipher.encrypt(password.expose())?);
            debug!("Re-encrypted password for secret {}", id);
        }

        record.updated_at = Utc::now();
        self.save(&record).await?;

        info!("Updated secret {}", id);
        Ok(record.summary())
    }

    /// Delete a secret
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<()> {
        if !self.storage.delete(&record_key(owner, id)).await? {
            return Err(SentinelError::SecretNotFound(id.to_string()));
        }

        info!("Deleted secret {}", id);
        Ok(())
    }

    /// Generate a password, clamping the requested length first
    pub fn generate_password(&self, requested: Option<usize>) -> Result<String> {
        self.cipher
            .generate_secure_password(clamp_password_length(requested))
    }

    async fn load(&self, owner: Uuid, id: Uuid) -> Result<VaultSecret> {
        let data = self
            .storage
            .retrieve(&record_key(owner, id))
            .await?
            .ok_or_else(|| SentinelError::SecretNotFound(id.to_string()))?;

        Ok(serde_json::from_slice(&data)?)
    }

    async fn save(&self, record: &VaultSecret) -> Result<()> {
        let data = serde_json::to_vec(record)?;
        self.storage
            .store(&record_key(record.owner, record.id), &data)
            .await
    }
}

fn owner_prefix(owner: Uuid) -> String {
    format!("{}{}:", SECRET_PREFIX, owner)
}

fn record_key(owner: Uuid, id: Uuid) -> String {
    format!("{}{}", owner_prefix(owner), id)
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(SentinelError::InvalidInput(
            "Title and password are required".to_string(),
        ));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(SentinelError::InvalidInput(format!(
            "Title must be at most {} characters",
            TITLE_MAX_CHARS
        )));
    }
    Ok(title.to_string())
}

fn validate_notes(notes: &str) -> Result<()> {
    if notes.chars().count() > NOTES_MAX_CHARS {
        return Err(SentinelError::InvalidInput(format!(
            "Notes must be at most {} characters",
            NOTES_MAX_CHARS
        )));
    }
    Ok(())
}
