//! Vault record type definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::crypto::{EncryptedSecret, SecretString};
use crate::error::SentinelError;

/// Category of a vault secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Category {
    Social,
    Work,
    Finance,
    Shopping,
    Entertainment,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Social,
        Category::Work,
        Category::Finance,
        Category::Shopping,
        Category::Entertainment,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Social => "Social",
            Self::Work => "Work",
            Self::Finance => "Finance",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = SentinelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SentinelError::InvalidInput(format!("unknown category: {}", s)))
    }
}

/// Stored vault secret
///
/// `encrypted_password` and `iv` always travel together; a record missing
/// either one cannot be decrypted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultSecret {
    pub id: Uuid,

    /// Account that owns this secret
    pub owner: Uuid,

    pub title: String,

    /// Hex ciphertext of the password
    #[serde(default)]
    pub encrypted_password: String,

    /// Hex IV the password was encrypted with
    #[serde(default)]
    pub iv: String,

    #[serde(default)]
    pub category: Category,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub website_url: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl VaultSecret {
    /// The ciphertext/IV pair of this record
    pub fn encrypted(&self) -> EncryptedSecret {
        EncryptedSecret {
            ciphertext: self.encrypted_password.clone(),
            iv: self.iv.clone(),
        }
    }

    /// Replace the ciphertext/IV pair
    pub fn set_encrypted(&mut self, encrypted: EncryptedSecret) {
        self.encrypted_password = encrypted.ciphertext;
        self.iv = encrypted.iv;
    }

    /// Metadata view without any cipher fields
    pub fn summary(&self) -> SecretSummary {
        SecretSummary {
            id: self.id,
            title: self.title.clone(),
            category: self.category,
            tags: self.tags.clone(),
            website_url: self.website_url.clone(),
            username: self.username.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Secret metadata (safe to display)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretSummary {
    pub id: Uuid,
    pub title: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub website_url: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for a new vault secret
#[derive(Debug, Clone)]
pub struct NewSecret {
    pub title: String,
    pub password: SecretString,
    pub category: Option<Category>,
    pub tags: Vec<String>,
    pub website_url: Option<String>,
    pub username: Option<String>,
    pub notes: Option<String>,
}

impl NewSecret {
    pub fn new(title: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            title: title.into(),
            password: password.into(),
            category: None,
            tags: Vec::new(),
            website_url: None,
            username: None,
            notes: None,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_website_url(mut self, url: impl Into<String>) -> Self {
        self.website_url = Some(url.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update of a vault secret. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct SecretUpdate {
    pub title: Option<String>,
    /// New password; re-encrypted under a fresh IV
    pub password: Option<SecretString>,
    pub category: Option<Category>,
    pub tags: Option<Vec<String>>,
    pub website_url: Option<String>,
    pub username: Option<String>,
    pub notes: Option<String>,
}

/// Vault secret with its password decrypted - password zeroed when dropped
#[derive(Debug)]
pub struct DecryptedSecret {
    pub summary: SecretSummary,
    pub notes: String,
    password: SecretString,
}

impl DecryptedSecret {
    pub(crate) fn new(record: &VaultSecret, password: String) -> Self {
        Self {
            summary: record.summary(),
            notes: record.notes.clone(),
            password: SecretString::new(password),
        }
    }

    /// Get the decrypted password (use carefully)
    pub fn password(&self) -> &str {
        self.password.expose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("finance".parse::<Category>().unwrap(), Category::Finance);
        assert_eq!(" Work ".parse::<Category>().unwrap(), Category::Work);
        assert!("Groceries".parse::<Category>().is_err());
    }

    #[test]
    fn test_record_wire_names() {
        let now = Utc::now();
        let record = VaultSecret {
            id: Uuid::new_v4(),
            owner: Uuid::new_v4(),
            title: "Bank".to_string(),
            encrypted_password: "00".repeat(16),
            iv: "11".repeat(16),
            category: Category::Finance,
            tags: vec!["money".to_string()],
            website_url: "https://bank.example".to_string(),
            username: "alice".to_string(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["encryptedPassword"], "00".repeat(16));
        assert_eq!(json["iv"], "11".repeat(16));
        assert_eq!(json["websiteUrl"], "https://bank.example");
        assert_eq!(json["category"], "Finance");
    }

    #[test]
    fn test_record_without_iv_still_loads() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "owner": Uuid::new_v4(),
            "title": "Legacy",
            "encryptedPassword": "abcd",
            "createdAt": Utc::now(),
            "updatedAt": Utc::now(),
        });

        let record: VaultSecret = serde_json::from_value(json).unwrap();
        assert!(record.iv.is_empty());
        assert_eq!(record.category, Category::Other);
    }

    #[test]
    fn test_summary_has_no_cipher_fields() {
        let now = Utc::now();
        let record = VaultSecret {
            id: Uuid::new_v4(),
            owner: Uuid::new_v4(),
            title: "Mail".to_string(),
            encrypted_password: "deadbeef".to_string(),
            iv: "cafebabe".to_string(),
            category: Category::Work,
            tags: Vec::new(),
            website_url: String::new(),
            username: String::new(),
            notes: "n".to_string(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&record.summary()).unwrap();
        assert!(!json.contains("deadbeef"));
        assert!(!json.contains("cafebabe"));
        assert!(!json.contains("encryptedPassword"));
    }
}
