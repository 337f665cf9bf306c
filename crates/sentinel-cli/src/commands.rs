//! Subcommand definitions and their execution

use anyhow::{bail, Context};
use clap::Subcommand;
use serde_json::json;
use std::io::Write;
use tracing::debug;
use uuid::Uuid;

use sentinel_core::{
    clamp_password_length, Category, NewSecret, SecretCipher, SecretString, SecretUpdate,
    VaultManager,
};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a random password (length outside 12-64 falls back to 24)
    Generate {
        #[arg(long, short)]
        length: Option<usize>,
    },

    /// Encrypt a value and print the ciphertext/IV pair as JSON
    Encrypt {
        /// Value to encrypt (prompted for when omitted)
        #[arg(long)]
        value: Option<String>,
    },

    /// Decrypt a ciphertext/IV pair
    Decrypt {
        #[arg(long)]
        ciphertext: String,
        #[arg(long)]
        iv: String,
    },

    /// Manage stored vault secrets
    #[command(subcommand)]
    Vault(VaultCommand),
}

#[derive(Subcommand, Debug)]
pub enum VaultCommand {
    /// Store a new secret
    Add {
        #[arg(long, env = "SENTINEL_OWNER")]
        owner: Uuid,
        #[arg(long)]
        title: String,
        /// Password to store (prompted for unless --generate is given)
        #[arg(long, conflicts_with = "generate")]
        password: Option<String>,
        /// Store a freshly generated password instead
        #[arg(long)]
        generate: bool,
        #[arg(long, requires = "generate")]
        length: Option<usize>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// List the owner's secrets without passwords
    List {
        #[arg(long, env = "SENTINEL_OWNER")]
        owner: Uuid,
    },

    /// Show one secret including its decrypted password
    Show {
        #[arg(long, env = "SENTINEL_OWNER")]
        owner: Uuid,
        #[arg(long)]
        id: Uuid,
    },

    /// Update fields of a secret
    Update {
        #[arg(long, env = "SENTINEL_OWNER")]
        owner: Uuid,
        #[arg(long)]
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "generate")]
        password: Option<String>,
        /// Replace the password with a freshly generated one
        #[arg(long)]
        generate: bool,
        #[arg(long, requires = "generate")]
        length: Option<usize>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a secret
    Delete {
        #[arg(long, env = "SENTINEL_OWNER")]
        owner: Uuid,
        #[arg(long)]
        id: Uuid,
    },
}

/// Run a command that only needs the cipher
pub fn run_cipher(
    command: Command,
    cipher: &SecretCipher,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Generate { length } => {
            let password = cipher.generate_secure_password(clamp_password_length(length))?;
            writeln!(out, "{}", password)?;
        }
        Command::Encrypt { value } => {
            let value = read_secret(value, "Value to encrypt: ")?;
            let encrypted = cipher.encrypt(value.expose())?;
            writeln!(out, "{}", serde_json::to_string_pretty(&encrypted)?)?;
        }
        Command::Decrypt { ciphertext, iv } => {
            let plaintext = SecretString::new(cipher.decrypt(&ciphertext, &iv)?);
            writeln!(out, "{}", plaintext.expose())?;
        }
        Command::Vault(_) => bail!("vault commands need a vault manager"),
    }
    Ok(())
}

/// Run a vault command
pub async fn run_vault(
    command: VaultCommand,
    manager: &VaultManager,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        VaultCommand::Add {
            owner,
            title,
            password,
            generate,
            length,
            category,
            tags,
            url,
            username,
            notes,
        } => {
            let password = if generate {
                SecretString::new(manager.generate_password(length)?)
            } else {
                read_secret(password, "Password: ")?
            };

            let mut new = NewSecret::new(title, password).with_tags(tags);
            new.category = category;
            new.website_url = url;
            new.username = username;
            new.notes = notes;

            let summary = manager.create(owner, new).await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        }
        VaultCommand::List { owner } => {
            let secrets = manager.list(owner).await?;
            debug!("Listing {} secrets", secrets.len());
            writeln!(out, "{}", serde_json::to_string_pretty(&secrets)?)?;
        }
        VaultCommand::Show { owner, id } => {
            let secret = manager.get_decrypted(owner, id).await?;
            let view = json!({
                "secret": &secret.summary,
                "password": secret.password(),
                "notes": &secret.notes,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&view)?)?;
        }
        VaultCommand::Update {
            owner,
            id,
            title,
            password,
            generate,
            length,
            category,
            tags,
            url,
            username,
            notes,
        } => {
            let password = if generate {
                Some(SecretString::new(manager.generate_password(length)?))
            } else {
                password.map(SecretString::new)
            };

            let update = SecretUpdate {
                title,
                password,
                category,
                tags,
                website_url: url,
                username,
                notes,
            };

            let summary = manager.update(owner, id, update).await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        }
        VaultCommand::Delete { owner, id } => {
            manager.delete(owner, id).await?;
            writeln!(out, "Secret deleted successfully")?;
        }
    }
    Ok(())
}

/// Use the given value or prompt for one without echo
fn read_secret(value: Option<String>, prompt: &str) -> anyhow::Result<SecretString> {
    match value {
        Some(v) => Ok(SecretString::new(v)),
        None => {
            let v = rpassword::prompt_password(prompt).context("Failed to read secret")?;
            Ok(SecretString::new(v))
        }
    }
}
