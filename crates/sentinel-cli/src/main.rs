//! Sentinel Prime CLI - encrypted password vault
//!
//! Reads the operator secret from `ENCRYPTION_KEY` and refuses to run any
//! command without it. Vault records live in a JSON file under
//! `SENTINEL_DATA_DIR` (or the platform data directory).

mod commands;

use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info};

use commands::Command;
use sentinel_core::{FileStorage, RecordStorage, SentinelError, Settings, VaultManager};

/// Sentinel Prime - per-secret encrypted password vault
#[derive(Parser, Debug)]
#[command(name = "sentinel-prime")]
#[command(version)]
#[command(about = "Sentinel Prime - encrypted password vault and password generator")]
struct Args {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr so command output on stdout stays machine-readable
    let default_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("Command failed: {:#}", e);
            eprintln!("Error: {}", user_message(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    // Derive the key before doing anything else so a missing secret stops us here
    let cipher = match settings.cipher() {
        Ok(cipher) => Arc::new(cipher),
        Err(e) => {
            error!("Refusing to start: {}", e);
            return Err(e.into());
        }
    };
    info!("Vault key ready ({})", cipher.derivation());

    let mut out = std::io::stdout().lock();

    match args.command {
        Command::Vault(command) => {
            let storage = FileStorage::open(settings.data_dir()?).await?;
            debug!("Using {} at {:?}", storage.backend_name(), storage.storage_dir());

            let manager = VaultManager::new(Arc::new(storage), cipher);
            commands::run_vault(command, &manager, &mut out).await
        }
        command => commands::run_cipher(command, &cipher, &mut out),
    }
}

/// Text shown to the user for a failed command
///
/// Configuration problems and errors caused by the caller's input are reported
/// verbatim; every other core error is reduced to its generic public message.
fn user_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<SentinelError>() {
        Some(e) if e.is_client_error() || matches!(e, SentinelError::Configuration(_)) => {
            e.to_string()
        }
        Some(e) => e.public_message().to_string(),
        None => format!("{:#}", err),
    }
}
