//! Executes the command-line subcommands against a [`WalletCryptoService`].

use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use tracing::info;

use super::config::cli_args::Args;
use super::config::cli_args::Command;
use crate::state::wallet::encryption::AesCryptor;
use crate::state::wallet::encryption::PasswordManager;
use crate::state::wallet::key_data_pair::KeyDataPair;
use crate::state::wallet::wallet_crypto_service::WalletCryptoService;

/// Read the command input from `path`, or from stdin if no path is given.
pub async fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("could not read input file {}", path.display())),
        None => {
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .context("could not read input from stdin")?;
            Ok(input)
        }
    }
}

/// Run `command` on `input` and return what should be printed.
///
/// Ciphertext inputs are stripped of surrounding whitespace, so payloads
/// saved with a trailing newline still decode. Plaintext is used as is.
pub async fn execute<C: AesCryptor + 'static>(
    service: &WalletCryptoService<C>,
    command: &Command,
    password: String,
    input: String,
) -> Result<String> {
    let output = match command {
        Command::Encrypt {
            pbkdf2_iterations, ..
        } => {
            service
                .encrypt(KeyDataPair::new(password, input), *pbkdf2_iterations)
                .await?
        }
        Command::Decrypt {
            pbkdf2_iterations, ..
        } => {
            let payload = input.trim().to_string();
            service
                .decrypt(KeyDataPair::new(password, payload), *pbkdf2_iterations)
                .await?
        }
        Command::DecryptWallet { .. } => {
            let stored = input.trim().to_string();
            service
                .decrypt_wallet(KeyDataPair::new(password, stored))
                .await?
        }
        Command::Wrap {
            pbkdf2_iterations, ..
        } => service
            .encrypt_and_verify(KeyDataPair::new(password, input), *pbkdf2_iterations)
            .await?
            .to_json()?,
    };

    Ok(output)
}

/// Entry point of the command-line program
pub async fn run(args: Args) -> Result<()> {
    let input = read_input(args.command.input().map(|p| p.as_path())).await?;
    debug!("read {} bytes of input", input.len());

    let env_var = args.password_env.as_deref();
    let password = match env_var {
        None if args.command.creates_ciphertext() => PasswordManager::prompt_new_password()?,
        _ => PasswordManager::obtain(env_var, "Enter wallet password: ")?,
    };

    let service = WalletCryptoService::default();
    let output = execute(&service, &args.command, password, input).await?;
    info!("{:?} completed", args.command);

    let mut stdout = tokio::io::stdout();
    stdout.write_all(output.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;

    Ok(())
}
