//! Encryption and decryption of wallet payloads
//!
//! Passwords are stretched with PBKDF2-HMAC-SHA1 and payloads are encrypted
//! with AES-256. Stored wallets come either wrapped in a versioned JSON
//! envelope or, for the oldest wallets, as a bare v1 payload. See
//! [`state::wallet::encryption`] for the format.

pub mod application;
pub mod state;

use anyhow::Result;

use crate::application::config::cli_args;

/// Run the command given on the command line
pub async fn initialize(args: cli_args::Args) -> Result<()> {
    application::command::run(args).await
}
