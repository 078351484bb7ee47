use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

use crate::state::wallet::encryption::DEFAULT_PBKDF2_ITERATIONS;

/// The `wallet-payload-crypto` command-line program encrypts and decrypts
/// wallet payloads.
///
/// Results are written to stdout, log output goes to stderr.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about)]
pub struct Args {
    /// Read the wallet password from this environment variable instead of
    /// prompting for it.
    ///
    /// Environment variables are visible to other processes of the same user.
    /// Only use this for testing and automation.
    #[clap(long, global = true, value_name = "VAR")]
    pub password_env: Option<String>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Encrypt plaintext into a base64 payload.
    Encrypt {
        #[clap(long, default_value_t = DEFAULT_PBKDF2_ITERATIONS, value_parser = clap::value_parser!(u32).range(1..))]
        pbkdf2_iterations: u32,

        /// File holding the plaintext. Reads stdin if absent.
        #[clap(value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Decrypt a bare base64 payload.
    Decrypt {
        #[clap(long, default_value_t = DEFAULT_PBKDF2_ITERATIONS, value_parser = clap::value_parser!(u32).range(1..))]
        pbkdf2_iterations: u32,

        /// File holding the payload. Reads stdin if absent.
        #[clap(value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Decrypt stored wallet data, either a JSON envelope or a v1 payload.
    DecryptWallet {
        /// File holding the wallet data. Reads stdin if absent.
        #[clap(value_name = "FILE")]
        input: Option<PathBuf>,
    },

    /// Encrypt plaintext into a verified JSON envelope of the current
    /// version.
    Wrap {
        #[clap(long, default_value_t = DEFAULT_PBKDF2_ITERATIONS, value_parser = clap::value_parser!(u32).range(1..))]
        pbkdf2_iterations: u32,

        /// File holding the plaintext. Reads stdin if absent.
        #[clap(value_name = "FILE")]
        input: Option<PathBuf>,
    },
}

impl Command {
    pub fn input(&self) -> Option<&PathBuf> {
        match self {
            Command::Encrypt { input, .. }
            | Command::Decrypt { input, .. }
            | Command::DecryptWallet { input }
            | Command::Wrap { input, .. } => input.as_ref(),
        }
    }

    /// Whether the command produces ciphertext, and so needs a new password
    pub fn creates_ciphertext(&self) -> bool {
        matches!(self, Command::Encrypt { .. } | Command::Wrap { .. })
    }
}
