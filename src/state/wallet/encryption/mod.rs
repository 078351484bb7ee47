//! Wallet payload encryption using PBKDF2-HMAC-SHA1 + AES-256
//!
//! This module reads and writes the encrypted wallet blob that is stored on
//! the server and exchanged during pairing.
//!
//! ## Format
//!
//! ```text
//! User Password (UTF-8)
//!     ↓ PBKDF2-HMAC-SHA1 (salt = iv, iterations from the envelope)
//! Stretched Key (256 bits)
//!     ↓ AES-256-CBC, ISO10126 padding
//! base64(iv || ciphertext)
//!     ↓ wrapped in a JSON envelope (v2 - v4) or stored bare (v1)
//! Encrypted Wallet Data
//! ```
//!
//! v1 payloads carry no metadata. They are decrypted by trying every known
//! historical recipe in [`LEGACY_V1_RECIPES`] order.
//!
//! ## Usage
//!
//! ```
//! use wallet_payload_crypto::state::wallet::encryption::PayloadCrypto;
//!
//! # fn main() -> anyhow::Result<()> {
//! let crypto = PayloadCrypto::new();
//! let wrapper = crypto.encrypt_and_verify(r#"{"guid":"abc-123"}"#, "correct horse", 5000)?;
//!
//! let stored = wrapper.to_json()?;
//! let wallet_json = crypto.decrypt_wallet(&stored, "correct horse")?;
//! assert_eq!(r#"{"guid":"abc-123"}"#, wallet_json);
//! # Ok(())
//! # }
//! ```

// Re-export public API
pub use cipher::AesCryptor;
pub use cipher::AesOptions;
pub use cipher::BlockMode;
pub use cipher::CipherError;
pub use cipher::NativeAesCryptor;
pub use cipher::Padding;
pub use format::WalletPayloadWrapper;
pub use format::DEFAULT_PBKDF2_ITERATIONS;
pub use format::SUPPORTED_ENCRYPTION_VERSION;
pub use key_stretcher::KeyDerivationError;
pub use key_stretcher::KeyStretcher;
pub use legacy::CipherRecipe;
pub use legacy::LEGACY_V1_RECIPES;
pub use password::PasswordManager;
pub use payload_crypto::PayloadCrypto;
pub use payload_crypto::PayloadCryptoError;

// Internal modules
mod cipher;
mod format;
mod key_stretcher;
mod legacy;
mod password;
mod payload_crypto;
