//! Encryption and decryption of wallet payloads
//!
//! Blob layout: `base64(iv || ciphertext)`. The 16 byte IV is also the PBKDF2
//! salt used to stretch the password.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::Rng;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use super::cipher::AesCryptor;
use super::cipher::AesOptions;
use super::cipher::NativeAesCryptor;
use super::cipher::BLOCK_LEN;
use super::format::WalletPayloadWrapper;
use super::format::CURRENT_ENCRYPTION_VERSION;
use super::key_stretcher::KeyDerivationError;
use super::key_stretcher::KeyStretcher;
use super::legacy;
use super::legacy::LEGACY_V1_RECIPES;

/// Length of the IV prepended to every ciphertext. Doubles as the salt length.
pub const SALT_LEN: usize = BLOCK_LEN;

/// Requested length of the stretched AES key
pub const KEY_LENGTH_BITS: usize = 256;

/// enumerates possible payload encryption and decryption errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[non_exhaustive]
pub enum PayloadCryptoError {
    #[error("unknown payload crypto error")]
    Unknown,

    #[error("no encrypted wallet data")]
    NoEncryptedWalletData,

    #[error("no password")]
    NoPassword,

    #[error("pbkdf2 iteration count must be greater than zero")]
    InvalidPbkdf2Iterations,

    #[error("key derivation failed")]
    KeyDerivationFailed,

    #[error("payload could not be decoded")]
    DecodingFailed,

    #[error("unsupported payload version")]
    UnsupportedPayloadVersion,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decryption failed")]
    DecryptionFailed,

    #[error("failed to decrypt v1 payload")]
    FailedToDecryptV1Payload,

    #[error("encrypted payload did not decrypt back to the original")]
    VerificationFailed,
}

impl From<KeyDerivationError> for PayloadCryptoError {
    fn from(e: KeyDerivationError) -> Self {
        match e {
            KeyDerivationError::InvalidIterationCount => Self::InvalidPbkdf2Iterations,
            KeyDerivationError::DerivationFailed => Self::KeyDerivationFailed,
        }
    }
}

/// Password-based wallet payload encryption
///
/// Stateless apart from the injected [`AesCryptor`]. Construct one at startup
/// and share it.
#[derive(Debug, Clone, Default)]
pub struct PayloadCrypto<C: AesCryptor = NativeAesCryptor> {
    cryptor: C,
}

impl PayloadCrypto {
    pub fn new() -> Self {
        Self::with_cryptor(NativeAesCryptor)
    }
}

impl<C: AesCryptor> PayloadCrypto<C> {
    pub fn with_cryptor(cryptor: C) -> Self {
        Self { cryptor }
    }

    pub fn cryptor(&self) -> &C {
        &self.cryptor
    }

    /// Decrypt a base64 payload with AES-CBC and ISO10126 padding
    pub fn decrypt(
        &self,
        data_base64: &str,
        key: &str,
        pbkdf2_iterations: u32,
    ) -> Result<String, PayloadCryptoError> {
        self.decrypt_with_options(data_base64, key, pbkdf2_iterations, AesOptions::default())
    }

    /// Decrypt a base64 payload with an explicit block mode and padding
    pub fn decrypt_with_options(
        &self,
        data_base64: &str,
        key: &str,
        pbkdf2_iterations: u32,
        options: AesOptions,
    ) -> Result<String, PayloadCryptoError> {
        if pbkdf2_iterations == 0 {
            return Err(PayloadCryptoError::InvalidPbkdf2Iterations);
        }

        let data = BASE64
            .decode(data_base64)
            .map_err(|_| PayloadCryptoError::DecodingFailed)?;
        // an iv without ciphertext would decrypt to "" under OFB
        if data.len() <= SALT_LEN {
            return Err(PayloadCryptoError::DecodingFailed);
        }

        // 1. separate iv from ciphertext. the iv is also the pbkdf2 salt.
        let (iv, ciphertext) = data.split_at(SALT_LEN);

        // 2. stretch password
        let stretched = KeyStretcher::stretch(key, iv, pbkdf2_iterations, KEY_LENGTH_BITS)?;

        // 3. decrypt
        self.cryptor
            .decrypt_utf8(ciphertext, &stretched, iv, options)
            .map_err(|_| PayloadCryptoError::DecryptionFailed)
    }

    /// Encrypt a UTF-8 payload with AES-CBC and ISO10126 padding
    ///
    /// Returns `base64(iv || ciphertext)` with a fresh random iv.
    pub fn encrypt(
        &self,
        payload: &str,
        key: &str,
        pbkdf2_iterations: u32,
    ) -> Result<String, PayloadCryptoError> {
        self.encrypt_with_options(payload, key, pbkdf2_iterations, AesOptions::default())
    }

    /// Only [`AesOptions::default`] is ever written. Other options are used to
    /// build legacy fixtures.
    pub(crate) fn encrypt_with_options(
        &self,
        payload: &str,
        key: &str,
        pbkdf2_iterations: u32,
        options: AesOptions,
    ) -> Result<String, PayloadCryptoError> {
        if pbkdf2_iterations == 0 {
            return Err(PayloadCryptoError::InvalidPbkdf2Iterations);
        }

        let iv = Self::random_iv();
        let stretched = KeyStretcher::stretch(key, &iv, pbkdf2_iterations, KEY_LENGTH_BITS)?;

        let ciphertext = self
            .cryptor
            .encrypt(payload.as_bytes(), &stretched, &iv, options)
            .map_err(|_| PayloadCryptoError::EncryptionFailed)?;

        Ok(BASE64.encode([iv.as_slice(), ciphertext.as_slice()].concat()))
    }

    /// Decrypt a stored wallet payload of unknown version
    ///
    /// JSON envelopes (v2 - v4) are decrypted with the iteration count they
    /// carry. Anything that does not parse as an envelope is treated as a v1
    /// payload and run through the legacy recipes.
    pub fn decrypt_wallet(
        &self,
        encrypted_wallet_data: &str,
        password: &str,
    ) -> Result<String, PayloadCryptoError> {
        if encrypted_wallet_data.is_empty() {
            return Err(PayloadCryptoError::NoEncryptedWalletData);
        }
        if password.is_empty() {
            return Err(PayloadCryptoError::NoPassword);
        }

        match WalletPayloadWrapper::from_json(encrypted_wallet_data) {
            Ok(wrapper) => self.decrypt_wallet_wrapper(&wrapper, password),
            Err(e) => {
                debug!("wallet data is not a versioned envelope ({}); trying v1", e);
                self.decrypt_v1(encrypted_wallet_data, password)
            }
        }
    }

    /// Decrypt an already parsed v2 - v4 envelope
    pub fn decrypt_wallet_wrapper(
        &self,
        wallet_wrapper: &WalletPayloadWrapper,
        password: &str,
    ) -> Result<String, PayloadCryptoError> {
        wallet_wrapper.validate_version().inspect_err(|_| {
            warn!(
                "wallet payload version {} is not supported",
                wallet_wrapper.version
            )
        })?;

        self.decrypt(
            &wallet_wrapper.payload,
            password,
            wallet_wrapper.pbkdf2_iteration_count,
        )
    }

    /// Encrypt `payload` into a current-version envelope
    pub fn encrypt_wallet(
        &self,
        payload: &str,
        password: &str,
        pbkdf2_iterations: u32,
    ) -> Result<WalletPayloadWrapper, PayloadCryptoError> {
        let encrypted = self.encrypt(payload, password, pbkdf2_iterations)?;
        Ok(WalletPayloadWrapper::new(
            CURRENT_ENCRYPTION_VERSION,
            encrypted,
            pbkdf2_iterations,
        ))
    }

    /// Encrypt `payload` into an envelope and check that it decrypts back to
    /// `payload` before handing it out.
    pub fn encrypt_and_verify(
        &self,
        payload: &str,
        password: &str,
        pbkdf2_iterations: u32,
    ) -> Result<WalletPayloadWrapper, PayloadCryptoError> {
        let wrapper = self.encrypt_wallet(payload, password, pbkdf2_iterations)?;

        match self.decrypt_wallet_wrapper(&wrapper, password) {
            Ok(decrypted) if decrypted == payload => Ok(wrapper),
            Ok(_) => Err(PayloadCryptoError::VerificationFailed),
            Err(e) => {
                warn!("freshly encrypted payload failed to decrypt: {}", e);
                Err(PayloadCryptoError::VerificationFailed)
            }
        }
    }

    fn decrypt_v1(&self, payload: &str, password: &str) -> Result<String, PayloadCryptoError> {
        legacy::first_successful(&LEGACY_V1_RECIPES, |recipe| {
            self.decrypt_with_options(payload, password, recipe.pbkdf2_iterations, recipe.options)
        })
        .map(|(index, decrypted)| {
            debug!("decrypted v1 payload with recipe {}", index);
            decrypted
        })
        .ok_or(PayloadCryptoError::FailedToDecryptV1Payload)
    }

    fn random_iv() -> [u8; SALT_LEN] {
        let mut iv = [0u8; SALT_LEN];
        rand::rng().fill(&mut iv);
        iv
    }
}
