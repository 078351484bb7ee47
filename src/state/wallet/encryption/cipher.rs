//! AES block cipher adapter for wallet payloads
//!
//! Current payloads use AES-256-CBC with ISO10126 padding. OFB and the
//! ISO7816-4 / unpadded variants exist only to read first generation
//! payloads written by old clients.

use aes::Aes256;
use cbc::cipher::block_padding;
use cbc::cipher::block_padding::RawPadding;
use cbc::cipher::BlockDecryptMut;
use cbc::cipher::BlockEncryptMut;
use cbc::cipher::KeyIvInit;
use cbc::cipher::StreamCipher;
use serde::Deserialize;
use serde::Serialize;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256Ofb = ofb::Ofb<Aes256>;

/// AES block length in bytes. Also the IV length.
pub const BLOCK_LEN: usize = 16;

/// represents a block cipher failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CipherError {
    #[error("invalid AES key or initialization vector length")]
    InvalidKeyOrIv,

    #[error("input is not a multiple of the AES block length")]
    Misaligned,

    #[error("invalid padding")]
    BadPadding,

    #[error("decrypted payload is not valid UTF-8")]
    InvalidUtf8,
}

/// AES chaining mode
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum BlockMode {
    #[strum(serialize = "CBC")]
    Cbc,
    #[strum(serialize = "OFB")]
    Ofb,
}

/// Padding applied to the final plaintext block
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Padding {
    #[strum(serialize = "ISO10126")]
    Iso10126,

    /// ISO/IEC 7816-4, which is the same as ISO/IEC 9797-1 method 2
    #[strum(serialize = "ISO7816-4")]
    Iso78164,

    #[strum(serialize = "no padding")]
    NoPadding,
}

impl Padding {
    /// pad `buf` up to the next block boundary. A full block of padding is
    /// added when `buf` is already aligned.
    fn pad(self, buf: &mut Vec<u8>) {
        let pos = buf.len() % BLOCK_LEN;
        let start = buf.len() - pos;
        let mut block = [0u8; BLOCK_LEN];
        block[..pos].copy_from_slice(&buf[start..]);

        match self {
            Padding::Iso10126 => block_padding::Iso10126::raw_pad(&mut block, pos),
            Padding::Iso78164 => block_padding::Iso7816::raw_pad(&mut block, pos),
            Padding::NoPadding => return,
        }

        buf.truncate(start);
        buf.extend_from_slice(&block);
    }

    /// strip padding from the final block of `buf`
    fn unpad(self, buf: &mut Vec<u8>) -> Result<(), CipherError> {
        if self == Padding::NoPadding {
            return Ok(());
        }
        if buf.is_empty() || buf.len() % BLOCK_LEN != 0 {
            return Err(CipherError::BadPadding);
        }

        let start = buf.len() - BLOCK_LEN;
        let last_block = &buf[start..];
        let kept = match self {
            Padding::Iso10126 => block_padding::Iso10126::raw_unpad(last_block),
            Padding::Iso78164 => block_padding::Iso7816::raw_unpad(last_block),
            Padding::NoPadding => Ok(last_block),
        }
        .map_err(|_| CipherError::BadPadding)?
        .len();

        buf.truncate(start + kept);
        Ok(())
    }
}

/// Block mode and padding used for one encryption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AesOptions {
    pub block_mode: BlockMode,
    pub padding: Padding,
}

impl AesOptions {
    pub const fn new(block_mode: BlockMode, padding: Padding) -> Self {
        Self {
            block_mode,
            padding,
        }
    }
}

impl Default for AesOptions {
    /// CBC + ISO10126, the format of every versioned wallet payload
    fn default() -> Self {
        Self::new(BlockMode::Cbc, Padding::Iso10126)
    }
}

impl std::fmt::Display for AesOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.block_mode, self.padding)
    }
}

/// AES encryption primitive used by [`PayloadCrypto`](super::PayloadCrypto)
///
/// Implementations must be pure: no state may survive between calls.
pub trait AesCryptor: Send + Sync {
    fn encrypt(
        &self,
        plaintext: &[u8],
        key: &[u8],
        iv: &[u8],
        options: AesOptions,
    ) -> Result<Vec<u8>, CipherError>;

    fn decrypt(
        &self,
        ciphertext: &[u8],
        key: &[u8],
        iv: &[u8],
        options: AesOptions,
    ) -> Result<Vec<u8>, CipherError>;

    /// decrypt and interpret the plaintext as UTF-8
    fn decrypt_utf8(
        &self,
        ciphertext: &[u8],
        key: &[u8],
        iv: &[u8],
        options: AesOptions,
    ) -> Result<String, CipherError> {
        let plaintext = self.decrypt(ciphertext, key, iv, options)?;
        String::from_utf8(plaintext).map_err(|_| CipherError::InvalidUtf8)
    }
}

/// AES-256 via the RustCrypto `aes`, `cbc` and `ofb` crates
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeAesCryptor;

impl AesCryptor for NativeAesCryptor {
    fn encrypt(
        &self,
        plaintext: &[u8],
        key: &[u8],
        iv: &[u8],
        options: AesOptions,
    ) -> Result<Vec<u8>, CipherError> {
        let mut buf = plaintext.to_vec();
        match options.block_mode {
            BlockMode::Cbc => {
                options.padding.pad(&mut buf);
                if buf.len() % BLOCK_LEN != 0 {
                    return Err(CipherError::Misaligned);
                }
                let cipher = Aes256CbcEnc::new_from_slices(key, iv)
                    .map_err(|_| CipherError::InvalidKeyOrIv)?;
                Ok(cipher.encrypt_padded_vec_mut::<block_padding::NoPadding>(&buf))
            }
            BlockMode::Ofb => {
                let mut cipher =
                    Aes256Ofb::new_from_slices(key, iv).map_err(|_| CipherError::InvalidKeyOrIv)?;
                options.padding.pad(&mut buf);
                cipher.apply_keystream(&mut buf);
                Ok(buf)
            }
        }
    }

    fn decrypt(
        &self,
        ciphertext: &[u8],
        key: &[u8],
        iv: &[u8],
        options: AesOptions,
    ) -> Result<Vec<u8>, CipherError> {
        let mut buf = match options.block_mode {
            BlockMode::Cbc => {
                if ciphertext.len() % BLOCK_LEN != 0 {
                    return Err(CipherError::Misaligned);
                }
                let cipher = Aes256CbcDec::new_from_slices(key, iv)
                    .map_err(|_| CipherError::InvalidKeyOrIv)?;
                cipher
                    .decrypt_padded_vec_mut::<block_padding::NoPadding>(ciphertext)
                    .map_err(|_| CipherError::Misaligned)?
            }
            BlockMode::Ofb => {
                let mut cipher =
                    Aes256Ofb::new_from_slices(key, iv).map_err(|_| CipherError::InvalidKeyOrIv)?;
                let mut buf = ciphertext.to_vec();
                cipher.apply_keystream(&mut buf);
                buf
            }
        };

        options.padding.unpad(&mut buf)?;
        Ok(buf)
    }
}
