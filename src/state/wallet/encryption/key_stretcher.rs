//! PBKDF2-HMAC-SHA1 password stretching for wallet payloads
//!
//! The wallet format derives its AES key from the user's password with
//! PBKDF2-HMAC-SHA1, salted with the payload's initialization vector.

use hmac::Hmac;
use sha1::Sha1;
use zeroize::Zeroizing;

/// The smallest key the stretcher will ever produce, in bits.
pub const MIN_KEY_LENGTH_BITS: usize = 256;

/// represents a password stretching error
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum KeyDerivationError {
    #[error("pbkdf2 iteration count must be greater than zero")]
    InvalidIterationCount,

    #[error("pbkdf2 key derivation failed")]
    DerivationFailed,
}

/// Derives symmetric keys from user passwords
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyStretcher;

impl KeyStretcher {
    /// Stretch `password` into a key using PBKDF2-HMAC-SHA1
    ///
    /// The key length is floored at [`MIN_KEY_LENGTH_BITS`]: asking for a
    /// 128 bit key yields the same 32 byte key as asking for 256 bits.
    /// Existing wallets depend on this.
    pub fn stretch(
        password: &str,
        salt: &[u8],
        iterations: u32,
        key_length_bits: usize,
    ) -> Result<Zeroizing<Vec<u8>>, KeyDerivationError> {
        if iterations == 0 {
            return Err(KeyDerivationError::InvalidIterationCount);
        }

        let mut key = Zeroizing::new(vec![0u8; Self::key_length_bytes(key_length_bits)]);
        pbkdf2::pbkdf2::<Hmac<Sha1>>(password.as_bytes(), salt, iterations, &mut key)
            .map_err(|_| KeyDerivationError::DerivationFailed)?;

        Ok(key)
    }

    /// number of key bytes produced for a requested key length in bits
    pub fn key_length_bytes(key_length_bits: usize) -> usize {
        key_length_bits.max(MIN_KEY_LENGTH_BITS) / 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_derivation() {
        let salt = [42u8; 16];

        let k1 = KeyStretcher::stretch("correct-horse-battery-staple", &salt, 10, 256).unwrap();
        let k2 = KeyStretcher::stretch("correct-horse-battery-staple", &salt, 10, 256).unwrap();

        assert_eq!(k1, k2);
    }

    #[test]
    fn test_different_passwords_different_keys() {
        let salt = [42u8; 16];

        let k1 = KeyStretcher::stretch("password1", &salt, 10, 256).unwrap();
        let k2 = KeyStretcher::stretch("password2", &salt, 10, 256).unwrap();

        assert_ne!(k1, k2);
    }

    #[test]
    fn test_different_salts_different_keys() {
        let k1 = KeyStretcher::stretch("same-password", &[1u8; 16], 10, 256).unwrap();
        let k2 = KeyStretcher::stretch("same-password", &[2u8; 16], 10, 256).unwrap();

        assert_ne!(k1, k2);
    }

    #[test]
    fn test_iteration_count_changes_key() {
        let salt = [7u8; 16];

        let k1 = KeyStretcher::stretch("password", &salt, 1, 256).unwrap();
        let k10 = KeyStretcher::stretch("password", &salt, 10, 256).unwrap();

        assert_ne!(k1, k10);
    }

    #[test]
    fn test_key_length_is_floored_at_256_bits() {
        let salt = [3u8; 16];

        let short = KeyStretcher::stretch("password", &salt, 5, 128).unwrap();
        let full = KeyStretcher::stretch("password", &salt, 5, 256).unwrap();

        assert_eq!(32, short.len());
        assert_eq!(short.len(), full.len());
        assert_eq!(short, full);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let result = KeyStretcher::stretch("password", &[0u8; 16], 0, 256);
        assert_eq!(Err(KeyDerivationError::InvalidIterationCount), result);
    }

    // RFC 6070 test vector 2: "password" / "salt", 2 iterations.
    #[test]
    fn test_rfc6070_vector_prefix() {
        let key = KeyStretcher::stretch("password", b"salt", 2, 256).unwrap();
        let expected_prefix: [u8; 20] = [
            0xea, 0x6c, 0x01, 0x4d, 0xc7, 0x2d, 0x6f, 0x8c, 0xcd, 0x1e, 0xd9, 0x2a, 0xce, 0x1d,
            0x41, 0xf0, 0xd8, 0xde, 0x89, 0x57,
        ];
        assert_eq!(&expected_prefix, &key[..20]);
    }
}
