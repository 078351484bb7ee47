//! Versioned wallet payload envelope
//!
//! Wallet payloads from v2 onwards are stored inside a small JSON envelope:
//!
//! ```json
//! { "version": 4, "payload": "<base64 ciphertext>", "pbkdf2_iterations": 5000 }
//! ```
//!
//! The field names are shared with the server and older clients.

use serde::Deserialize;
use serde::Serialize;

use super::payload_crypto::PayloadCryptoError;

/// Highest envelope version this crate can decrypt
pub const SUPPORTED_ENCRYPTION_VERSION: u32 = 4;

/// Envelope version written when a wallet is (re-)encrypted
pub const CURRENT_ENCRYPTION_VERSION: u32 = SUPPORTED_ENCRYPTION_VERSION;

/// Default PBKDF2 iteration count for newly encrypted wallets
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 5000;

/// Versioned envelope around an encrypted wallet payload (v2 - v4)
///
/// The iteration count travels with the payload so that old payloads stay
/// readable when the default count changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletPayloadWrapper {
    pub version: u32,

    /// base64(iv || ciphertext)
    pub payload: String,

    #[serde(rename = "pbkdf2_iterations")]
    pub pbkdf2_iteration_count: u32,
}

impl WalletPayloadWrapper {
    pub fn new(version: u32, payload: String, pbkdf2_iteration_count: u32) -> Self {
        Self {
            version,
            payload,
            pbkdf2_iteration_count,
        }
    }

    /// Parse an envelope from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the envelope to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// fails with [`PayloadCryptoError::UnsupportedPayloadVersion`] for
    /// versions newer than [`SUPPORTED_ENCRYPTION_VERSION`]
    pub fn validate_version(&self) -> Result<(), PayloadCryptoError> {
        match self.version <= SUPPORTED_ENCRYPTION_VERSION {
            true => Ok(()),
            false => Err(PayloadCryptoError::UnsupportedPayloadVersion),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope() {
        let json = r#"{"version":3,"payload":"c2VjcmV0","pbkdf2_iterations":5000}"#;
        let wrapper = WalletPayloadWrapper::from_json(json).unwrap();

        assert_eq!(WalletPayloadWrapper::new(3, "c2VjcmV0".to_string(), 5000), wrapper);
    }

    #[test]
    fn test_envelope_json_field_names() {
        let wrapper = WalletPayloadWrapper::new(4, "abc".to_string(), 10);
        let value: serde_json::Value = serde_json::from_str(&wrapper.to_json().unwrap()).unwrap();

        assert_eq!(4, value["version"]);
        assert_eq!("abc", value["payload"]);
        assert_eq!(10, value["pbkdf2_iterations"]);
    }

    #[test]
    fn test_bare_base64_is_not_an_envelope() {
        assert!(WalletPayloadWrapper::from_json("U2FsdGVkX19zZWNyZXQ=").is_err());
    }

    #[test]
    fn test_missing_iterations_is_not_an_envelope() {
        assert!(WalletPayloadWrapper::from_json(r#"{"version":2,"payload":"abc"}"#).is_err());
    }

    #[test]
    fn test_version_validation() {
        for version in 1..=SUPPORTED_ENCRYPTION_VERSION {
            let wrapper = WalletPayloadWrapper::new(version, String::new(), 1);
            assert!(wrapper.validate_version().is_ok());
        }

        let wrapper = WalletPayloadWrapper::new(5, String::new(), 1);
        assert_eq!(
            Err(PayloadCryptoError::UnsupportedPayloadVersion),
            wrapper.validate_version()
        );
    }
}
