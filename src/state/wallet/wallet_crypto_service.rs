//! Async facade over [`PayloadCrypto`] for wallet unlock, second password
//! re-encryption and pairing flows.

use std::sync::Arc;

use tokio::task;
use tracing::error;
use tracing::instrument;
use tracing::warn;

use super::encryption::AesCryptor;
use super::encryption::NativeAesCryptor;
use super::encryption::PayloadCrypto;
use super::encryption::PayloadCryptoError;
use super::encryption::WalletPayloadWrapper;
use super::key_data_pair::KeyDataPair;

/// Runs payload encryption and decryption off the async executor
///
/// PBKDF2 is CPU bound, so every operation is moved to the blocking thread
/// pool and resolves exactly once. Cloning is cheap; all clones share one
/// [`PayloadCrypto`].
#[derive(Debug)]
pub struct WalletCryptoService<C: AesCryptor = NativeAesCryptor> {
    payload_crypto: Arc<PayloadCrypto<C>>,
}

impl<C: AesCryptor> Clone for WalletCryptoService<C> {
    fn clone(&self) -> Self {
        Self {
            payload_crypto: Arc::clone(&self.payload_crypto),
        }
    }
}

impl Default for WalletCryptoService {
    fn default() -> Self {
        Self::new(PayloadCrypto::new())
    }
}

impl<C: AesCryptor + 'static> WalletCryptoService<C> {
    pub fn new(payload_crypto: PayloadCrypto<C>) -> Self {
        Self {
            payload_crypto: Arc::new(payload_crypto),
        }
    }

    pub fn payload_crypto(&self) -> &PayloadCrypto<C> {
        &self.payload_crypto
    }

    /// Decrypt `pair.data` (base64 payload) with password `pair.key`
    #[instrument(level = "debug", skip_all, fields(pbkdf2_iterations = pbkdf2_iterations))]
    pub async fn decrypt(
        &self,
        pair: KeyDataPair<String, String>,
        pbkdf2_iterations: u32,
    ) -> Result<String, PayloadCryptoError> {
        self.run("decrypt", move |crypto| {
            crypto.decrypt(&pair.data, &pair.key, pbkdf2_iterations)
        })
        .await
    }

    /// Encrypt `pair.data` (plaintext) with password `pair.key`
    #[instrument(level = "debug", skip_all, fields(pbkdf2_iterations = pbkdf2_iterations))]
    pub async fn encrypt(
        &self,
        pair: KeyDataPair<String, String>,
        pbkdf2_iterations: u32,
    ) -> Result<String, PayloadCryptoError> {
        self.run("encrypt", move |crypto| {
            crypto.encrypt(&pair.data, &pair.key, pbkdf2_iterations)
        })
        .await
    }

    /// Decrypt stored wallet data `pair.data` of any version with password
    /// `pair.key`
    #[instrument(level = "debug", skip_all)]
    pub async fn decrypt_wallet(
        &self,
        pair: KeyDataPair<String, String>,
    ) -> Result<String, PayloadCryptoError> {
        self.run("decrypt_wallet", move |crypto| {
            crypto.decrypt_wallet(&pair.data, &pair.key)
        })
        .await
    }

    /// Encrypt `pair.data` (plaintext) with password `pair.key` into a
    /// current-version envelope, verified by decrypting it again
    #[instrument(level = "debug", skip_all, fields(pbkdf2_iterations = pbkdf2_iterations))]
    pub async fn encrypt_and_verify(
        &self,
        pair: KeyDataPair<String, String>,
        pbkdf2_iterations: u32,
    ) -> Result<WalletPayloadWrapper, PayloadCryptoError> {
        self.run("encrypt_and_verify", move |crypto| {
            crypto.encrypt_and_verify(&pair.data, &pair.key, pbkdf2_iterations)
        })
        .await
    }

    async fn run<T, F>(&self, operation: &str, f: F) -> Result<T, PayloadCryptoError>
    where
        T: Send + 'static,
        F: FnOnce(&PayloadCrypto<C>) -> Result<T, PayloadCryptoError> + Send + 'static,
    {
        let crypto = Arc::clone(&self.payload_crypto);

        let result = match task::spawn_blocking(move || f(&crypto)).await {
            Ok(result) => result,
            Err(e) => {
                error!("wallet crypto {} task failed: {}", operation, e);
                Err(PayloadCryptoError::Unknown)
            }
        };

        if let Err(e) = &result {
            warn!("wallet crypto {} failed: {}", operation, e);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    const WALLET_JSON: &str = r#"{"guid":"abc-123"}"#;

    #[tokio::test]
    async fn encrypt_then_decrypt() {
        let service = WalletCryptoService::default();

        let encrypted = service
            .encrypt(
                KeyDataPair::new("correct horse".to_string(), WALLET_JSON.to_string()),
                5000,
            )
            .await
            .unwrap();
        let decrypted = service
            .decrypt(KeyDataPair::new("correct horse".to_string(), encrypted), 5000)
            .await
            .unwrap();

        assert_eq!(WALLET_JSON, decrypted);
    }

    #[traced_test]
    #[tokio::test]
    async fn wrong_password_is_reported_and_logged() {
        let service = WalletCryptoService::default();

        let encrypted = service
            .encrypt(
                KeyDataPair::new("correct horse".to_string(), WALLET_JSON.to_string()),
                100,
            )
            .await
            .unwrap();
        let result = service
            .decrypt(KeyDataPair::new("wrong horse".to_string(), encrypted), 100)
            .await;

        assert_eq!(Err(PayloadCryptoError::DecryptionFailed), result);
        assert!(logs_contain("wallet crypto decrypt failed"));
        assert!(!logs_contain("wrong horse"));
    }

    #[tokio::test]
    async fn zero_iterations_rejected() {
        let service = WalletCryptoService::default();

        let result = service
            .encrypt(KeyDataPair::new("pw".to_string(), WALLET_JSON.to_string()), 0)
            .await;

        assert_eq!(Err(PayloadCryptoError::InvalidPbkdf2Iterations), result);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn clones_share_payload_crypto() {
        let service = WalletCryptoService::default();
        let wrapper = service
            .payload_crypto()
            .encrypt_wallet(WALLET_JSON, "correct horse", 10)
            .unwrap();
        let stored = wrapper.to_json().unwrap();

        let handles = (0..4)
            .map(|_| {
                let service = service.clone();
                let stored = stored.clone();
                tokio::spawn(async move {
                    service
                        .decrypt_wallet(KeyDataPair::new("correct horse".to_string(), stored))
                        .await
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            assert_eq!(WALLET_JSON, handle.await.unwrap().unwrap());
        }
    }

    #[tokio::test]
    async fn encrypt_and_verify_then_decrypt_wallet() {
        let service = WalletCryptoService::default();

        let wrapper = service
            .encrypt_and_verify(
                KeyDataPair::new("correct horse".to_string(), WALLET_JSON.to_string()),
                5000,
            )
            .await
            .unwrap();
        assert_eq!(4, wrapper.version);

        let decrypted = service
            .decrypt_wallet(KeyDataPair::new(
                "correct horse".to_string(),
                wrapper.to_json().unwrap(),
            ))
            .await
            .unwrap();
        assert_eq!(WALLET_JSON, decrypted);
    }

    #[tokio::test]
    async fn decrypt_wallet_rejects_future_versions() {
        let service = WalletCryptoService::default();
        let stored = WalletPayloadWrapper::new(5, "c2VjcmV0".to_string(), 10)
            .to_json()
            .unwrap();

        let result = service
            .decrypt_wallet(KeyDataPair::new("correct horse".to_string(), stored))
            .await;

        assert_eq!(Err(PayloadCryptoError::UnsupportedPayloadVersion), result);
    }
}
