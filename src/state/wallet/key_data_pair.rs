use serde::Deserialize;
use serde::Serialize;

/// Key material paired with the data it should transform
///
/// Uniform input for the encrypt / decrypt operations of
/// [`WalletCryptoService`](super::wallet_crypto_service::WalletCryptoService).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyDataPair<K, D> {
    pub key: K,
    pub data: D,
}

impl<K, D> KeyDataPair<K, D> {
    pub fn new(key: K, data: D) -> Self {
        Self { key, data }
    }
}
