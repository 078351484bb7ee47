pub mod encryption;
pub mod key_data_pair;
pub mod wallet_crypto_service;
