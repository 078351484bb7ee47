use divan::Bencher;
use wallet_payload_crypto::state::wallet::encryption::PayloadCrypto;
use wallet_payload_crypto::state::wallet::encryption::DEFAULT_PBKDF2_ITERATIONS;

fn main() {
    divan::main();
}

const WALLET_JSON: &str = r#"{"guid":"abc-123","sharedKey":"k","keys":[]}"#;
const PASSWORD: &str = "correct horse battery staple";

mod payload_crypto {
    use super::*;

    #[divan::bench(args = [1, 10, DEFAULT_PBKDF2_ITERATIONS])]
    fn encrypt(bencher: Bencher, pbkdf2_iterations: u32) {
        let crypto = PayloadCrypto::new();

        bencher.bench_local(|| crypto.encrypt(WALLET_JSON, PASSWORD, pbkdf2_iterations));
    }

    #[divan::bench(args = [1, 10, DEFAULT_PBKDF2_ITERATIONS])]
    fn decrypt(bencher: Bencher, pbkdf2_iterations: u32) {
        let crypto = PayloadCrypto::new();
        let encrypted = crypto
            .encrypt(WALLET_JSON, PASSWORD, pbkdf2_iterations)
            .unwrap();

        bencher.bench_local(|| crypto.decrypt(&encrypted, PASSWORD, pbkdf2_iterations));
    }

    /// Worst case for stored v1 wallets: a wrong password runs every recipe.
    #[divan::bench]
    fn decrypt_wallet_v1_exhausted(bencher: Bencher) {
        let crypto = PayloadCrypto::new();
        let encrypted = crypto.encrypt(WALLET_JSON, PASSWORD, 10).unwrap();

        bencher.bench_local(|| crypto.decrypt_wallet(&encrypted, "hunter2"));
    }
}
