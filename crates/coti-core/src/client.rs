//! Wallet client seam
//!
//! Every blockchain-facing operation (signing, MPC encryption, transaction
//! submission, contract calls) is delegated through [`WalletClient`]. This
//! crate ships only the trait and a deterministic mock; production
//! implementations live with the node integration, not here.

use async_trait::async_trait;
use sha3::{Digest, Keccak256};

use crate::error::{CotiError, Result};

/// A freshly generated address/signing-key pair
#[derive(Debug, Clone)]
pub struct Keypair {
    pub address: String,
    pub signing_key: String,
}

/// Receipt for a submitted transaction
#[derive(Debug, Clone)]
pub struct TxReceipt {
    pub hash: String,
}

/// Capability surface of the external blockchain SDK.
///
/// Implementations sign, encrypt under a per-account AES key, submit
/// transactions, and call contract methods, given a signing key and
/// (where relevant) the account's symmetric key.
#[async_trait]
pub trait WalletClient: Send + Sync {
    /// Native balance of `address` in wei.
    async fn get_balance(&self, address: &str) -> Result<u128>;

    /// Sign an arbitrary message with `signing_key`.
    async fn sign_message(&self, signing_key: &str, message: &str) -> Result<String>;

    /// Encrypt `value` for a confidential contract call.
    async fn encrypt_value(
        &self,
        signing_key: &str,
        symmetric_key: &str,
        value: &str,
        contract_address: &str,
        function_selector: &str,
    ) -> Result<String>;

    /// Decrypt a ciphertext previously produced for this account.
    async fn decrypt_value(
        &self,
        signing_key: &str,
        symmetric_key: &str,
        ciphertext: &str,
    ) -> Result<String>;

    /// Submit a native-value transfer.
    async fn send_transaction(
        &self,
        signing_key: &str,
        to: &str,
        value_wei: u128,
        gas_limit: Option<u64>,
    ) -> Result<TxReceipt>;

    /// Call a contract method and return its decoded result.
    async fn call_contract(
        &self,
        signing_key: &str,
        address: &str,
        function_name: &str,
        args: &[serde_json::Value],
    ) -> Result<serde_json::Value>;

    /// Generate a fresh random keypair.
    async fn create_random_keypair(&self) -> Result<Keypair>;

    /// Run the on-chain key exchange to generate or recover the
    /// account's AES key. `None` means the exchange produced nothing
    /// usable (typically an unfunded account).
    async fn generate_or_recover_symmetric_key(&self, signing_key: &str)
        -> Result<Option<String>>;
}

/// Deterministic in-process stand-in for the node-backed client.
///
/// Outputs are Keccak-derived from the inputs so tests get stable
/// values; encryption is a tagged hex round-trip so decrypt(encrypt(v))
/// returns v. Nothing here is real cryptography.
#[derive(Debug, Clone, Default)]
pub struct MockWalletClient {
    /// When set, `generate_or_recover_symmetric_key` returns `Ok(None)`.
    pub fail_key_exchange: bool,
}

impl MockWalletClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// A client whose key exchange yields nothing, for exercising the
    /// generation-failure path.
    pub fn with_failing_key_exchange() -> Self {
        Self {
            fail_key_exchange: true,
        }
    }

    fn digest_hex(parts: &[&str]) -> String {
        let mut hasher = Keccak256::new();
        for part in parts {
            hasher.update(part.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

const CIPHERTEXT_TAG: &str = "mock-ct:";

#[async_trait]
impl WalletClient for MockWalletClient {
    async fn get_balance(&self, _address: &str) -> Result<u128> {
        Ok(1_000_000_000_000_000_000)
    }

    async fn sign_message(&self, signing_key: &str, message: &str) -> Result<String> {
        Ok(format!("0x{}", Self::digest_hex(&[signing_key, message])))
    }

    async fn encrypt_value(
        &self,
        _signing_key: &str,
        symmetric_key: &str,
        value: &str,
        _contract_address: &str,
        _function_selector: &str,
    ) -> Result<String> {
        if symmetric_key.is_empty() {
            return Err(CotiError::Downstream("account has no AES key".into()));
        }
        Ok(format!("{}{}", CIPHERTEXT_TAG, hex::encode(value)))
    }

    async fn decrypt_value(
        &self,
        _signing_key: &str,
        _symmetric_key: &str,
        ciphertext: &str,
    ) -> Result<String> {
        let hex_part = ciphertext
            .strip_prefix(CIPHERTEXT_TAG)
            .ok_or_else(|| CotiError::Downstream("unrecognized ciphertext".into()))?;
        let bytes = hex::decode(hex_part)
            .map_err(|e| CotiError::Downstream(format!("ciphertext decode: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| CotiError::Downstream(format!("plaintext not UTF-8: {}", e)))
    }

    async fn send_transaction(
        &self,
        signing_key: &str,
        to: &str,
        value_wei: u128,
        _gas_limit: Option<u64>,
    ) -> Result<TxReceipt> {
        let hash = Self::digest_hex(&[signing_key, to, &value_wei.to_string()]);
        Ok(TxReceipt {
            hash: format!("0x{}", hash),
        })
    }

    async fn call_contract(
        &self,
        _signing_key: &str,
        address: &str,
        function_name: &str,
        _args: &[serde_json::Value],
    ) -> Result<serde_json::Value> {
        // Enough structure for balance-style reads in tests.
        Ok(serde_json::json!({
            "contract": address,
            "function": function_name,
            "value": "0"
        }))
    }

    async fn create_random_keypair(&self) -> Result<Keypair> {
        use rand::RngCore;

        let mut seed = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut seed);
        let signing_key = format!("0x{}", hex::encode(seed));
        // Address derived from the key, EVM-style 20 bytes.
        let digest = Keccak256::digest(seed);
        let address = format!("0x{}", hex::encode(&digest[12..]));
        Ok(Keypair {
            address,
            signing_key,
        })
    }

    async fn generate_or_recover_symmetric_key(
        &self,
        signing_key: &str,
    ) -> Result<Option<String>> {
        if self.fail_key_exchange {
            return Ok(None);
        }
        let digest = Self::digest_hex(&[signing_key, "aes"]);
        Ok(Some(digest[..32].to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_encrypt_decrypt_round_trip() {
        let client = MockWalletClient::new();
        let ct = client
            .encrypt_value("0xkey", "aes", "42", "0xcontract", "0xdeadbeef")
            .await
            .unwrap();
        let pt = client.decrypt_value("0xkey", "aes", &ct).await.unwrap();
        assert_eq!(pt, "42");
    }

    #[tokio::test]
    async fn test_keypair_shape() {
        let client = MockWalletClient::new();
        let pair = client.create_random_keypair().await.unwrap();
        assert_eq!(pair.address.len(), 42);
        assert_eq!(pair.signing_key.len(), 66);
    }

    #[tokio::test]
    async fn test_signing_is_deterministic() {
        let client = MockWalletClient::new();
        let a = client.sign_message("0xkey", "hello").await.unwrap();
        let b = client.sign_message("0xkey", "hello").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_failing_key_exchange_returns_none() {
        let client = MockWalletClient::with_failing_key_exchange();
        let key = client
            .generate_or_recover_symmetric_key("0xkey")
            .await
            .unwrap();
        assert!(key.is_none());
    }
}
