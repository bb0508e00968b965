//! Startup configuration
//!
//! Loaded once from the process environment (a `.env` file is honored if
//! present). The three key lists are comma-separated and positionally
//! aligned; entries past the shortest list are dropped.

use std::env;
use tracing::warn;

use crate::credentials::{Credential, CredentialStore};
use crate::error::{CotiError, Result};
use crate::network::Network;

/// Comma-separated signing keys, aligned with [`ENV_PUBLIC_KEY`].
pub const ENV_PRIVATE_KEY: &str = "COTI_MCP_PRIVATE_KEY";
/// Comma-separated account addresses.
pub const ENV_PUBLIC_KEY: &str = "COTI_MCP_PUBLIC_KEY";
/// Comma-separated AES keys, aligned with the address list.
pub const ENV_AES_KEY: &str = "COTI_MCP_AES_KEY";
/// Optional default-account override; first address otherwise.
pub const ENV_CURRENT_PUBLIC_KEY: &str = "COTI_MCP_CURRENT_PUBLIC_KEY";
/// Optional network selection, `testnet` (default) or `mainnet`.
pub const ENV_NETWORK: &str = "COTI_MCP_NETWORK";

/// Parsed startup configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub addresses: Vec<String>,
    pub signing_keys: Vec<String>,
    pub symmetric_keys: Vec<String>,
    pub default_address: Option<String>,
    pub network: Network,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing required keys are fatal to the caller: the process is
    /// expected to exit non-zero on `ConfigurationMissing`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let signing_keys = split_list(&required(ENV_PRIVATE_KEY)?);
        let addresses = split_list(&required(ENV_PUBLIC_KEY)?);
        let symmetric_keys = split_list(&required(ENV_AES_KEY)?);

        let default_address = env::var(ENV_CURRENT_PUBLIC_KEY)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let network = match env::var(ENV_NETWORK) {
            Ok(value) if !value.trim().is_empty() => value.trim().parse()?,
            _ => Network::Testnet,
        };

        Ok(Config {
            addresses,
            signing_keys,
            symmetric_keys,
            default_address,
            network,
        })
    }

    /// Zip the aligned key lists into a credential store.
    pub fn build_store(&self) -> CredentialStore {
        let complete = self
            .addresses
            .len()
            .min(self.signing_keys.len())
            .min(self.symmetric_keys.len());

        if complete < self.addresses.len()
            || complete < self.signing_keys.len()
            || complete < self.symmetric_keys.len()
        {
            warn!(
                addresses = self.addresses.len(),
                signing_keys = self.signing_keys.len(),
                aes_keys = self.symmetric_keys.len(),
                "configured key lists have unequal lengths; trailing partial records dropped"
            );
        }

        let records = (0..complete)
            .map(|i| Credential {
                address: self.addresses[i].clone(),
                signing_key: self.signing_keys[i].clone(),
                symmetric_key: self.symmetric_keys[i].clone(),
            })
            .collect();

        CredentialStore::from_records(records, self.default_address.clone())
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| CotiError::ConfigurationMissing(key.to_string()))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empty() {
        assert_eq!(split_list("a, b ,,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_build_store_zips_to_shortest() {
        let config = Config {
            addresses: vec!["0xA".into(), "0xB".into()],
            signing_keys: vec!["k1".into()],
            symmetric_keys: vec!["s1".into(), "s2".into()],
            default_address: None,
            network: Network::Testnet,
        };
        let store = config.build_store();
        assert_eq!(store.len(), 1);
        assert_eq!(store.resolve(None).unwrap().address, "0xA");
    }

    #[test]
    fn test_build_store_honors_default_override() {
        let config = Config {
            addresses: vec!["0xA".into(), "0xB".into()],
            signing_keys: vec!["k1".into(), "k2".into()],
            symmetric_keys: vec!["s1".into(), "s2".into()],
            default_address: Some("0xB".into()),
            network: Network::Testnet,
        };
        let store = config.build_store();
        assert_eq!(store.resolve(None).unwrap().address, "0xB");
    }
}
