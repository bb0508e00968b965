//! Credential registry
//!
//! One record per account. Holding `(address, signing_key, symmetric_key)`
//! in a single struct makes the lockstep invariant structural: an append
//! or in-place update touches all three fields or none.
//!
//! Address comparison is case-insensitive everywhere; insertion order is
//! preserved and is the order `list` and `export` report.

use serde::Serialize;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::backup::{BackupAccount, BackupDocument, REDACTED};
use crate::client::WalletClient;
use crate::error::{CotiError, Result};

/// Symmetric key written by `create` until the on-chain key exchange has
/// been run for the new account.
pub const PENDING_AES_KEY: &str =
    "<pending: fund the account, then run generate_aes_key>";

/// Fixed mask for secrets too short to partially reveal.
pub const MASK_PLACEHOLDER: &str = "****";

/// Mask a secret for display.
///
/// Reveals the first four and last four characters when the secret is
/// longer than eight characters, otherwise collapses to a fixed
/// placeholder. Never invertible from the output alone.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        MASK_PLACEHOLDER.to_string()
    }
}

/// One account's credentials
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credential {
    pub address: String,
    pub signing_key: String,
    pub symmetric_key: String,
}

impl Credential {
    /// Whether the AES key has been generated (not the creation placeholder).
    pub fn has_aes_key(&self) -> bool {
        !self.symmetric_key.is_empty() && self.symmetric_key != PENDING_AES_KEY
    }
}

// Secrets stay masked in logs and panics.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("address", &self.address)
            .field("signing_key", &mask(&self.signing_key))
            .field("symmetric_key", &mask(&self.symmetric_key))
            .finish()
    }
}

/// Masked row returned by `list`
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub address: String,
    pub private_key: String,
    pub aes_key: String,
    pub is_default: bool,
}

/// Result of an import
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    /// Entries applied from the document
    pub imported: usize,
    /// Accounts in the store after the import
    pub total_after: usize,
    /// Default address after resolution
    pub default_address: Option<String>,
}

/// In-memory account registry with a default-account pointer.
///
/// Accounts are append-only: there is no removal operation. A wholesale
/// replacement is available through `import` with `merge=false`.
#[derive(Debug, Default)]
pub struct CredentialStore {
    accounts: Vec<Credential>,
    default_address: Option<String>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from pre-assembled records, e.g. startup configuration.
    pub fn from_records(accounts: Vec<Credential>, default_address: Option<String>) -> Self {
        Self {
            accounts,
            default_address,
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Current default pointer, if set.
    pub fn default_address(&self) -> Option<&str> {
        self.default_address.as_deref()
    }

    fn find(&self, address: &str) -> Option<&Credential> {
        self.accounts
            .iter()
            .find(|c| c.address.eq_ignore_ascii_case(address))
    }

    fn find_mut(&mut self, address: &str) -> Option<&mut Credential> {
        self.accounts
            .iter_mut()
            .find(|c| c.address.eq_ignore_ascii_case(address))
    }

    /// Resolve a credential.
    ///
    /// Explicit `address` wins; otherwise the default pointer; otherwise
    /// the first registered account.
    pub fn resolve(&self, address: Option<&str>) -> Result<Credential> {
        match address {
            Some(addr) => self
                .find(addr)
                .cloned()
                .ok_or_else(|| CotiError::NotFound(addr.to_string())),
            None => {
                if let Some(default) = &self.default_address {
                    if let Some(found) = self.find(default) {
                        return Ok(found.clone());
                    }
                    return Err(CotiError::NotFound(default.clone()));
                }
                self.accounts
                    .first()
                    .cloned()
                    .ok_or_else(|| CotiError::NotFound("no accounts configured".to_string()))
            }
        }
    }

    /// Masked view of every account, in store order.
    pub fn list(&self) -> Vec<AccountSummary> {
        self.accounts
            .iter()
            .map(|c| AccountSummary {
                address: c.address.clone(),
                private_key: mask(&c.signing_key),
                aes_key: mask(&c.symmetric_key),
                is_default: self.is_default(&c.address),
            })
            .collect()
    }

    fn is_default(&self, address: &str) -> bool {
        match &self.default_address {
            Some(d) => d.eq_ignore_ascii_case(address),
            // Unset pointer means the first account is the effective default.
            None => self
                .accounts
                .first()
                .is_some_and(|c| c.address.eq_ignore_ascii_case(address)),
        }
    }

    /// Point the default at an existing account.
    pub fn change_default(&mut self, address: &str) -> Result<()> {
        let canonical = self
            .find(address)
            .map(|c| c.address.clone())
            .ok_or_else(|| CotiError::NotFound(address.to_string()))?;
        self.default_address = Some(canonical);
        Ok(())
    }

    /// Create a new account from a fresh random keypair.
    ///
    /// The AES key is left as [`PENDING_AES_KEY`]: generating it requires
    /// an on-chain funding step the local generator cannot perform.
    pub async fn create(
        &mut self,
        client: &dyn WalletClient,
        set_as_default: bool,
    ) -> Result<Credential> {
        let pair = client.create_random_keypair().await?;
        let credential = Credential {
            address: pair.address,
            signing_key: pair.signing_key,
            symmetric_key: PENDING_AES_KEY.to_string(),
        };
        self.accounts.push(credential.clone());
        if set_as_default {
            self.default_address = Some(credential.address.clone());
        }
        Ok(credential)
    }

    /// Run the on-chain key exchange for `address` and store the result
    /// in place.
    pub async fn generate_symmetric_key(
        &mut self,
        client: &dyn WalletClient,
        address: &str,
    ) -> Result<String> {
        let signing_key = self
            .find(address)
            .map(|c| c.signing_key.clone())
            .ok_or_else(|| CotiError::NotFound(address.to_string()))?;

        let key = client
            .generate_or_recover_symmetric_key(&signing_key)
            .await?
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                CotiError::GenerationFailed(format!(
                    "key exchange returned no usable key for {}",
                    address
                ))
            })?;

        // Lookup cannot fail here, the record was found above.
        if let Some(record) = self.find_mut(address) {
            record.symmetric_key = key.clone();
        }
        Ok(key)
    }

    /// Export accounts as a backup document.
    ///
    /// A filter that matches nothing falls back to exporting everything.
    /// Without `include_secrets` both key fields carry the redaction
    /// marker; such a document will not import.
    pub fn export(&self, filter: Option<&[String]>, include_secrets: bool) -> BackupDocument {
        let selected: Vec<&Credential> = match filter {
            Some(addresses) if !addresses.is_empty() => {
                let matched: Vec<&Credential> = self
                    .accounts
                    .iter()
                    .filter(|c| {
                        addresses
                            .iter()
                            .any(|a| a.eq_ignore_ascii_case(&c.address))
                    })
                    .collect();
                if matched.is_empty() {
                    self.accounts.iter().collect()
                } else {
                    matched
                }
            }
            _ => self.accounts.iter().collect(),
        };

        let accounts = selected
            .into_iter()
            .map(|c| BackupAccount {
                address: c.address.clone(),
                private_key: if include_secrets {
                    c.signing_key.clone()
                } else {
                    REDACTED.to_string()
                },
                aes_key: if include_secrets {
                    c.symmetric_key.clone()
                } else {
                    REDACTED.to_string()
                },
                is_default: self.is_default(&c.address),
            })
            .collect();

        BackupDocument::new(accounts)
    }

    /// Import a backup document.
    ///
    /// The document is validated before any mutation; a malformed or
    /// redacted document leaves the store untouched. With `merge`,
    /// matching records have their secrets overwritten in place and new
    /// entries are appended; without it the store is replaced wholesale
    /// in document order.
    pub fn import(
        &mut self,
        document: &BackupDocument,
        merge: bool,
        preferred_default: Option<&str>,
    ) -> Result<ImportSummary> {
        document.validate()?;

        if merge {
            for entry in &document.accounts {
                match self.find_mut(&entry.address) {
                    Some(existing) => {
                        existing.signing_key = entry.private_key.clone();
                        existing.symmetric_key = entry.aes_key.clone();
                    }
                    None => self.accounts.push(Credential {
                        address: entry.address.clone(),
                        signing_key: entry.private_key.clone(),
                        symmetric_key: entry.aes_key.clone(),
                    }),
                }
            }
        } else {
            self.accounts = document
                .accounts
                .iter()
                .map(|entry| Credential {
                    address: entry.address.clone(),
                    signing_key: entry.private_key.clone(),
                    symmetric_key: entry.aes_key.clone(),
                })
                .collect();
            self.default_address = None;
        }

        self.default_address = self.resolve_import_default(document, merge, preferred_default);

        Ok(ImportSummary {
            imported: document.accounts.len(),
            total_after: self.accounts.len(),
            default_address: self.default_address.clone(),
        })
    }

    /// Default resolution after an import, first satisfied wins.
    ///
    /// Merge: explicit preference, then the surviving current default,
    /// then the first entry flagged in the document. Replace: explicit
    /// preference, then the flagged entry, then the first entry.
    fn resolve_import_default(
        &self,
        document: &BackupDocument,
        merge: bool,
        preferred_default: Option<&str>,
    ) -> Option<String> {
        let preferred = preferred_default
            .and_then(|addr| self.find(addr))
            .map(|c| c.address.clone());
        if preferred.is_some() {
            return preferred;
        }

        if merge {
            if let Some(current) = &self.default_address {
                if self.find(current).is_some() {
                    return Some(current.clone());
                }
            }
        }

        let flagged = document
            .accounts
            .iter()
            .find(|a| a.is_default)
            .map(|a| a.address.clone());
        if flagged.is_some() {
            return flagged;
        }

        if merge {
            self.default_address.clone()
        } else {
            self.accounts.first().map(|c| c.address.clone())
        }
    }
}
