//! Backup document for account export/import
//!
//! The interchange format produced by `export_accounts` and consumed by
//! `import_accounts`. The document is transient: persistence is the
//! caller's responsibility, this crate never writes it to disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CotiError, Result};

/// Marker substituted for secret fields when exporting without secrets.
/// Documents containing it are rejected on import.
pub const REDACTED: &str = "[REDACTED]";

/// One exported account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupAccount {
    /// Public account address
    pub address: String,

    /// Signing key, or [`REDACTED`]
    pub private_key: String,

    /// AES key, or [`REDACTED`]
    pub aes_key: String,

    /// Whether this account was the default at export time
    #[serde(default)]
    pub is_default: bool,
}

/// Export/import interchange document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupDocument {
    /// Creation time of the export
    pub timestamp: DateTime<Utc>,

    /// Exported accounts, in store order
    pub accounts: Vec<BackupAccount>,
}

impl BackupDocument {
    pub fn new(accounts: Vec<BackupAccount>) -> Self {
        Self {
            timestamp: Utc::now(),
            accounts,
        }
    }

    /// Parse a document from its JSON text form.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CotiError::InvalidBackup(format!("malformed document: {}", e)))
    }

    /// Validate the document for import.
    ///
    /// Every entry must carry an address and non-redacted, non-empty
    /// secrets; a document exported with `include_secrets=false` cannot
    /// be imported.
    pub fn validate(&self) -> Result<()> {
        if self.accounts.is_empty() {
            return Err(CotiError::InvalidBackup("document has no accounts".into()));
        }
        for (i, account) in self.accounts.iter().enumerate() {
            if account.address.trim().is_empty() {
                return Err(CotiError::InvalidBackup(format!(
                    "entry {} is missing an address",
                    i
                )));
            }
            for (field, value) in [
                ("private_key", &account.private_key),
                ("aes_key", &account.aes_key),
            ] {
                if value.is_empty() || value == REDACTED {
                    return Err(CotiError::InvalidBackup(format!(
                        "entry {} ({}) has a redacted or empty {}",
                        i, account.address, field
                    )));
                }
            }
        }
        Ok(())
    }
}
