//! Core library for the COTI MCP server
//!
//! Holds the pieces with real invariants: the multi-account credential
//! registry, the default-account and network selectors, the backup
//! interchange document, startup configuration, and the [`WalletClient`]
//! seam behind which all blockchain work is delegated.

pub mod backup;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod network;

pub use backup::{BackupAccount, BackupDocument, REDACTED};
pub use client::{Keypair, MockWalletClient, TxReceipt, WalletClient};
pub use config::Config;
pub use credentials::{
    mask, AccountSummary, Credential, CredentialStore, ImportSummary, MASK_PLACEHOLDER,
    PENDING_AES_KEY,
};
pub use error::{CotiError, Result};
pub use network::{Network, NetworkSelector, SwitchOutcome};
