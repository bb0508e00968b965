//! Error types for the COTI core library

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CotiError>;

#[derive(Error, Debug)]
pub enum CotiError {
    #[error("Missing configuration: {0}")]
    ConfigurationMissing(String),

    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid backup: {0}")]
    InvalidBackup(String),

    #[error("Key generation failed: {0}")]
    GenerationFailed(String),

    #[error("Wallet client error: {0}")]
    Downstream(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
