//! Network selection
//!
//! COTI runs two public environments. The selector tracks which one is
//! active for the process; unset means testnet.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CotiError, Result};

/// Target chain environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Testnet => write!(f, "testnet"),
            Network::Mainnet => write!(f, "mainnet"),
        }
    }
}

impl FromStr for Network {
    type Err = CotiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            other => Err(CotiError::InvalidArgument(format!(
                "unknown network '{}', expected 'testnet' or 'mainnet'",
                other
            ))),
        }
    }
}

/// Outcome of a switch request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The requested network was already active
    AlreadyActive,
    /// The selector moved off `from`
    Switched { from: Network },
}

/// Tracks the active network for the process
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkSelector {
    current: Network,
}

impl NetworkSelector {
    pub fn new(network: Network) -> Self {
        Self { current: network }
    }

    pub fn current(&self) -> Network {
        self.current
    }

    /// Switch to `target`. Idempotent: switching to the active network
    /// succeeds and reports `AlreadyActive`.
    pub fn switch(&mut self, target: Network) -> SwitchOutcome {
        if self.current == target {
            return SwitchOutcome::AlreadyActive;
        }
        let from = self.current;
        self.current = target;
        SwitchOutcome::Switched { from }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_testnet() {
        assert_eq!(NetworkSelector::default().current(), Network::Testnet);
    }

    #[test]
    fn test_switch_is_idempotent() {
        let mut selector = NetworkSelector::default();
        assert_eq!(
            selector.switch(Network::Mainnet),
            SwitchOutcome::Switched {
                from: Network::Testnet
            }
        );
        assert_eq!(selector.switch(Network::Mainnet), SwitchOutcome::AlreadyActive);
        assert_eq!(selector.current(), Network::Mainnet);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("testnet".parse::<Network>().is_ok());
        assert!("MAINNET".parse::<Network>().is_ok());
        assert!("devnet".parse::<Network>().is_err());
    }
}
