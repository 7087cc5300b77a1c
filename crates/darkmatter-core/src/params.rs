//! Network definitions and proof-of-work parameters.

use alloc::string::ToString;
use serde::{Deserialize, Serialize};

use crate::error::ParamsError;
use crate::header::BlockHeader;

/// Block version used for new headers.
pub const BLOCK_VERSION: i32 = 1;

/// Attempt budget of a plain `solve`.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1_000_000;

/// Attempt budget used when mining the genesis block.
pub const GENESIS_MAX_ATTEMPTS: u32 = 10_000_000;

/// Genesis timestamp: 2025-11-23T00:00:00Z.
pub const GENESIS_TIMESTAMP: i64 = 1_763_856_000;

/// Easiest target allowed on mainnet and testnet.
pub const POW_LIMIT_BITS: u32 = 0x2000ffff;

/// Easiest target allowed on regtest.
pub const REGTEST_POW_LIMIT_BITS: u32 = 0x207fffff;

/// Network type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network
    Mainnet,
    /// Public test network
    Testnet,
    /// Local regression-test network
    Regtest,
}

impl Network {
    /// Compact bits of the easiest allowed target.
    pub fn pow_limit_bits(&self) -> u32 {
        match self {
            Network::Mainnet | Network::Testnet => POW_LIMIT_BITS,
            Network::Regtest => REGTEST_POW_LIMIT_BITS,
        }
    }

    /// Default proof-of-work parameters for this network.
    pub fn params(&self) -> PowParams {
        PowParams {
            network: *self,
            pow_limit_bits: self.pow_limit_bits(),
            ..PowParams::default()
        }
    }

    /// Get the network name.
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
        }
    }

    /// Parse network from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Some(Network::Mainnet),
            "testnet" | "test" => Some(Network::Testnet),
            "regtest" => Some(Network::Regtest),
            _ => None,
        }
    }

    /// Parse network from string, reporting unknown names.
    pub fn parse(s: &str) -> Result<Self, ParamsError> {
        Self::from_str(s).ok_or_else(|| ParamsError::UnknownNetwork(s.to_string()))
    }
}

/// Tunable proof-of-work parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowParams {
    /// Network these parameters belong to.
    pub network: Network,
    /// Compact bits of the easiest allowed target.
    pub pow_limit_bits: u32,
    /// Attempts made by `solve`.
    pub max_attempts: u32,
    /// Attempts made when mining the genesis block.
    pub genesis_max_attempts: u32,
    /// Genesis block timestamp (Unix seconds).
    pub genesis_timestamp: i64,
}

impl Default for PowParams {
    fn default() -> Self {
        PowParams {
            network: Network::Mainnet,
            pow_limit_bits: POW_LIMIT_BITS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            genesis_max_attempts: GENESIS_MAX_ATTEMPTS,
            genesis_timestamp: GENESIS_TIMESTAMP,
        }
    }
}

impl PowParams {
    /// Load parameters from a JSON document. Missing fields take defaults.
    #[cfg(feature = "std")]
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        serde_json::from_str(json).map_err(|e| ParamsError::Parse(e.to_string()))
    }

    /// Serialize parameters to JSON.
    #[cfg(feature = "std")]
    pub fn to_json(&self) -> Result<alloc::string::String, ParamsError> {
        serde_json::to_string_pretty(self).map_err(|e| ParamsError::Parse(e.to_string()))
    }

    /// Unmined genesis header for these parameters.
    pub fn genesis_header(&self) -> BlockHeader {
        BlockHeader::new([0u8; 32], [0u8; 32], self.genesis_timestamp, self.pow_limit_bits)
    }
}

/// Unmined genesis header for a network.
pub fn genesis_header(network: Network) -> BlockHeader {
    network.params().genesis_header()
}
