//! Miner state exposed to JavaScript.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Mining statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MiningStats {
    /// Total hashes computed.
    pub total_hashes: u64,
    /// Current hash rate (hashes per second).
    pub hash_rate: f64,
    /// Whether a nonce meeting the target was found.
    pub block_found: bool,
    /// The winning nonce, once found.
    pub found_nonce: Option<u32>,
    /// Next nonce to try.
    pub current_nonce: u32,
    /// Whether the whole nonce space was searched without success.
    pub exhausted: bool,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: f64,
}

impl MiningStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update hash rate based on elapsed time.
    pub fn update_hash_rate(&mut self) {
        if self.elapsed_ms > 0.0 {
            self.hash_rate = (self.total_hashes as f64) / (self.elapsed_ms / 1000.0);
        }
    }

    /// Format hash rate for display.
    pub fn format_hash_rate(&self) -> String {
        if self.hash_rate >= 1_000_000_000.0 {
            format!("{:.2} GH/s", self.hash_rate / 1_000_000_000.0)
        } else if self.hash_rate >= 1_000_000.0 {
            format!("{:.2} MH/s", self.hash_rate / 1_000_000.0)
        } else if self.hash_rate >= 1_000.0 {
            format!("{:.2} KH/s", self.hash_rate / 1_000.0)
        } else {
            format!("{:.2} H/s", self.hash_rate)
        }
    }

    /// Convert to JS value.
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {:?}", e)))
    }
}

/// Header information for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderInfo {
    /// Previous block hash (hex).
    pub prev_block: String,
    /// Merkle root (hex).
    pub merkle_root: String,
    /// Block timestamp (Unix seconds).
    pub timestamp: i64,
    /// Difficulty bits.
    pub bits: u32,
    /// Difficulty relative to the network's pow limit.
    pub difficulty: f64,
    /// Formatted difficulty string.
    pub difficulty_display: String,
    /// Average number of hashes needed to meet the target.
    pub expected_hashes: f64,
    /// Network name.
    pub network: String,
}

impl HeaderInfo {
    /// Convert to JS value.
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {:?}", e)))
    }
}

/// Result of mining one batch of nonces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchInfo {
    /// Whether a nonce meeting the target was found.
    pub block_found: bool,
    /// The winning nonce (if found).
    pub nonce: Option<u32>,
    /// The header hash (if found).
    pub hash: Option<String>,
    /// Solution bytes recorded on the header (if found).
    pub solution: Option<String>,
    /// Number of leading zero bits in the hash.
    pub leading_zeros: u32,
    /// Hashes computed in this batch.
    pub hashes_computed: u64,
    /// Whether the nonce space is exhausted.
    pub exhausted: bool,
}

impl BatchInfo {
    /// Convert to JS value.
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {:?}", e)))
    }
}
