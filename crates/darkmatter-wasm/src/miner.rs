//! Mining controller for the WASM miner.

use darkmatter_core::{
    compact::{bits_to_difficulty, expected_hashes, format_difficulty},
    hash::{count_leading_zeros, hash_to_hex},
    header::parse_digest,
    search_range, BlockHeader, DarkMatter, HeaderError, Network, PowEngine,
};
use wasm_bindgen::prelude::*;

use crate::state::{BatchInfo, HeaderInfo, MiningStats};

/// The main mining controller.
#[wasm_bindgen]
pub struct Miner {
    /// The network being mined.
    network: Network,
    /// The proof-of-work engine.
    engine: DarkMatter,
    /// The header being mined.
    header: Option<BlockHeader>,
    /// Mining statistics.
    stats: MiningStats,
    /// Start time of mining.
    start_time: f64,
    /// Whether mining is active.
    is_mining: bool,
    /// Next nonce to try.
    current_nonce: u32,
}

#[wasm_bindgen]
impl Miner {
    /// Create a new miner instance.
    ///
    /// # Arguments
    /// * `network` - The network ("mainnet", "testnet" or "regtest")
    #[wasm_bindgen(constructor)]
    pub fn new(network: &str) -> Result<Miner, JsValue> {
        let net = Network::from_str(network).ok_or_else(|| JsValue::from_str("Invalid network"))?;
        Ok(Miner::for_network(net))
    }

    /// Set the header to mine.
    ///
    /// # Arguments
    /// * `prev_block` - Previous block hash (hex)
    /// * `merkle_root` - Merkle root (hex)
    /// * `timestamp` - Block timestamp (or 0 to use current time)
    /// * `bits` - The difficulty bits
    #[wasm_bindgen]
    pub fn build_header(
        &mut self,
        prev_block: &str,
        merkle_root: &str,
        timestamp: u32,
        bits: u32,
    ) -> Result<JsValue, JsValue> {
        let ts = if timestamp > 0 {
            timestamp as i64
        } else {
            (js_sys::Date::now() / 1000.0) as i64
        };

        let info = self
            .set_header(prev_block, merkle_root, ts, bits)
            .map_err(|e| JsValue::from_str(&format!("Invalid header: {}", e)))?;

        info.to_js()
    }

    /// Mine a batch of nonces, continuing from the last batch.
    ///
    /// # Arguments
    /// * `batch_size` - Number of nonces to try in this batch
    #[wasm_bindgen]
    pub fn mine_batch(&mut self, batch_size: u32) -> Result<JsValue, JsValue> {
        let info = self
            .run_batch(batch_size)
            .ok_or_else(|| JsValue::from_str("No header built"))?;

        if self.start_time > 0.0 {
            let now = js_sys::Date::now();
            self.stats.elapsed_ms = now - self.start_time;
            self.stats.update_hash_rate();
        }

        if let Some(nonce) = info.nonce {
            console_log(&format!("Found nonce {}", nonce));
        }

        info.to_js()
    }

    /// Check the current header against its target.
    #[wasm_bindgen]
    pub fn verify(&self) -> bool {
        self.header
            .as_ref()
            .map(|h| self.engine.verify(h))
            .unwrap_or(false)
    }

    /// Start mining.
    #[wasm_bindgen]
    pub fn start_mining(&mut self) {
        self.is_mining = true;
        self.start_time = js_sys::Date::now();
    }

    /// Stop mining.
    #[wasm_bindgen]
    pub fn stop_mining(&mut self) {
        self.is_mining = false;
    }

    /// Check if mining is active.
    #[wasm_bindgen(getter)]
    pub fn is_mining(&self) -> bool {
        self.is_mining
    }

    /// Get current mining statistics.
    #[wasm_bindgen]
    pub fn get_stats(&self) -> Result<JsValue, JsValue> {
        self.stats.to_js()
    }

    /// Get the formatted hash rate.
    #[wasm_bindgen]
    pub fn get_hash_rate_display(&self) -> String {
        self.stats.format_hash_rate()
    }

    /// Get the serialized 84-byte header (if a valid nonce was found).
    #[wasm_bindgen]
    pub fn get_header_hex(&self) -> Option<String> {
        if self.stats.block_found {
            self.header.as_ref().map(|h| hex::encode(h.serialize()))
        } else {
            None
        }
    }

    /// Reset the miner for a new header.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.header = None;
        self.stats = MiningStats::new();
        self.current_nonce = 0;
        self.start_time = 0.0;
        self.is_mining = false;
    }

    /// Get the current network.
    #[wasm_bindgen(getter)]
    pub fn network(&self) -> String {
        self.network.name().to_string()
    }
}

impl Miner {
    /// Create a miner with the network's default parameters.
    pub fn for_network(network: Network) -> Self {
        Miner {
            network,
            engine: DarkMatter::with_params(network.params()),
            header: None,
            stats: MiningStats::new(),
            start_time: 0.0,
            is_mining: false,
            current_nonce: 0,
        }
    }

    /// Replace the header being mined and restart the search at nonce 0.
    pub fn set_header(
        &mut self,
        prev_block_hex: &str,
        merkle_root_hex: &str,
        timestamp: i64,
        bits: u32,
    ) -> Result<HeaderInfo, HeaderError> {
        let prev_block = parse_digest("prev_block", prev_block_hex)?;
        let merkle_root = parse_digest("merkle_root", merkle_root_hex)?;

        let header = BlockHeader::new(prev_block, merkle_root, timestamp, bits);
        let difficulty = bits_to_difficulty(bits, self.engine.params().pow_limit_bits);

        let info = HeaderInfo {
            prev_block: hex::encode(prev_block),
            merkle_root: hex::encode(merkle_root),
            timestamp,
            bits,
            difficulty,
            difficulty_display: format_difficulty(difficulty),
            expected_hashes: expected_hashes(bits),
            network: self.network.name().to_string(),
        };

        self.header = Some(header);
        self.current_nonce = 0;
        self.stats = MiningStats::new();

        Ok(info)
    }

    /// Search the next `batch_size` nonces. `None` when no header is set.
    pub fn run_batch(&mut self, batch_size: u32) -> Option<BatchInfo> {
        let header = self.header.as_mut()?;

        let mut info = BatchInfo {
            block_found: self.stats.block_found,
            nonce: self.stats.found_nonce,
            hash: None,
            solution: None,
            leading_zeros: 0,
            hashes_computed: 0,
            exhausted: self.stats.exhausted,
        };

        if self.stats.block_found || self.stats.exhausted {
            return Some(info);
        }

        let result = search_range(header, self.current_nonce, batch_size);
        info.hashes_computed = result.hashes_computed;
        self.stats.total_hashes += result.hashes_computed;

        match (result.solution(), result.hash) {
            (Some(solution), Some(hash)) => {
                header.nonce = solution.nonce;
                header.solution = solution.to_vec();

                self.current_nonce = solution.nonce;
                self.stats.block_found = true;
                self.stats.found_nonce = Some(solution.nonce);

                info.block_found = true;
                info.nonce = Some(solution.nonce);
                info.hash = Some(hash_to_hex(&hash));
                info.solution = Some(hex::encode(solution.bytes));
                info.leading_zeros = count_leading_zeros(&hash);
            }
            _ => {
                self.current_nonce = self.current_nonce.saturating_add(batch_size);
                if self.current_nonce == u32::MAX {
                    self.stats.exhausted = true;
                    info.exhausted = true;
                }
            }
        }

        self.stats.current_nonce = self.current_nonce;
        Some(info)
    }

    /// The header being mined.
    pub fn header(&self) -> Option<&BlockHeader> {
        self.header.as_ref()
    }

    /// Current statistics.
    pub fn stats(&self) -> &MiningStats {
        &self.stats
    }
}

/// Log to the browser console.
#[wasm_bindgen]
pub fn console_log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_hex() -> String {
        "00".repeat(32)
    }

    #[test]
    fn test_batches_continue_until_found() {
        let mut miner = Miner::for_network(Network::Mainnet);
        assert!(miner.run_batch(10).is_none());

        let info = miner
            .set_header(&zero_hex(), &zero_hex(), 0, 0x2000ffff)
            .unwrap();
        assert_eq!(info.network, "mainnet");
        assert!((info.difficulty - 1.0).abs() < 1e-9);

        let first = miner.run_batch(500).unwrap();
        assert!(!first.block_found);
        assert_eq!(first.hashes_computed, 500);
        assert_eq!(miner.stats().current_nonce, 500);

        let second = miner.run_batch(500).unwrap();
        assert!(second.block_found);
        assert_eq!(second.nonce, Some(756));
        assert_eq!(second.hashes_computed, 257);
        assert_eq!(second.solution.as_deref(), Some("f4020000000000000000000000000000"));
        assert!(second.leading_zeros >= 8);

        assert!(miner.verify());
        assert_eq!(miner.stats().total_hashes, 757);
        assert_eq!(miner.header().unwrap().nonce, 756);

        // Further batches do no work.
        let third = miner.run_batch(500).unwrap();
        assert_eq!(third.hashes_computed, 0);
        assert_eq!(third.nonce, Some(756));
    }

    #[test]
    fn test_set_header_rejects_bad_hex() {
        let mut miner = Miner::for_network(Network::Regtest);
        let err = miner.set_header("xyz", &zero_hex(), 0, 0x207fffff).unwrap_err();
        assert_eq!(err, HeaderError::InvalidHex { field: "prev_block" });
        assert!(miner.header().is_none());
    }

    #[test]
    fn test_get_header_hex_after_found() {
        let mut miner = Miner::for_network(Network::Mainnet);
        miner.set_header(&zero_hex(), &zero_hex(), 0, 0x2000ffff).unwrap();
        assert!(miner.get_header_hex().is_none());

        miner.run_batch(1_000).unwrap();
        let header_hex = miner.get_header_hex().unwrap();
        let bytes = hex::decode(&header_hex).unwrap();
        let header = BlockHeader::from_bytes(&bytes).unwrap();
        assert_eq!(header.nonce, 756);
    }
}
