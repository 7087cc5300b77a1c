//! WebAssembly bindings for the DarkMatter miner.
//!
//! This crate provides JavaScript-accessible APIs for:
//! - Building a header to mine
//! - Mining it in batches of nonces
//! - Verifying headers and hashing raw header bytes

use darkmatter_core::{darkmatter_hash, BlockHeader, DarkMatter, PowEngine};
use wasm_bindgen::prelude::*;

pub mod miner;
pub mod state;

// Re-export main types for JS access
pub use miner::Miner;

/// Initialize the WASM module with better panic messages.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// DarkMatter hash of a serialized 84-byte header, as hex.
#[wasm_bindgen]
pub fn hash_header_hex(header_hex: &str) -> Result<String, JsValue> {
    let header = parse_header(header_hex)?;
    Ok(hex::encode(darkmatter_hash(&header)))
}

/// Check a serialized 84-byte header against the target in its bits.
#[wasm_bindgen]
pub fn verify_header_hex(header_hex: &str) -> Result<bool, JsValue> {
    let header = parse_header(header_hex)?;
    Ok(DarkMatter::new().verify(&header))
}

fn parse_header(header_hex: &str) -> Result<BlockHeader, JsValue> {
    let bytes = hex::decode(header_hex.trim())
        .map_err(|_| JsValue::from_str("Invalid header hex"))?;
    BlockHeader::from_bytes(&bytes).map_err(|e| JsValue::from_str(&e.to_string()))
}
