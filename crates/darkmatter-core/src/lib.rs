//! DarkMatter proof-of-work core.
//!
//! This crate provides pure Rust implementations of:
//! - The 84-byte block header layout hashed for proof of work
//! - The DarkMatter hash (SHA256 -> AES-256-CTR -> SHA256)
//! - Compact "bits" target encoding and decoding
//! - Header verification and sequential nonce search
//! - Network proof-of-work parameters

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod compact;
pub mod error;
pub mod hash;
pub mod header;
pub mod params;
pub mod pow;

pub use compact::{decode_compact, encode_compact, hash_meets_target, Target};
pub use error::{HeaderError, ParamsError};
pub use hash::{darkmatter_hash, darkmatter_hash_bytes};
pub use header::BlockHeader;
pub use params::{genesis_header, Network, PowParams};
pub use pow::{search_range, DarkMatter, PowEngine, SearchResult, Solution};
