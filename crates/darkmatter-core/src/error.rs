//! Errors for the fallible edges of the crate.
//!
//! Hashing, the compact codec and the nonce search are total; only decoding
//! external input (raw headers, hex fields, configuration) can fail.

use alloc::string::String;

/// Errors raised while decoding a block header.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    /// Serialized header has the wrong length.
    #[error("Invalid header length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
    /// A hex-encoded field could not be decoded.
    #[error("Invalid hex in {field}")]
    InvalidHex { field: &'static str },
    /// A digest field is not 32 bytes long.
    #[error("Invalid {field} length: expected 32 bytes, got {got}")]
    InvalidDigestLength { field: &'static str, got: usize },
}

/// Errors raised while loading proof-of-work parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamsError {
    /// The configuration document could not be parsed.
    #[error("Invalid params: {0}")]
    Parse(String),
    /// Unknown network name.
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),
}
