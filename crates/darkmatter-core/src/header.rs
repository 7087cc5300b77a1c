//! Block header and its 84-byte proof-of-work layout.

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::compact::{decode_compact, Target};
use crate::error::HeaderError;
use crate::hash::darkmatter_hash;
use crate::params::BLOCK_VERSION;

/// Length of the serialized header that feeds the PoW hash.
pub const HEADER_SIZE: usize = 84;

/// Offset of the nonce inside the serialized header.
pub const NONCE_OFFSET: usize = 80;

/// A block header as seen by the proof-of-work engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    /// Block version.
    pub version: i32,
    /// Hash of the previous block.
    pub prev_block: [u8; 32],
    /// Merkle root of all transactions.
    pub merkle_root: [u8; 32],
    /// Block timestamp (Unix seconds).
    pub timestamp: i64,
    /// Difficulty target in compact "bits" format.
    pub bits: u32,
    /// Nonce for proof of work.
    pub nonce: u32,
    /// Solution bytes recorded by the miner. Not covered by the PoW hash.
    #[serde(default)]
    pub solution: Vec<u8>,
}

impl BlockHeader {
    /// Create a new block header with a zero nonce and no solution.
    pub fn new(prev_block: [u8; 32], merkle_root: [u8; 32], timestamp: i64, bits: u32) -> Self {
        BlockHeader {
            version: BLOCK_VERSION,
            prev_block,
            merkle_root,
            timestamp,
            bits,
            nonce: 0,
            solution: Vec::new(),
        }
    }

    /// Serialize the header to the 84-byte little-endian PoW layout.
    ///
    /// Version(4) | PrevBlock(32) | MerkleRoot(32) | Timestamp(8) | Bits(4) | Nonce(4)
    pub fn serialize(&self) -> [u8; HEADER_SIZE] {
        let mut header = [0u8; HEADER_SIZE];
        header[..NONCE_OFFSET].copy_from_slice(&self.serialize_without_nonce());
        header[NONCE_OFFSET..].copy_from_slice(&self.nonce.to_le_bytes());
        header
    }

    /// Serialize the header without the nonce (80 bytes).
    /// Used when only the nonce changes between attempts.
    pub fn serialize_without_nonce(&self) -> [u8; NONCE_OFFSET] {
        let mut header = [0u8; NONCE_OFFSET];

        header[0..4].copy_from_slice(&self.version.to_le_bytes());
        header[4..36].copy_from_slice(&self.prev_block);
        header[36..68].copy_from_slice(&self.merkle_root);
        // Negative timestamps keep their two's complement bit pattern.
        header[68..76].copy_from_slice(&self.timestamp.to_le_bytes());
        header[76..80].copy_from_slice(&self.bits.to_le_bytes());

        header
    }

    /// Parse a header from its 84-byte serialized form.
    ///
    /// The solution field is not part of the layout and comes back empty.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HeaderError> {
        if bytes.len() != HEADER_SIZE {
            return Err(HeaderError::InvalidLength {
                expected: HEADER_SIZE,
                got: bytes.len(),
            });
        }

        let mut prev_block = [0u8; 32];
        prev_block.copy_from_slice(&bytes[4..36]);
        let mut merkle_root = [0u8; 32];
        merkle_root.copy_from_slice(&bytes[36..68]);

        Ok(BlockHeader {
            version: i32::from_le_bytes(le_array(&bytes[0..4])),
            prev_block,
            merkle_root,
            timestamp: i64::from_le_bytes(le_array(&bytes[68..76])),
            bits: u32::from_le_bytes(le_array(&bytes[76..80])),
            nonce: u32::from_le_bytes(le_array(&bytes[80..84])),
            solution: Vec::new(),
        })
    }

    /// Compute the DarkMatter proof-of-work hash of this header.
    pub fn pow_hash(&self) -> [u8; 32] {
        darkmatter_hash(self)
    }

    /// Decode the target encoded in `bits`.
    pub fn target(&self) -> Target {
        decode_compact(self.bits)
    }
}

/// Parse a 32-byte digest from hex, for header fields supplied as text.
pub fn parse_digest(field: &'static str, hex_str: &str) -> Result<[u8; 32], HeaderError> {
    let bytes = hex::decode(hex_str.trim()).map_err(|_| HeaderError::InvalidHex { field })?;

    if bytes.len() != 32 {
        return Err(HeaderError::InvalidDigestLength {
            field,
            got: bytes.len(),
        });
    }

    let mut digest = [0u8; 32];
    digest.copy_from_slice(&bytes);
    Ok(digest)
}

fn le_array<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_header_serialization() {
        let prev_block = [0x12u8; 32];
        let merkle_root = [0x34u8; 32];
        let timestamp = 1_700_000_000i64;
        let bits = 0x1d00ffffu32;

        let mut header = BlockHeader::new(prev_block, merkle_root, timestamp, bits);
        header.nonce = 0xDEADBEEF;

        let serialized = header.serialize();

        assert_eq!(serialized.len(), 84);
        assert_eq!(&serialized[0..4], &[0x01, 0x00, 0x00, 0x00]);
        assert_eq!(&serialized[4..36], &prev_block[..]);
        assert_eq!(&serialized[36..68], &merkle_root[..]);
        assert_eq!(&serialized[68..76], &timestamp.to_le_bytes());
        assert_eq!(&serialized[76..80], &[0xff, 0xff, 0x00, 0x1d]);
        assert_eq!(&serialized[80..84], &[0xEF, 0xBE, 0xAD, 0xDE]);
    }

    #[test]
    fn test_serialization_golden() {
        let header = BlockHeader::new([0u8; 32], [0u8; 32], 0, 0x1d00ffff);

        let expected = hex::decode(concat!(
            "01000000",
            "0000000000000000000000000000000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000000",
            "0000000000000000",
            "ffff001d",
            "00000000",
        ))
        .unwrap();

        assert_eq!(header.serialize().as_slice(), expected.as_slice());
    }

    #[test]
    fn test_negative_fields_serialization() {
        let prev_block: [u8; 32] = core::array::from_fn(|i| i as u8);
        let merkle_root: [u8; 32] = core::array::from_fn(|i| (i + 32) as u8);
        let header = BlockHeader {
            version: -2,
            prev_block,
            merkle_root,
            timestamp: -1,
            bits: 0x207fffff,
            nonce: 0xdeadbeef,
            solution: Vec::new(),
        };

        let expected = hex::decode(concat!(
            "feffffff",
            "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
            "202122232425262728292a2b2c2d2e2f303132333435363738393a3b3c3d3e3f",
            "ffffffffffffffff",
            "ffff7f20",
            "efbeadde",
        ))
        .unwrap();

        assert_eq!(header.serialize().as_slice(), expected.as_slice());
        assert_eq!(BlockHeader::from_bytes(&expected).unwrap(), header);
    }

    #[test]
    fn test_without_nonce_is_prefix() {
        let mut header = BlockHeader::new([7u8; 32], [9u8; 32], 1_763_856_000, 0x2000ffff);
        header.nonce = 42;

        let full = header.serialize();
        assert_eq!(&full[..NONCE_OFFSET], &header.serialize_without_nonce()[..]);
    }

    #[test]
    fn test_from_bytes_ignores_solution() {
        let mut header = BlockHeader::new([1u8; 32], [2u8; 32], 1_700_000_000, 0x1f00ffff);
        header.nonce = 99;
        header.solution = alloc::vec![1, 2, 3];

        let parsed = BlockHeader::from_bytes(&header.serialize()).unwrap();
        assert_eq!(parsed.nonce, 99);
        assert!(parsed.solution.is_empty());
        assert_eq!(parsed.pow_hash(), header.pow_hash());
    }

    #[test]
    fn test_from_bytes_wrong_length() {
        let err = BlockHeader::from_bytes(&[0u8; 80]).unwrap_err();
        assert_eq!(err, HeaderError::InvalidLength { expected: 84, got: 80 });
    }

    #[test]
    fn test_parse_digest() {
        let digest = parse_digest("prev_block", &"ab".repeat(32)).unwrap();
        assert_eq!(digest, [0xab; 32]);

        assert_eq!(
            parse_digest("prev_block", "zz"),
            Err(HeaderError::InvalidHex { field: "prev_block" })
        );
        assert_eq!(
            parse_digest("merkle_root", "abcd"),
            Err(HeaderError::InvalidDigestLength { field: "merkle_root", got: 2 })
        );
    }
}
