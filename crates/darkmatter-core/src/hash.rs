//! DarkMatter hashing: SHA256 -> AES-256-CTR -> SHA256.

use aes::cipher::{KeyIvInit, StreamCipher};
use sha2::{Digest, Sha256};

use crate::header::BlockHeader;

type Aes256Ctr = ctr::Ctr128BE<aes::Aes256>;

/// AES block size; the CTR counter block is this long.
const IV_SIZE: usize = 16;

/// Single SHA256 hash.
#[inline]
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let hash = Sha256::digest(data);
    let mut result = [0u8; 32];
    result.copy_from_slice(&hash);
    result
}

/// DarkMatter hash of a block header's 84-byte serialization.
#[inline]
pub fn darkmatter_hash(header: &BlockHeader) -> [u8; 32] {
    darkmatter_hash_bytes(&header.serialize())
}

/// DarkMatter hash of raw bytes.
///
/// 1. `h1 = SHA256(data)`
/// 2. encrypt `h1` with AES-256-CTR, key = `h1`, IV = `h1[..16]`
/// 3. `SHA256(ciphertext)`
///
/// Key and IV both come from `h1`. This is part of the algorithm's identity:
/// every verifier must reproduce it bit for bit.
pub fn darkmatter_hash_bytes(data: &[u8]) -> [u8; 32] {
    let h1 = sha256(data);

    let mut iv = [0u8; IV_SIZE];
    iv.copy_from_slice(&h1[..IV_SIZE]);

    let mut ciphertext = h1;
    let mut cipher = Aes256Ctr::new(&h1.into(), &iv.into());
    cipher.apply_keystream(&mut ciphertext);

    sha256(&ciphertext)
}

/// Hex encoding of a digest, most significant byte first.
pub fn hash_to_hex(hash: &[u8; 32]) -> alloc::string::String {
    hex::encode(hash)
}

/// Count leading zero bits of a digest read as a big-endian integer.
pub fn count_leading_zeros(hash: &[u8; 32]) -> u32 {
    let mut zeros = 0u32;
    for byte in hash.iter() {
        if *byte == 0 {
            zeros += 8;
        } else {
            zeros += byte.leading_zeros();
            break;
        }
    }
    zeros
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256() {
        let expected =
            hex::decode("2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824").unwrap();
        assert_eq!(sha256(b"hello").as_slice(), expected.as_slice());
    }

    #[test]
    fn test_darkmatter_hash_bytes_vectors() {
        let empty =
            hex::decode("f2bd4f6279faa56002bd0841c157e8e75437b942b4d786a46e236d050219070d").unwrap();
        assert_eq!(darkmatter_hash_bytes(b"").as_slice(), empty.as_slice());

        let hello =
            hex::decode("c2666f11bc5d968470e5deda14a13594028760aaea18843417f1145a7483f9bf").unwrap();
        assert_eq!(darkmatter_hash_bytes(b"hello").as_slice(), hello.as_slice());
    }

    #[test]
    fn test_darkmatter_differs_from_double_sha256() {
        let data = b"hello";
        assert_ne!(darkmatter_hash_bytes(data), sha256(&sha256(data)));
    }

    #[test]
    fn test_darkmatter_hash_golden_header() {
        let header = BlockHeader::new([0u8; 32], [0u8; 32], 0, 0x1d00ffff);
        assert_eq!(
            hash_to_hex(&darkmatter_hash(&header)),
            "da17966564b2b5cef2ed80f8fe14ececaf706a3bbc3433f99c6fbeafb4b09355"
        );
    }

    #[test]
    fn test_darkmatter_hash_deterministic() {
        let mut header = BlockHeader::new([3u8; 32], [4u8; 32], 1_700_000_000, 0x2000ffff);
        header.nonce = 12345;

        assert_eq!(darkmatter_hash(&header), darkmatter_hash(&header.clone()));

        header.nonce += 1;
        let other = darkmatter_hash(&header);
        header.nonce -= 1;
        assert_ne!(darkmatter_hash(&header), other);
    }

    #[test]
    fn test_count_leading_zeros() {
        assert_eq!(count_leading_zeros(&[0x00; 32]), 256);

        let mut hash = [0xFF; 32];
        hash[0] = 0x00;
        hash[1] = 0x00;
        hash[2] = 0x0F;
        assert_eq!(count_leading_zeros(&hash), 20);
    }
}
