//! Proof-of-work engine: verification and sequential nonce search.

use alloc::vec::Vec;
use tracing::{debug, trace};

use crate::compact::{decode_compact, hash_meets_target};
use crate::hash::{darkmatter_hash, darkmatter_hash_bytes};
use crate::header::{BlockHeader, HEADER_SIZE, NONCE_OFFSET};
use crate::params::PowParams;

/// Length of the solution bytes returned by a successful search.
pub const SOLUTION_SIZE: usize = 16;

/// A proof-of-work algorithm.
///
/// `solve` and `solve_with_limit` write every candidate nonce into the
/// header they are given; the header is left holding the last nonce tried.
pub trait PowEngine {
    /// Check whether the header's hash meets the target encoded in its bits.
    fn verify(&self, header: &BlockHeader) -> bool;

    /// Search for a nonce with the engine's default attempt budget.
    fn solve(&self, header: &mut BlockHeader) -> Option<Solution>;

    /// Search nonces `0..max_attempts` in order and return the first match.
    fn solve_with_limit(&self, header: &mut BlockHeader, max_attempts: u32) -> Option<Solution>;
}

/// A nonce that satisfies the target, plus its solution bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solution {
    /// The winning nonce.
    pub nonce: u32,
    /// Little-endian nonce followed by 12 zero bytes.
    ///
    /// Shaped like an AES IV but unrelated to the IV used inside the hash,
    /// which comes from the intermediate digest.
    pub bytes: [u8; SOLUTION_SIZE],
}

impl Solution {
    /// Build the solution record for a nonce.
    pub fn from_nonce(nonce: u32) -> Self {
        let mut bytes = [0u8; SOLUTION_SIZE];
        bytes[..4].copy_from_slice(&nonce.to_le_bytes());
        Solution { nonce, bytes }
    }

    /// Solution bytes as an owned buffer, as stored on a header.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }
}

/// Result of searching a range of nonces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// The nonce that met the target (if found).
    pub nonce: Option<u32>,
    /// The hash of the winning header (if found).
    pub hash: Option<[u8; 32]>,
    /// Number of hashes computed.
    pub hashes_computed: u64,
}

impl SearchResult {
    /// Create a result indicating no match found.
    pub fn not_found(hashes: u64) -> Self {
        SearchResult {
            nonce: None,
            hash: None,
            hashes_computed: hashes,
        }
    }

    /// Create a result indicating a nonce met the target.
    pub fn found(nonce: u32, hash: [u8; 32], hashes: u64) -> Self {
        SearchResult {
            nonce: Some(nonce),
            hash: Some(hash),
            hashes_computed: hashes,
        }
    }

    /// Whether the search found a nonce.
    pub fn is_found(&self) -> bool {
        self.nonce.is_some()
    }

    /// Solution record for the found nonce.
    pub fn solution(&self) -> Option<Solution> {
        self.nonce.map(Solution::from_nonce)
    }
}

/// Search nonces `nonce_start..nonce_start + nonce_count` in ascending order.
///
/// The target is decoded once from `header.bits`. Each candidate is written
/// into `header.nonce` before hashing; the search stops at the first hash
/// `<=` target. The range end saturates at `u32::MAX` (exclusive).
pub fn search_range(header: &mut BlockHeader, nonce_start: u32, nonce_count: u32) -> SearchResult {
    let target = decode_compact(header.bits);

    // Only the nonce changes between attempts.
    let mut serialized = [0u8; HEADER_SIZE];
    serialized[..NONCE_OFFSET].copy_from_slice(&header.serialize_without_nonce());

    let nonce_end = nonce_start.saturating_add(nonce_count);

    for nonce in nonce_start..nonce_end {
        header.nonce = nonce;
        serialized[NONCE_OFFSET..].copy_from_slice(&nonce.to_le_bytes());

        let hash = darkmatter_hash_bytes(&serialized);

        if hash_meets_target(&hash, &target) {
            return SearchResult::found(nonce, hash, (nonce - nonce_start) as u64 + 1);
        }
    }

    SearchResult::not_found((nonce_end - nonce_start) as u64)
}

/// The DarkMatter proof of work: SHA256, then AES-256-CTR keyed by that
/// digest, then SHA256 again.
#[derive(Debug, Clone, Default)]
pub struct DarkMatter {
    params: PowParams,
}

impl DarkMatter {
    /// Create an engine with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom parameters.
    pub fn with_params(params: PowParams) -> Self {
        DarkMatter { params }
    }

    /// The engine's parameters.
    pub fn params(&self) -> &PowParams {
        &self.params
    }

    /// Solve the header and record the nonce and solution bytes on it.
    ///
    /// Returns whether a solution was found within the default budget.
    pub fn mine(&self, header: &mut BlockHeader) -> bool {
        self.mine_with_limit(header, self.params.max_attempts)
    }

    /// Like [`DarkMatter::mine`] with an explicit attempt budget.
    pub fn mine_with_limit(&self, header: &mut BlockHeader, max_attempts: u32) -> bool {
        match self.solve_with_limit(header, max_attempts) {
            Some(solution) => {
                header.nonce = solution.nonce;
                header.solution = solution.to_vec();
                true
            }
            None => false,
        }
    }

    /// Mine the genesis header for the configured network.
    pub fn mine_genesis(&self) -> Option<BlockHeader> {
        let mut genesis = self.params.genesis_header();
        if self.mine_with_limit(&mut genesis, self.params.genesis_max_attempts) {
            Some(genesis)
        } else {
            None
        }
    }
}

impl PowEngine for DarkMatter {
    fn verify(&self, header: &BlockHeader) -> bool {
        let hash = darkmatter_hash(header);
        let valid = hash_meets_target(&hash, &decode_compact(header.bits));
        trace!(bits = header.bits, nonce = header.nonce, valid, "verified header");
        valid
    }

    fn solve(&self, header: &mut BlockHeader) -> Option<Solution> {
        self.solve_with_limit(header, self.params.max_attempts)
    }

    fn solve_with_limit(&self, header: &mut BlockHeader, max_attempts: u32) -> Option<Solution> {
        debug!(bits = header.bits, max_attempts, "searching for nonce");

        let result = search_range(header, 0, max_attempts);

        match result.nonce {
            Some(nonce) => debug!(nonce, attempts = result.hashes_computed, "nonce found"),
            None => debug!(attempts = result.hashes_computed, "no nonce within limit"),
        }

        result.solution()
    }
}
