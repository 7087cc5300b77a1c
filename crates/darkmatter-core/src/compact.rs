//! Compact "bits" difficulty encoding and target comparison.
//!
//! Layout: `[exponent:8][sign:1][mantissa:23]`. The value is
//! `mantissa * 256^(exponent - 3)`, negated when the sign bit is set.

use num_bigint::{BigInt, Sign};
use num_traits::{Signed, ToPrimitive, Zero};

/// Arbitrary-precision proof-of-work target.
///
/// Signed, because a compact value with the sign bit set decodes to a
/// negative target that no hash can meet.
pub type Target = BigInt;

const MANTISSA_MASK: u32 = 0x007f_ffff;
const SIGN_BIT: u32 = 0x0080_0000;

/// Convert compact "bits" to a target.
pub fn decode_compact(compact: u32) -> Target {
    let mut mantissa = compact & MANTISSA_MASK;
    let is_negative = compact & SIGN_BIT != 0;
    let exponent = compact >> 24;

    let target = if exponent <= 3 {
        mantissa >>= 8 * (3 - exponent);
        BigInt::from(mantissa)
    } else {
        BigInt::from(mantissa) << ((8 * (exponent - 3)) as usize)
    };

    if is_negative {
        -target
    } else {
        target
    }
}

/// Convert a target back to compact "bits".
///
/// Lossy below the top three bytes of magnitude. When the leading mantissa
/// byte is `>= 0x80` the result has the sign bit set and decodes negative;
/// such targets do not round-trip.
pub fn encode_compact(target: &Target) -> u32 {
    if target.is_zero() {
        return 0;
    }

    let (sign, bytes) = target.to_bytes_be();
    let size = bytes.len() as u32;

    let mut compact = if size <= 3 {
        let mut mantissa = 0u32;
        for byte in &bytes {
            mantissa = (mantissa << 8) | *byte as u32;
        }
        mantissa << (8 * (3 - size))
    } else {
        (bytes[0] as u32) << 16 | (bytes[1] as u32) << 8 | bytes[2] as u32
    };

    compact |= size << 24;

    if sign == Sign::Minus {
        compact |= SIGN_BIT;
    }

    compact
}

/// Interpret a digest as an unsigned big-endian integer.
#[inline]
pub fn hash_to_big(hash: &[u8; 32]) -> Target {
    BigInt::from_bytes_be(Sign::Plus, hash)
}

/// Check if a hash meets the target (`hash <= target`).
#[inline]
pub fn hash_meets_target(hash: &[u8; 32], target: &Target) -> bool {
    hash_to_big(hash) <= *target
}

/// Difficulty of `bits` relative to the easiest allowed target.
///
/// Difficulty = pow_limit_target / current_target
pub fn bits_to_difficulty(bits: u32, pow_limit_bits: u32) -> f64 {
    let current = decode_compact(bits);
    let limit = decode_compact(pow_limit_bits);

    if !current.is_positive() {
        return f64::INFINITY;
    }

    let current_f64 = current.to_f64().unwrap_or(f64::INFINITY);
    let limit_f64 = limit.to_f64().unwrap_or(0.0);

    limit_f64 / current_f64
}

/// Format difficulty for display (e.g., "1.23T" for trillion).
pub fn format_difficulty(difficulty: f64) -> alloc::string::String {
    if difficulty >= 1e15 {
        alloc::format!("{:.2}P", difficulty / 1e15)
    } else if difficulty >= 1e12 {
        alloc::format!("{:.2}T", difficulty / 1e12)
    } else if difficulty >= 1e9 {
        alloc::format!("{:.2}G", difficulty / 1e9)
    } else if difficulty >= 1e6 {
        alloc::format!("{:.2}M", difficulty / 1e6)
    } else if difficulty >= 1e3 {
        alloc::format!("{:.2}K", difficulty / 1e3)
    } else {
        alloc::format!("{:.2}", difficulty)
    }
}

/// Estimate average hashes needed to meet `bits`.
///
/// The chance of a uniform 256-bit hash meeting target `T` is `(T + 1) / 2^256`.
pub fn expected_hashes(bits: u32) -> f64 {
    let target = decode_compact(bits);
    if target.is_negative() {
        return f64::INFINITY;
    }

    let space = BigInt::from(1u8) << 256usize;
    let hits = (target + 1u8).to_f64().unwrap_or(f64::INFINITY);
    space.to_f64().unwrap_or(f64::INFINITY) / hits
}
