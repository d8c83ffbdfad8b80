//! Position-weighted modular checksum.
//!
//! The checksum of a string `c_1 c_2 ... c_n` is
//! `sum(code(c_p) * p) mod modulus`, where `code` is the ASCII code point
//! and positions are 1-indexed. Valid keys have a checksum of zero.
//! Generation and validation both go through this module. Callers must
//! pass a validated scheme; a zero modulus is never reduced against.

use crate::scheme::{weighted_residue, KeyScheme};

/// Weighted sum of `bytes` reduced modulo `modulus`, with the first byte at
/// position `start`.
fn weighted_sum_from(bytes: &[u8], start: u64, modulus: u32) -> u32 {
    let m = u64::from(modulus);
    let sum = bytes
        .iter()
        .zip(start..)
        .fold(0u64, |acc, (&b, pos)| (acc + u64::from(b) * pos) % m);
    sum as u32
}

/// Weighted checksum of `bytes` (positions starting at 1).
#[must_use]
pub(crate) fn weighted_checksum(bytes: &[u8], modulus: u32) -> u32 {
    weighted_sum_from(bytes, 1, modulus)
}

/// Checksum of a key given as its prefix and body, without separators.
#[must_use]
pub(crate) fn key_checksum(scheme: &KeyScheme, body: &[u8]) -> u32 {
    let prefix = scheme.prefix.as_bytes();
    let head = weighted_checksum(prefix, scheme.modulus);
    let tail = weighted_sum_from(body, prefix.len() as u64 + 1, scheme.modulus);
    ((u64::from(head) + u64::from(tail)) % u64::from(scheme.modulus)) as u32
}

/// Residue the solved symbol must contribute so a key whose first
/// `checksum_len - 1` characters sum to `partial` reduces to zero.
#[must_use]
pub(crate) fn needed_residue(partial: u32, modulus: u32) -> u32 {
    (modulus - partial % modulus) % modulus
}

/// Finds the first alphabet symbol completing a key whose random body is
/// `random_body`, or `None` if no symbol reaches the needed residue.
#[must_use]
pub(crate) fn solve_final_symbol(scheme: &KeyScheme, random_body: &[u8]) -> Option<u8> {
    let needed = needed_residue(key_checksum(scheme, random_body), scheme.modulus);
    let weight = scheme.solved_weight();
    scheme
        .alphabet
        .bytes()
        .find(|&b| weighted_residue(b, weight, scheme.modulus) == needed)
}
