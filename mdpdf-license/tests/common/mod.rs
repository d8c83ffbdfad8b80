//! Shared test helpers for license tests.

#![allow(dead_code)]

use mdpdf_license::KeyScheme;

/// Keys produced by the original issuing service; they must stay valid.
pub const KNOWN_VALID_KEYS: [&str; 3] = [
    "MDPDF-IEQH-524Y-NG5B-Y1AC",
    "MDPDF-Z0LX-9XF2-6GK7-ZX5H",
    "MDPDF-B4CT-ZKK6-OAM8-9OZN",
];

/// Computes the checksum of a display key by hand, independent of the crate.
pub fn checksum_by_hand(display: &str) -> u64 {
    display
        .chars()
        .filter(|&c| c != '-')
        .enumerate()
        .map(|(i, c)| u64::from(c as u32) * (i as u64 + 1))
        .sum::<u64>()
        % 97
}

/// Returns true if `key` has the `MDPDF-[A-Z0-9]{4}` x4 shape.
pub fn has_display_shape(key: &str) -> bool {
    let parts: Vec<&str> = key.split('-').collect();
    parts.len() == 5
        && parts[0] == "MDPDF"
        && parts[1..].iter().all(|g| {
            g.len() == 4
                && g.chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        })
}

/// Single-symbol scheme whose only candidate, `MDPDF-AAAA-AAAA-AAAA-AAAA`,
/// never reaches a zero checksum.
pub fn unsolvable_scheme(max_attempts: u32) -> KeyScheme {
    KeyScheme {
        alphabet: "A".to_string(),
        max_attempts,
        ..KeyScheme::mdpdf()
    }
}

/// Two-symbol scheme that can only complete roughly 2 in 97 candidates.
pub fn sparse_scheme() -> KeyScheme {
    KeyScheme {
        alphabet: "AB".to_string(),
        max_attempts: 10_000,
        ..KeyScheme::mdpdf()
    }
}
