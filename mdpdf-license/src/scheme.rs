//! Key scheme configuration.
//!
//! A [`KeyScheme`] bundles everything the generator and validator agree on:
//! the literal prefix, the symbol alphabet, the checksum modulus, the
//! display grouping and the retry cap. [`KeyScheme::mdpdf`] is the scheme
//! every issued key was produced with and must not change.

use crate::error::{LicenseError, LicenseResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

/// Literal prefix of production keys.
pub const DEFAULT_PREFIX: &str = "MDPDF";

/// Symbols used for every body position, in solver search order.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Checksum modulus.
pub const DEFAULT_MODULUS: u32 = 97;

/// Symbols per display group.
pub const DEFAULT_GROUP_LEN: usize = 4;

/// Display groups after the prefix.
pub const DEFAULT_GROUP_COUNT: usize = 4;

/// Candidates tried before generation gives up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 256;

/// Separator between the prefix and each display group.
pub const GROUP_SEPARATOR: char = '-';

/// The production scheme, built once.
pub(crate) static MDPDF_SCHEME: LazyLock<KeyScheme> = LazyLock::new(KeyScheme::mdpdf);

/// Parameters of a checksum license key scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyScheme {
    /// Literal prefix, checksummed but never random.
    pub prefix: String,
    /// Ordered symbol set for body positions.
    pub alphabet: String,
    /// Checksum modulus; valid keys reduce to zero.
    pub modulus: u32,
    /// Symbols per display group.
    pub group_len: usize,
    /// Number of display groups.
    pub group_count: usize,
    /// Upper bound on generation attempts.
    pub max_attempts: u32,
}

impl Default for KeyScheme {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            alphabet: DEFAULT_ALPHABET.to_string(),
            modulus: DEFAULT_MODULUS,
            group_len: DEFAULT_GROUP_LEN,
            group_count: DEFAULT_GROUP_COUNT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl KeyScheme {
    /// The production `MDPDF-XXXX-XXXX-XXXX-XXXX` scheme.
    #[must_use]
    pub fn mdpdf() -> Self {
        Self::default()
    }

    /// Parses a scheme from JSON. Missing fields fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the scheme is invalid.
    pub fn from_json(json: &str) -> LicenseResult<Self> {
        let scheme: Self = serde_json::from_str(json)?;
        scheme.validate()?;
        Ok(scheme)
    }

    /// Loads a scheme from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> LicenseResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Checks that the scheme can produce and recognise keys.
    pub fn validate(&self) -> LicenseResult<()> {
        let invalid = |msg: &str| Err(LicenseError::InvalidScheme(msg.to_string()));

        if self.prefix.is_empty() {
            return invalid("prefix must not be empty");
        }
        if !self.prefix.bytes().all(is_symbol_byte) {
            return invalid("prefix must be printable ASCII without separators");
        }
        if self.alphabet.is_empty() {
            return invalid("alphabet must not be empty");
        }
        if !self.alphabet.bytes().all(is_symbol_byte) {
            return invalid("alphabet must be printable ASCII without separators");
        }
        let unique: BTreeSet<u8> = self.alphabet.bytes().collect();
        if unique.len() != self.alphabet.len() {
            return invalid("alphabet must not contain duplicate symbols");
        }
        if self.modulus < 2 {
            return invalid("modulus must be at least 2");
        }
        if self.group_len == 0 || self.group_count == 0 {
            return invalid("group length and count must be nonzero");
        }
        if self.max_attempts == 0 {
            return invalid("max_attempts must be nonzero");
        }
        Ok(())
    }

    /// Number of symbols after the prefix (random symbols plus the solved one).
    #[must_use]
    pub fn body_len(&self) -> usize {
        self.group_len * self.group_count
    }

    /// Length of the string the checksum is computed over.
    #[must_use]
    pub fn checksum_len(&self) -> usize {
        self.prefix.len() + self.body_len()
    }

    /// 1-indexed position of the solved final symbol.
    #[must_use]
    pub fn solved_position(&self) -> usize {
        self.checksum_len()
    }

    /// Length of a formatted display key.
    #[must_use]
    pub fn display_len(&self) -> usize {
        self.checksum_len() + self.group_count
    }

    /// Returns true if `byte` is one of the alphabet symbols.
    #[must_use]
    pub fn contains_symbol(&self, byte: u8) -> bool {
        self.alphabet.as_bytes().contains(&byte)
    }

    /// Residues the solved symbol can contribute, sorted and deduplicated.
    ///
    /// A candidate can only be completed when its needed residue is in this
    /// set, so its size bounds the per-attempt success rate.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidScheme`] if the scheme is unusable.
    pub fn reachable_residues(&self) -> LicenseResult<Vec<u32>> {
        self.validate()?;
        let weight = self.solved_weight();
        let residues: BTreeSet<u32> = self
            .alphabet
            .bytes()
            .map(|b| weighted_residue(b, weight, self.modulus))
            .collect();
        Ok(residues.into_iter().collect())
    }

    /// Probability that a single attempt can be completed, assuming the
    /// needed residue is uniformly distributed.
    pub fn solve_probability(&self) -> LicenseResult<f64> {
        let reachable = self.reachable_residues()?.len();
        Ok(reachable as f64 / f64::from(self.modulus))
    }

    /// Probability that all `max_attempts` attempts fail.
    pub fn exhaustion_probability(&self) -> LicenseResult<f64> {
        let miss = 1.0 - self.solve_probability()?;
        Ok(miss.powf(f64::from(self.max_attempts)))
    }

    pub(crate) fn solved_weight(&self) -> u64 {
        self.solved_position() as u64
    }
}

/// `(code * weight) mod modulus` for one symbol.
pub(crate) fn weighted_residue(byte: u8, weight: u64, modulus: u32) -> u32 {
    ((u64::from(byte) * weight) % u64::from(modulus)) as u32
}

fn is_symbol_byte(byte: u8) -> bool {
    byte.is_ascii_graphic() && byte != GROUP_SEPARATOR as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_dimensions() {
        let scheme = KeyScheme::mdpdf();
        assert_eq!(scheme.body_len(), 16);
        assert_eq!(scheme.checksum_len(), 21);
        assert_eq!(scheme.solved_position(), 21);
        assert_eq!(scheme.display_len(), "MDPDF-XXXX-XXXX-XXXX-XXXX".len());
    }

    #[test]
    fn shared_production_scheme() {
        assert_eq!(*MDPDF_SCHEME, KeyScheme::mdpdf());
        assert!(MDPDF_SCHEME.validate().is_ok());
    }

    #[test]
    fn weighted_residue_matches_manual() {
        // 'A' = 65, 65 * 21 = 1365, 1365 mod 97 = 7
        assert_eq!(weighted_residue(b'A', 21, 97), 7);
    }

    #[test]
    fn separator_is_not_a_symbol() {
        assert!(!is_symbol_byte(b'-'));
        assert!(!is_symbol_byte(b' '));
        assert!(is_symbol_byte(b'Z'));
    }
}
