//! Error types for the licensing module.

use thiserror::Error;

/// Licensing-specific errors.
#[derive(Debug, Error)]
pub enum LicenseError {
    /// Invalid license key format.
    #[error("invalid license key format: {0}")]
    InvalidKeyFormat(String),

    /// A key symbol is outside the scheme alphabet.
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// 1-indexed position in the de-hyphenated key.
        position: usize,
    },

    /// The weighted checksum did not reduce to zero.
    #[error("license key checksum mismatch (residue {residue})")]
    ChecksumMismatch {
        /// The nonzero checksum residue.
        residue: u32,
    },

    /// The generator ran out of attempts without producing a valid key.
    #[error(
        "key generation exhausted after {attempts} attempts ({self_check_failures} self-check failures)"
    )]
    KeyGenerationExhausted {
        /// Number of candidates tried.
        attempts: u32,
        /// Candidates whose recomputed checksum disagreed with the solver.
        self_check_failures: u32,
    },

    /// The key scheme configuration is unusable.
    #[error("invalid key scheme: {0}")]
    InvalidScheme(String),

    /// I/O error while reading a scheme file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for license operations.
pub type LicenseResult<T> = Result<T, LicenseError>;
