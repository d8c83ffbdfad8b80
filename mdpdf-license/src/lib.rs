//! Offline license keys for MD to PDF Converter.
//!
//! This module handles:
//! - Generating short alphanumeric license keys with an embedded checksum
//! - Validating presented keys offline, with no server or key database
//!
//! # License Key Format
//!
//! Keys are formatted as: `MDPDF-XXXX-XXXX-XXXX-XXXX`
//!
//! With the hyphens removed, the sum over every character of
//! `ascii_code * position` (1-indexed) is divisible by 97. The last symbol is
//! solved at generation time to satisfy this.
//!
//! The checksum is a proof-of-purchase convenience, not a security
//! boundary: it is trivially forgeable and offers no revocation or expiry.

mod checksum;
mod error;
mod generator;
mod key;
mod scheme;
mod validator;

pub use error::{LicenseError, LicenseResult};
pub use generator::KeyGenerator;
pub use key::LicenseKey;
pub use scheme::{
    KeyScheme, DEFAULT_ALPHABET, DEFAULT_GROUP_COUNT, DEFAULT_GROUP_LEN, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_MODULUS, DEFAULT_PREFIX, GROUP_SEPARATOR,
};
pub use validator::KeyValidator;

/// Generates one production key using the thread-local RNG.
///
/// # Errors
///
/// Returns [`LicenseError::KeyGenerationExhausted`] if the retry cap is hit.
pub fn generate_key() -> LicenseResult<LicenseKey> {
    KeyGenerator::from_entropy().generate()
}

/// Returns true if `candidate` is a valid production key.
#[must_use]
pub fn is_valid_key(candidate: &str) -> bool {
    LicenseKey::parse(candidate).is_ok()
}
