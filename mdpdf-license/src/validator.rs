//! Offline key validation.

use crate::error::LicenseResult;
use crate::key::LicenseKey;
use crate::scheme::KeyScheme;

/// Decides whether arbitrary strings are valid keys under a scheme.
///
/// Validation needs no network access or stored state; the checksum
/// embedded in the key is the only constraint.
#[derive(Debug, Clone, Default)]
pub struct KeyValidator {
    scheme: KeyScheme,
}

impl KeyValidator {
    /// Creates a validator for `scheme`.
    pub fn new(scheme: KeyScheme) -> LicenseResult<Self> {
        scheme.validate()?;
        Ok(Self { scheme })
    }

    /// Returns the scheme this validator checks against.
    #[must_use]
    pub fn scheme(&self) -> &KeyScheme {
        &self.scheme
    }

    /// Parses `input`, reporting why it is not a key.
    pub fn check(&self, input: &str) -> LicenseResult<LicenseKey> {
        LicenseKey::parse_unchecked(input, &self.scheme)
    }

    /// Returns true if `input` is a well-formed key with a zero checksum.
    ///
    /// Malformed input is simply `false`.
    #[must_use]
    pub fn validate(&self, input: &str) -> bool {
        self.check(input).is_ok()
    }
}
