//! License key parsing and formatting.
//!
//! License keys use the format: `MDPDF-XXXX-XXXX-XXXX-XXXX`
//!
//! Parsing strips the literal prefix and every hyphen after it; what is
//! left must be exactly the 16 body symbols. Whitespace is not a symbol and
//! is rejected like any other foreign character.
//!
//! Each `X` is drawn from `A-Z0-9`. Removing the hyphens leaves a
//! 21-character string whose position-weighted checksum (see
//! [`crate::checksum`]) is zero modulo 97.

use crate::checksum::key_checksum;
use crate::error::{LicenseError, LicenseResult};
use crate::scheme::{KeyScheme, GROUP_SEPARATOR, MDPDF_SCHEME};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A parsed and checksum-verified license key in display form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LicenseKey {
    /// The formatted key string.
    raw: String,
    /// Byte offset of the first body symbol in `raw`.
    body_start: usize,
    /// Symbols per display group.
    group_len: usize,
}

impl LicenseKey {
    /// Parses and verifies a key against the production scheme.
    ///
    /// The prefix must come first; hyphens after it are ignored, so
    /// `MDPDFIEQH524YNG5BY1AC` and `MDPDF-IEQH-524Y-NG5B-Y1AC` are the same
    /// key. The returned key is always in display form.
    ///
    /// # Errors
    ///
    /// Returns an error if the key format is invalid or the checksum fails.
    pub fn parse(key: &str) -> LicenseResult<Self> {
        Self::parse_unchecked(key, &MDPDF_SCHEME)
    }

    /// Parses and verifies a key against a custom scheme.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::InvalidScheme`] if `scheme` is unusable, or a
    /// format or checksum error for the key.
    pub fn parse_with_scheme(key: &str, scheme: &KeyScheme) -> LicenseResult<Self> {
        scheme.validate()?;
        Self::parse_unchecked(key, scheme)
    }

    /// Parses against a scheme that has already been validated.
    pub(crate) fn parse_unchecked(key: &str, scheme: &KeyScheme) -> LicenseResult<Self> {
        let Some(rest) = key.strip_prefix(scheme.prefix.as_str()) else {
            return Err(LicenseError::InvalidKeyFormat(format!(
                "key must start with {}",
                scheme.prefix
            )));
        };

        let mut body = Vec::with_capacity(scheme.body_len());
        for ch in rest.chars().filter(|&c| c != GROUP_SEPARATOR) {
            let position = scheme.prefix.len() + body.len() + 1;
            if !ch.is_ascii() || !scheme.contains_symbol(ch as u8) {
                return Err(LicenseError::InvalidCharacter {
                    character: ch,
                    position,
                });
            }
            body.push(ch as u8);
        }
        if body.len() != scheme.body_len() {
            return Err(LicenseError::InvalidKeyFormat(format!(
                "expected {} symbols after {}, found {}",
                scheme.body_len(),
                scheme.prefix,
                body.len()
            )));
        }

        let residue = key_checksum(scheme, &body);
        if residue != 0 {
            return Err(LicenseError::ChecksumMismatch { residue });
        }

        Ok(Self::from_parts(scheme, &body))
    }

    /// Formats a prefix and body into display form without verification.
    pub(crate) fn from_parts(scheme: &KeyScheme, body: &[u8]) -> Self {
        let mut raw = String::with_capacity(scheme.display_len());
        raw.push_str(&scheme.prefix);
        for group in body.chunks(scheme.group_len) {
            raw.push(GROUP_SEPARATOR);
            raw.extend(group.iter().map(|&b| char::from(b)));
        }
        Self {
            raw,
            body_start: scheme.prefix.len() + 1,
            group_len: scheme.group_len,
        }
    }

    /// Returns the formatted key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the literal prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.raw[..self.body_start - 1]
    }

    /// Returns the display groups after the prefix.
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.raw[self.body_start..].split(GROUP_SEPARATOR)
    }

    /// Returns the body symbols without separators.
    #[must_use]
    pub fn body(&self) -> String {
        self.groups().collect()
    }

    /// Returns the checksummed string: prefix followed by the body.
    #[must_use]
    pub fn compact(&self) -> String {
        format!("{}{}", self.prefix(), self.body())
    }

    /// Symbols per display group.
    #[must_use]
    pub fn group_len(&self) -> usize {
        self.group_len
    }

    /// Consumes the key, returning the formatted string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.raw
    }
}

impl fmt::Display for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for LicenseKey {
    type Err = LicenseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for LicenseKey {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl Serialize for LicenseKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for LicenseKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
