//! Property-based tests for license keys.
//!
//! These verify properties that must hold for every key:
//! - Generated keys validate and have the display shape
//! - Any single-symbol substitution is detected
//! - Swapping two different symbols is detected
//! - Validation never panics and is deterministic
//! - Hyphen placement after the prefix does not matter

mod common;

use common::{checksum_by_hand, has_display_shape};
use mdpdf_license::{is_valid_key, KeyGenerator, KeyScheme, LicenseKey, DEFAULT_ALPHABET};
use proptest::prelude::*;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn generated_key(seed: u64) -> LicenseKey {
    KeyGenerator::seeded(KeyScheme::mdpdf(), seed)
        .unwrap()
        .generate()
        .unwrap()
}

/// Byte offsets of body symbols inside a display key.
fn body_offsets() -> Vec<usize> {
    (0..16).map(|i| 6 + i + i / 4).collect()
}

fn symbol_strategy() -> impl Strategy<Value = u8> {
    prop::sample::select(DEFAULT_ALPHABET.as_bytes().to_vec())
}

fn replace_at(key: &str, offset: usize, symbol: u8) -> String {
    let mut bytes = key.as_bytes().to_vec();
    bytes[offset] = symbol;
    String::from_utf8(bytes).unwrap()
}

// =============================================================================
// GENERATION PROPERTIES
// =============================================================================

mod generation_properties {
    use super::*;

    proptest! {
        /// Every generated key validates and has the display shape
        #[test]
        fn generated_keys_are_valid(seed in any::<u64>()) {
            let key = generated_key(seed);
            prop_assert!(is_valid_key(key.as_str()));
            prop_assert!(has_display_shape(key.as_str()));
            prop_assert_eq!(checksum_by_hand(key.as_str()), 0);
        }

        /// Re-parsing a generated key yields the same key
        #[test]
        fn generated_keys_reparse(seed in any::<u64>()) {
            let key = generated_key(seed);
            let parsed = LicenseKey::parse(key.as_str()).unwrap();
            prop_assert_eq!(parsed, key);
        }
    }
}

// =============================================================================
// TAMPER DETECTION PROPERTIES
// =============================================================================

mod tamper_properties {
    use super::*;

    proptest! {
        /// Replacing one body symbol with a different one breaks the checksum
        #[test]
        fn single_substitution_detected(
            seed in any::<u64>(),
            index in 0usize..16,
            symbol in symbol_strategy(),
        ) {
            let key = generated_key(seed);
            let offset = body_offsets()[index];
            prop_assume!(key.as_str().as_bytes()[offset] != symbol);

            let tampered = replace_at(key.as_str(), offset, symbol);
            prop_assert!(!is_valid_key(&tampered));
        }

        /// Swapping two different body symbols breaks the checksum
        #[test]
        fn transposition_detected(
            seed in any::<u64>(),
            i in 0usize..16,
            j in 0usize..16,
        ) {
            let key = generated_key(seed);
            let offsets = body_offsets();
            let bytes = key.as_str().as_bytes();
            let (a, b) = (bytes[offsets[i]], bytes[offsets[j]]);
            prop_assume!(a != b);

            let swapped = replace_at(&replace_at(key.as_str(), offsets[i], b), offsets[j], a);
            prop_assert!(!is_valid_key(&swapped));
        }

        /// Lowercasing any letter in a key is rejected
        #[test]
        fn lowercase_rejected(seed in any::<u64>(), index in 0usize..16) {
            let key = generated_key(seed);
            let offset = body_offsets()[index];
            let symbol = key.as_str().as_bytes()[offset];
            prop_assume!(symbol.is_ascii_uppercase());

            let lowered = replace_at(key.as_str(), offset, symbol.to_ascii_lowercase());
            prop_assert!(!is_valid_key(&lowered));
        }
    }
}

// =============================================================================
// VALIDATION PROPERTIES
// =============================================================================

mod validation_properties {
    use super::*;

    proptest! {
        /// Validation is total and deterministic over arbitrary strings
        #[test]
        fn arbitrary_input_never_panics(input in ".*") {
            prop_assert_eq!(is_valid_key(&input), is_valid_key(&input));
        }

        /// Shaped input validates exactly when the hand-computed checksum is zero
        #[test]
        fn shaped_input_matches_checksum(body in "[A-Z0-9]{16}") {
            let display = format!(
                "MDPDF-{}-{}-{}-{}",
                &body[0..4], &body[4..8], &body[8..12], &body[12..16]
            );
            prop_assert_eq!(is_valid_key(&display), checksum_by_hand(&display) == 0);
        }

        /// Hyphens after the prefix do not change the verdict
        #[test]
        fn separator_placement_ignored(
            seed in any::<u64>(),
            cuts in prop::collection::vec(any::<bool>(), 16),
        ) {
            let key = generated_key(seed);
            let mut regrouped = String::from("MDPDF");
            for (symbol, cut) in key.body().chars().zip(cuts) {
                if cut {
                    regrouped.push('-');
                }
                regrouped.push(symbol);
            }
            let parsed = LicenseKey::parse(&regrouped).unwrap();
            prop_assert_eq!(parsed, key);
        }

        /// Strings of the wrong length are always rejected
        #[test]
        fn wrong_length_rejected(body in "[A-Z0-9]{0,15}|[A-Z0-9]{17,24}") {
            let candidate = format!("MDPDF-{body}");
            prop_assert!(!is_valid_key(&candidate));
        }
    }
}
