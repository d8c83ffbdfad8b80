//! Key generation.
//!
//! A candidate is the prefix plus `body_len - 1` random symbols. The final
//! symbol is solved so the weighted checksum reduces to zero. When no
//! alphabet symbol reaches the needed residue the whole candidate is
//! discarded and redrawn, up to [`KeyScheme::max_attempts`] times.

use crate::checksum::solve_final_symbol;
use crate::error::{LicenseError, LicenseResult};
use crate::key::LicenseKey;
use crate::scheme::KeyScheme;
use crate::validator::KeyValidator;
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info};

/// Produces checksum-valid keys from an injected random source.
#[derive(Debug)]
pub struct KeyGenerator<R> {
    validator: KeyValidator,
    rng: R,
    keys_issued: u64,
    total_attempts: u64,
}

impl KeyGenerator<ThreadRng> {
    /// Generator for the production scheme backed by the thread-local RNG.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            validator: KeyValidator::default(),
            rng: rand::thread_rng(),
            keys_issued: 0,
            total_attempts: 0,
        }
    }

    /// Generator for `scheme` backed by the thread-local RNG.
    pub fn with_scheme(scheme: KeyScheme) -> LicenseResult<Self> {
        Self::new(scheme, rand::thread_rng())
    }
}

impl KeyGenerator<StdRng> {
    /// Deterministic generator seeded from `seed`.
    pub fn seeded(scheme: KeyScheme, seed: u64) -> LicenseResult<Self> {
        Self::new(scheme, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> KeyGenerator<R> {
    /// Creates a generator for `scheme` drawing symbols from `rng`.
    pub fn new(scheme: KeyScheme, rng: R) -> LicenseResult<Self> {
        Ok(Self {
            validator: KeyValidator::new(scheme)?,
            rng,
            keys_issued: 0,
            total_attempts: 0,
        })
    }

    /// Returns the scheme keys are generated under.
    #[must_use]
    pub fn scheme(&self) -> &KeyScheme {
        self.validator.scheme()
    }

    /// Number of keys returned so far.
    #[must_use]
    pub fn keys_issued(&self) -> u64 {
        self.keys_issued
    }

    /// Number of candidates drawn so far, including discarded ones.
    #[must_use]
    pub fn total_attempts(&self) -> u64 {
        self.total_attempts
    }

    /// Generates one key.
    ///
    /// # Errors
    ///
    /// Returns [`LicenseError::KeyGenerationExhausted`] if no candidate could
    /// be completed within the scheme's attempt cap.
    pub fn generate(&mut self) -> LicenseResult<LicenseKey> {
        self.generate_with(solve_final_symbol)
    }

    /// Retry loop around `solve`, which picks the final symbol for a
    /// random body. Every completed candidate is re-checked by the validator.
    fn generate_with<F>(&mut self, solve: F) -> LicenseResult<LicenseKey>
    where
        F: Fn(&KeyScheme, &[u8]) -> Option<u8>,
    {
        let max_attempts = self.scheme().max_attempts;
        let mut self_check_failures = 0u32;

        for attempt in 1..=max_attempts {
            self.total_attempts += 1;

            let mut body = self.draw_random_body();
            let Some(last) = solve(self.scheme(), &body) else {
                debug!(attempt, "no symbol completes candidate, redrawing");
                continue;
            };
            body.push(last);

            let key = LicenseKey::from_parts(self.scheme(), &body);
            if let Err(e) = self.validator.check(key.as_str()) {
                self_check_failures += 1;
                error!(attempt, error = %e, "generated key failed self-check");
                continue;
            }

            self.keys_issued += 1;
            debug!(attempt, "license key generated");
            return Ok(key);
        }

        error!(
            attempts = max_attempts,
            self_check_failures, "license key generation exhausted"
        );
        Err(LicenseError::KeyGenerationExhausted {
            attempts: max_attempts,
            self_check_failures,
        })
    }

    /// Generates `count` keys, stopping at the first failure.
    pub fn generate_many(&mut self, count: usize) -> LicenseResult<Vec<LicenseKey>> {
        let attempts_before = self.total_attempts;
        let keys = (0..count)
            .map(|_| self.generate())
            .collect::<LicenseResult<Vec<_>>>()?;
        info!(
            count,
            attempts = self.total_attempts - attempts_before,
            "generated license key batch"
        );
        Ok(keys)
    }

    fn draw_random_body(&mut self) -> Vec<u8> {
        let scheme = self.validator.scheme();
        let alphabet = scheme.alphabet.as_bytes();
        let random_len = scheme.body_len() - 1;
        let mut body = Vec::with_capacity(scheme.body_len());
        for _ in 0..random_len {
            body.push(alphabet[self.rng.gen_range(0..alphabet.len())]);
        }
        body
    }
}
