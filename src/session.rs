// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use rand::TryRngCore;
use tracing::{debug, info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::bbs::generate_key;
use crate::bits::{BitSequence, bits_to_text, text_to_bits};
use crate::error::{Error, Result};
use crate::otp::{Decrypt, Encrypt, OneTimePad};
use crate::prime::{MIN_PAIR_BIT_LENGTH, PrimalityTest, PrimeGenerator, PrimePair};
use crate::stats::RandomnessReport;

/// Artifacts of one encryption session.
///
/// The key is handed to the caller; persisting it is the caller's concern.
/// Key, ciphertext and plaintext are wiped on drop, and `Debug` redacts the
/// key unless the `expose-secret` feature is enabled.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct SessionOutput {
    /// BBS key stream, one bit per plaintext bit.
    pub key: BitSequence,
    pub ciphertext: BitSequence,
    /// Plaintext recovered by decrypting `ciphertext` with `key`.
    pub plaintext: String,
    /// Statistical evaluation of the key stream; `None` for an empty message.
    #[zeroize(skip)]
    pub report: Option<RandomnessReport>,
}

#[cfg(not(feature = "expose-secret"))]
impl std::fmt::Debug for SessionOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionOutput")
            .field("key", &format_args!("<{} bits redacted>", self.key.len()))
            .field("ciphertext", &self.ciphertext)
            .field("plaintext", &self.plaintext)
            .field("report", &self.report)
            .finish()
    }
}

/// One BBS-OTP encryption run: fresh primes, fresh modulus, fresh key.
#[derive(Debug, Clone)]
pub struct Session {
    generator: PrimeGenerator,
    parallel: bool,
}

impl Session {
    /// Create a session with default parameters (512-bit primes, Fermat check).
    pub fn new() -> Self {
        SessionBuilder::new().build()
    }

    /// Start configuring a session.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Return the prime search settings.
    pub fn prime_generator(&self) -> &PrimeGenerator {
        &self.generator
    }

    /// Encrypt `message`, decrypt it again, and score the key stream.
    ///
    /// Primes, modulus and seed are drawn from `rng` unless the session was
    /// built with [`SessionBuilder::parallel`], in which case the primes come
    /// from two OS-seeded generators and only the seed uses `rng`.
    ///
    /// # Errors
    ///
    /// Fails on text outside one byte per character, on entropy or prime
    /// search failure, and with [`Error::RoundTripMismatch`] if decryption
    /// does not reproduce the plaintext bits.
    pub fn run<R: TryRngCore + ?Sized>(&self, message: &str, rng: &mut R) -> Result<SessionOutput> {
        let message_bits = text_to_bits(message)?;
        debug!(bits = message_bits.len(), "message loaded");

        let primes = if self.parallel {
            PrimePair::generate_parallel(&self.generator)?
        } else {
            PrimePair::generate(&self.generator, rng)?
        };
        let modulus = primes.modulus()?;
        drop(primes);
        info!(modulus_bits = modulus.bits(), "generated p, q with p ≡ q ≡ 3 (mod 4)");

        let pad = OneTimePad::new(generate_key(message_bits.len(), &modulus, rng)?);
        let ciphertext = pad.encrypt(&message_bits)?;

        let decrypted = pad.decrypt(&ciphertext)?;
        if decrypted != message_bits {
            return Err(Error::RoundTripMismatch);
        }
        let plaintext = bits_to_text(&decrypted)?;

        let report = if pad.is_empty() { None } else { Some(RandomnessReport::evaluate(pad.key())?) };

        Ok(SessionOutput { key: pad.key().clone(), ciphertext, plaintext, report })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for sessions with configurable prime generation.
#[derive(Debug)]
pub struct SessionBuilder {
    prime_bits: usize,
    primality: PrimalityTest,
    max_attempts: Option<usize>,
    parallel: bool,
}

impl SessionBuilder {
    /// Prime size below which a warning is logged.
    pub const MIN_SECURE_BITS: usize = 512;

    /// Create a builder with default parameters.
    pub fn new() -> Self {
        Self {
            prime_bits: Self::MIN_SECURE_BITS,
            primality: PrimalityTest::default(),
            max_attempts: None,
            parallel: false,
        }
    }

    /// Set the bit length of each prime factor.
    ///
    /// Raised to [`MIN_PAIR_BIT_LENGTH`], the smallest size holding two
    /// distinct primes congruent to 3 mod 4.
    pub fn prime_bits(mut self, bits: usize) -> Self {
        self.prime_bits = bits.max(MIN_PAIR_BIT_LENGTH);
        self
    }

    /// Select the primality check used during the prime search.
    pub fn primality(mut self, test: PrimalityTest) -> Self {
        self.primality = test;
        self
    }

    /// Bound the number of candidates drawn per prime.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Generate p and q concurrently from OS-seeded generators.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Finish configuration, warning if the primes are weak.
    pub fn build(self) -> Session {
        if self.prime_bits < Self::MIN_SECURE_BITS {
            warn!(
                bits = self.prime_bits,
                recommended = Self::MIN_SECURE_BITS,
                "prime size is cryptographically weak"
            );
        }

        let mut generator = PrimeGenerator::new(self.prime_bits).primality(self.primality);
        if let Some(attempts) = self.max_attempts {
            generator = generator.max_attempts(attempts);
        }

        Session { generator, parallel: self.parallel }
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
