// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blum-Blum-Shub pseudorandom bit generator.
//!
//! The state is squared modulo a Blum integer `n` once per output bit and the
//! least significant bit of each new state is emitted:
//!
//! ```text
//! x₀ = seed² mod n
//! xᵢ = xᵢ₋₁² mod n,   bitᵢ = xᵢ mod 2    (i ≥ 1)
//! ```
//!
//! `x₀` itself is never emitted, so the parity of the seed square does not leak.

use num_bigint_dig::BigUint;
use num_traits::{One, ToPrimitive, Zero};
use rand::TryRngCore;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::bits::BitSequence;
use crate::error::{Error, Result};
use crate::modulus::Modulus;

/// Running BBS state bound to one modulus.
///
/// The state is a strictly sequential recurrence; it is wiped on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct BbsGenerator {
    #[zeroize(skip)]
    modulus: Modulus,
    state: BigUint,
}

impl BbsGenerator {
    /// Seed a generator from `rng`.
    ///
    /// The seed is `byte_len(n)` random bytes reduced modulo `n`. Seeds whose
    /// square is 0 or 1 are fixed points of the recurrence and are redrawn.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropySourceFailure`] if `rng` fails.
    pub fn new<R: TryRngCore + ?Sized>(modulus: Modulus, rng: &mut R) -> Result<Self> {
        let mut bytes = vec![0u8; modulus.byte_len()];

        loop {
            rng.try_fill_bytes(&mut bytes).map_err(Error::entropy)?;
            let seed = BigUint::from_bytes_be(&bytes) % modulus.value();

            match Self::from_seed(modulus.clone(), seed) {
                Ok(generator) => {
                    bytes.zeroize();
                    return Ok(generator);
                }
                Err(Error::InvalidSeed) => debug!("degenerate seed redrawn"),
                Err(err) => return Err(err),
            }
        }
    }

    /// Build a generator from an explicit seed.
    ///
    /// The output is fully determined by `(seed, modulus)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSeed`] if `seed² mod n` is 0 or 1.
    pub fn from_seed(modulus: Modulus, mut seed: BigUint) -> Result<Self> {
        let state = (&seed * &seed) % modulus.value();
        seed.zeroize();

        if state.is_zero() || state.is_one() {
            return Err(Error::InvalidSeed);
        }

        Ok(Self { modulus, state })
    }

    /// Return the public modulus.
    pub fn modulus(&self) -> &Modulus {
        &self.modulus
    }

    /// Advance the recurrence and return the parity of the new state.
    pub fn next_bit(&mut self) -> bool {
        self.state = (&self.state * &self.state) % self.modulus.value();
        (&self.state % 2u32).to_u32() == Some(1)
    }

    /// Take exactly `length` bits from the stream.
    pub fn take_bits(&mut self, length: usize) -> BitSequence {
        (0..length).map(|_| self.next_bit()).collect()
    }
}

impl Iterator for BbsGenerator {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        Some(self.next_bit())
    }
}

/// Generate a key of exactly `length` bits for `modulus`.
///
/// Every call draws a fresh seed, so keys are never repeated across sessions.
pub fn generate_key<R: TryRngCore + ?Sized>(
    length: usize,
    modulus: &Modulus,
    rng: &mut R,
) -> Result<BitSequence> {
    let mut generator = BbsGenerator::new(modulus.clone(), rng)?;
    let key = generator.take_bits(length);

    debug!(bits = length, modulus_bits = modulus.bits(), "key stream generated");
    Ok(key)
}
