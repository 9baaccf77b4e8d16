// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::ops::Deref;

use num_bigint_dig::BigUint;
use num_traits::{One, ToPrimitive};

use crate::error::{Error, Result};
use crate::prime::Prime;

/// Public BBS modulus `n = p·q`.
///
/// With both factors congruent to 3 mod 4 the product is congruent to 1 mod 4,
/// which is the structural check applied on construction. The factorization
/// itself is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modulus {
    n: BigUint,
}

impl Modulus {
    /// Wrap an existing modulus.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidModulus`] if `n <= 1` or `n mod 4 != 1`.
    pub fn new(n: BigUint) -> Result<Self> {
        if n <= BigUint::one() || (&n % 4u32).to_u32() != Some(1) {
            return Err(Error::InvalidModulus);
        }
        Ok(Self { n })
    }

    /// Return `n`.
    pub fn value(&self) -> &BigUint {
        &self.n
    }

    /// Bit length of `n`.
    pub fn bits(&self) -> usize {
        self.n.bits()
    }

    /// Number of bytes needed to hold `n`.
    pub fn byte_len(&self) -> usize {
        self.n.bits().div_ceil(8)
    }
}

impl Deref for Modulus {
    type Target = BigUint;

    fn deref(&self) -> &Self::Target {
        &self.n
    }
}

/// Multiply two distinct primes into a BBS modulus.
///
/// # Errors
///
/// Returns [`Error::InvalidModulus`] if `p == q`.
pub fn make_modulus(p: &Prime, q: &Prime) -> Result<Modulus> {
    if p == q {
        return Err(Error::InvalidModulus);
    }
    Modulus::new(p.value() * q.value())
}
