// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::bits::BitSequence;
use crate::error::{Error, Result};

/// Encrypts a plaintext bit sequence.
pub trait Encrypt {
    /// The plaintext must have exactly the key's length.
    fn encrypt(&self, plaintext: &BitSequence) -> Result<BitSequence>;
}

/// Recovers a plaintext bit sequence.
pub trait Decrypt {
    /// The ciphertext must have exactly the key's length.
    fn decrypt(&self, ciphertext: &BitSequence) -> Result<BitSequence>;
}

/// XOR two bit sequences position by position.
///
/// The operation is its own inverse: `xor_bits(&xor_bits(&m, &k)?, &k)? == m`.
///
/// # Errors
///
/// Returns [`Error::LengthMismatch`] if the inputs differ in length. Inputs are
/// never truncated to the shorter one.
pub fn xor_bits(a: &BitSequence, b: &BitSequence) -> Result<BitSequence> {
    if a.len() != b.len() {
        return Err(Error::LengthMismatch { left: a.len(), right: b.len() });
    }

    Ok(a.iter().zip(b.iter()).map(|(&x, &y)| x ^ y).collect())
}

/// A single-use pad holding the key stream for one message.
///
/// Key bits are wiped when the pad is dropped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct OneTimePad {
    key: BitSequence,
}

impl OneTimePad {
    /// Take ownership of a key stream.
    pub fn new(key: BitSequence) -> Self {
        Self { key }
    }

    /// Return the key stream.
    pub fn key(&self) -> &BitSequence {
        &self.key
    }

    /// Length of the key, and therefore of any message it can encipher.
    pub fn len(&self) -> usize {
        self.key.len()
    }

    /// True for the key of an empty message.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl Encrypt for OneTimePad {
    fn encrypt(&self, plaintext: &BitSequence) -> Result<BitSequence> {
        xor_bits(plaintext, &self.key)
    }
}

impl Decrypt for OneTimePad {
    fn decrypt(&self, ciphertext: &BitSequence) -> Result<BitSequence> {
        xor_bits(ciphertext, &self.key)
    }
}
