// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Errors that can occur while generating keys, enciphering or testing bits.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Entropy source failure: {0}")]
    EntropySourceFailure(String),

    #[error("Bit sequences differ in length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("Invalid modulus: must be a product of two distinct primes congruent to 3 mod 4")]
    InvalidModulus,

    #[error("Invalid seed: squaring it yields a fixed point")]
    InvalidSeed,

    #[error("Invalid bit length: must be at least {min} bits, got {actual}")]
    InvalidBitLength { min: usize, actual: usize },

    #[error("Value is not a prime congruent to 3 mod 4")]
    NotPrime,

    #[error("Prime search gave up after {attempts} candidates")]
    PrimeSearchExhausted { attempts: usize },

    #[error("Bit sequence of length {len} is not a whole number of bytes")]
    NotByteAligned { len: usize },

    #[error("Character {character:?} at index {index} does not fit in one byte")]
    CharacterOutOfRange { character: char, index: usize },

    #[error("Character {character:?} at index {index} is not a bit")]
    InvalidBitCharacter { character: char, index: usize },

    #[error("Statistical test requires a non-empty bit sequence")]
    EmptySequence,

    #[error("Decrypted bits do not match the plaintext")]
    RoundTripMismatch,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap a failure reported by a random number source.
    pub(crate) fn entropy<E: std::fmt::Display>(err: E) -> Self {
        Error::EntropySourceFailure(err.to_string())
    }
}
