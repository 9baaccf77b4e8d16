// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use zeroize::Zeroize;

use crate::error::{Error, Result};

/// An ordered sequence of bits.
///
/// Plaintext, key stream and ciphertext all share this representation. The
/// on-disk form is plain ASCII: one `'0'` or `'1'` per bit, no delimiter,
/// which is what [`Display`](fmt::Display) renders and [`FromStr`] parses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Zeroize)]
pub struct BitSequence {
    bits: Vec<bool>,
}

impl BitSequence {
    /// Wrap bits in order.
    pub fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Expand bytes into bits, most significant bit first.
    pub fn from_bytes<B: AsRef<[u8]>>(bytes: B) -> Self {
        bytes
            .as_ref()
            .iter()
            .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1 == 1))
            .collect()
    }

    /// Pack bits into bytes, most significant bit first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotByteAligned`] if the length is not a multiple of 8.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.bits.len() % 8 != 0 {
            return Err(Error::NotByteAligned { len: self.bits.len() });
        }

        Ok(self
            .bits
            .chunks_exact(8)
            .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit)))
            .collect())
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&bit| bit).count()
    }
}

impl Deref for BitSequence {
    type Target = [bool];

    fn deref(&self) -> &Self::Target {
        &self.bits
    }
}

impl From<Vec<bool>> for BitSequence {
    fn from(bits: Vec<bool>) -> Self {
        Self::new(bits)
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self { bits: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a BitSequence {
    type Item = &'a bool;
    type IntoIter = std::slice::Iter<'a, bool>;

    fn into_iter(self) -> Self::IntoIter {
        self.bits.iter()
    }
}

impl fmt::Display for BitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: String = self.bits.iter().map(|&bit| if bit { '1' } else { '0' }).collect();
        f.write_str(&rendered)
    }
}

impl FromStr for BitSequence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.chars()
            .enumerate()
            .map(|(index, character)| match character {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(Error::InvalidBitCharacter { character, index }),
            })
            .collect()
    }
}

/// Convert text to bits, eight per character, most significant bit first.
///
/// Every character must fit in a single byte (U+0000 to U+00FF).
pub fn text_to_bits(text: &str) -> Result<BitSequence> {
    let bytes = text
        .chars()
        .enumerate()
        .map(|(index, character)| {
            u8::try_from(character).map_err(|_| Error::CharacterOutOfRange { character, index })
        })
        .collect::<Result<Vec<u8>>>()?;

    Ok(BitSequence::from_bytes(bytes))
}

/// Inverse of [`text_to_bits`].
///
/// # Errors
///
/// Returns [`Error::NotByteAligned`] if the length is not a multiple of 8.
pub fn bits_to_text(bits: &BitSequence) -> Result<String> {
    Ok(bits.to_bytes()?.into_iter().map(char::from).collect())
}
