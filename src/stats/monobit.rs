// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::f64::consts::SQRT_2;

use super::{TestVerdict, erfc};
use crate::bits::BitSequence;
use crate::error::{Error, Result};

/// Frequency (monobit) test.
///
/// With `S = Σ(2·bit − 1)` and `S_obs = |S| / √n`, the p-value is
/// `erfc(S_obs / √2)`. The returned `statistic` is `S_obs`.
///
/// # Errors
///
/// Returns [`Error::EmptySequence`] if `bits` is empty.
pub fn monobit_test(bits: &BitSequence) -> Result<TestVerdict> {
    if bits.is_empty() {
        return Err(Error::EmptySequence);
    }

    let n = bits.len() as f64;
    let sum: i64 = bits.iter().map(|&bit| if bit { 1 } else { -1 }).sum();
    let s_obs = sum.unsigned_abs() as f64 / n.sqrt();

    Ok(TestVerdict::from_p_value(s_obs, erfc(s_obs / SQRT_2)))
}
