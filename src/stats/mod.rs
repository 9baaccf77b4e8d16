// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! NIST SP 800-22 frequency (monobit) and runs tests.
//!
//! Both tests are stateless reads of a bit sequence. Each produces a p-value
//! that is compared against a fixed significance level of 0.01.

mod monobit;
mod runs;

pub use monobit::monobit_test;
pub use runs::{NotApplicable, RunsVerdict, runs_test};

use crate::bits::BitSequence;
use crate::error::Result;

/// A sequence passes a test iff its p-value exceeds this level.
pub const SIGNIFICANCE_LEVEL: f64 = 0.01;

/// Complementary error function shared by both tests.
#[inline]
pub fn erfc(x: f64) -> f64 {
    libm::erfc(x)
}

/// Outcome of a single statistical test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestVerdict {
    /// The normalized test statistic fed to `erfc`.
    pub statistic: f64,
    pub p_value: f64,
    pub passed: bool,
}

impl TestVerdict {
    pub(crate) fn from_p_value(statistic: f64, p_value: f64) -> Self {
        Self { statistic, p_value, passed: p_value > SIGNIFICANCE_LEVEL }
    }
}

/// Both test outcomes for one bit sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomnessReport {
    pub monobit: TestVerdict,
    pub runs: RunsVerdict,
}

impl RandomnessReport {
    /// Run the monobit and runs tests over `bits`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySequence`](crate::Error::EmptySequence) for an empty input.
    pub fn evaluate(bits: &BitSequence) -> Result<Self> {
        Ok(Self { monobit: monobit_test(bits)?, runs: runs_test(bits)? })
    }

    /// True when the monobit test passed and the runs test ran and passed.
    pub fn passed(&self) -> bool {
        self.monobit.passed && self.runs.passed()
    }
}
