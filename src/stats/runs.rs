// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::f64::consts::SQRT_2;

use super::{TestVerdict, erfc};
use crate::bits::BitSequence;
use crate::error::{Error, Result};

/// Why the runs test declined to produce a verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotApplicable {
    /// The frequency pre-test failed: `|π − ½| ≥ τ` with `τ = 2/√n`.
    ProportionOutOfRange { proportion: f64, tau: f64 },
    /// `n·π·(1−π) = 0`: every bit has the same value.
    Degenerate,
}

/// Outcome of the runs test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunsVerdict {
    Completed {
        verdict: TestVerdict,
        /// Observed number of runs.
        runs: usize,
        /// Proportion of ones, π.
        proportion: f64,
    },
    NotApplicable(NotApplicable),
}

impl RunsVerdict {
    /// Whether the pre-test admitted the sequence.
    pub fn is_applicable(&self) -> bool {
        matches!(self, RunsVerdict::Completed { .. })
    }

    /// The test verdict, if the test ran.
    pub fn verdict(&self) -> Option<&TestVerdict> {
        match self {
            RunsVerdict::Completed { verdict, .. } => Some(verdict),
            RunsVerdict::NotApplicable(_) => None,
        }
    }

    /// The p-value, if the test ran.
    pub fn p_value(&self) -> Option<f64> {
        self.verdict().map(|verdict| verdict.p_value)
    }

    /// A test that did not run never passes.
    pub fn passed(&self) -> bool {
        self.verdict().is_some_and(|verdict| verdict.passed)
    }
}

/// Number of maximal blocks of identical consecutive bits.
pub(crate) fn count_runs(bits: &[bool]) -> usize {
    if bits.is_empty() {
        return 0;
    }
    1 + bits.windows(2).filter(|pair| pair[0] != pair[1]).count()
}

/// Runs test.
///
/// Requires the frequency pre-test `|π − ½| < 2/√n`; otherwise, or when the
/// sequence is constant, the outcome is [`RunsVerdict::NotApplicable`] and no
/// p-value is computed. The p-value is
/// `erfc(|R − 2nπ(1−π)| / (2·√(2n)·π(1−π)))`, which is also the returned
/// `statistic` before `erfc`.
///
/// # Errors
///
/// Returns [`Error::EmptySequence`] if `bits` is empty.
pub fn runs_test(bits: &BitSequence) -> Result<RunsVerdict> {
    if bits.is_empty() {
        return Err(Error::EmptySequence);
    }

    let n = bits.len() as f64;
    let proportion = bits.count_ones() as f64 / n;
    let tau = 2.0 / n.sqrt();

    if (proportion - 0.5).abs() >= tau {
        return Ok(RunsVerdict::NotApplicable(NotApplicable::ProportionOutOfRange {
            proportion,
            tau,
        }));
    }

    let spread = proportion * (1.0 - proportion);
    if n * spread == 0.0 {
        return Ok(RunsVerdict::NotApplicable(NotApplicable::Degenerate));
    }

    let runs = count_runs(bits);
    let expected = 2.0 * n * spread;
    let statistic = (runs as f64 - expected).abs() / (2.0 * SQRT_2 * n.sqrt() * spread);

    Ok(RunsVerdict::Completed {
        verdict: TestVerdict::from_p_value(statistic, erfc(statistic)),
        runs,
        proportion,
    })
}
