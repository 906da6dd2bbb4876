// ─────────────────────────────────────────────────────────────────────
// PMPL — Optimal Relaxation Parameter
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Optimal relaxation parameter search over an iteration count table.
//!
//! Given `(ω, steps)` rows produced by a relaxation sweep, pick the ω that
//! reached convergence in the fewest iterations. The scan is a single pass
//! that only replaces the running best on a strictly smaller cost, so the
//! first row of a tied minimum wins.

use pmpl_types::error::{PmplError, PmplResult};

/// One row of a relaxation sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxationSample {
    pub omega: f64,
    pub steps: u64,
}

impl RelaxationSample {
    pub const fn new(omega: f64, steps: u64) -> Self {
        RelaxationSample { omega, steps }
    }
}

/// Result of the scan: the winning row and its position in the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxationOptimum {
    pub omega: f64,
    pub steps: u64,
    pub index: usize,
}

/// First element with the minimal key, with its index.
///
/// O(n) time, O(1) extra space. Returns `None` for an empty iterator.
pub fn first_minimum_by_key<T, K, I, F>(items: I, mut key: F) -> Option<(usize, T)>
where
    I: IntoIterator<Item = T>,
    K: PartialOrd,
    F: FnMut(&T) -> K,
{
    let mut best: Option<(usize, T, K)> = None;
    for (idx, item) in items.into_iter().enumerate() {
        let k = key(&item);
        let better = match &best {
            None => true,
            Some((_, _, best_key)) => k < *best_key,
        };
        if better {
            best = Some((idx, item, k));
        }
    }
    best.map(|(idx, item, _)| (idx, item))
}

/// Relaxation parameter with the fewest iterations to convergence.
///
/// Empty input is an error rather than a default ω.
pub fn optimal_relaxation(samples: &[RelaxationSample]) -> PmplResult<RelaxationOptimum> {
    let (index, best) = first_minimum_by_key(samples.iter().copied(), |s| s.steps).ok_or_else(
        || PmplError::EmptyInput("relaxation table has no (omega, steps) rows".to_string()),
    )?;
    Ok(RelaxationOptimum {
        omega: best.omega,
        steps: best.steps,
        index,
    })
}
