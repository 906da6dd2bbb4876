// ─────────────────────────────────────────────────────────────────────
// PMPL — Sample Statistics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Array transforms used by the dataset reports: linear grids, max
//! normalisation, speed magnitudes, density histograms and the
//! Maxwell–Boltzmann speed distribution.

use pmpl_types::constants::K_BOLTZMANN;
use pmpl_types::error::{PmplError, PmplResult};
use std::f64::consts::PI;

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Divide every value by the maximum. A zero or non-finite maximum leaves
/// the values unchanged.
pub fn normalize_by_max(values: &[f64]) -> Vec<f64> {
    let max = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() || max == 0.0 {
        return values.to_vec();
    }
    values.iter().map(|v| v / max).collect()
}

pub fn speed(vx: f64, vy: f64, vz: f64) -> f64 {
    (vx * vx + vy * vy + vz * vz).sqrt()
}

/// Probability density of speed `v` for particles of `mass` at `temperature`.
pub fn maxwell_boltzmann_speed_pdf(v: f64, mass: f64, temperature: f64) -> f64 {
    let kt = K_BOLTZMANN * temperature;
    (mass / (2.0 * PI * kt)).powf(1.5) * 4.0 * PI * v * v * (-mass * v * v / (2.0 * kt)).exp()
}

/// Equal-width histogram normalised to unit area.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` bin edges.
    pub edges: Vec<f64>,
    pub densities: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin the finite entries of `values` over their own range.
    pub fn density(values: &[f64], bins: usize) -> PmplResult<Self> {
        if bins == 0 {
            return Err(PmplError::InvalidInput(
                "histogram bins must be >= 1".to_string(),
            ));
        }
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Err(PmplError::EmptyInput(
                "histogram needs at least one finite value".to_string(),
            ));
        }
        let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;

        let mut counts = vec![0usize; bins];
        for v in &finite {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }
        let norm = finite.len() as f64 * width;
        let densities = counts.iter().map(|&c| c as f64 / norm).collect();

        Ok(Histogram {
            edges: linspace(lo, hi, bins + 1),
            densities,
            counts,
        })
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    pub fn range(&self) -> (f64, f64) {
        (self.edges[0], self.edges[self.edges.len() - 1])
    }

    pub fn max_density(&self) -> f64 {
        self.densities.iter().copied().fold(0.0, f64::max)
    }

    /// `(left, right, density)` per bin.
    pub fn bars(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.densities)
            .map(|(edge, &d)| (edge[0], edge[1], d))
    }
}
