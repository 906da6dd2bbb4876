// ─────────────────────────────────────────────────────────────────────
// PMPL — Site Percolation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Pass-through probability of a randomly blocked porous medium.
//!
//! Cells are blocked independently with probability `p`. A path exists when
//! a 4-connected chain of open cells links the first row to the last row.

use crate::rng::seeded;
use pmpl_types::error::{PmplError, PmplResult};
use rand::Rng;
use rayon::prelude::*;
use std::collections::VecDeque;

/// `width × height` grid of open/blocked cells, row-major.
#[derive(Debug, Clone)]
pub struct PorousGrid {
    width: usize,
    height: usize,
    blocked: Vec<bool>,
    visited: Vec<bool>,
}

impl PorousGrid {
    pub fn new(width: usize, height: usize) -> PmplResult<Self> {
        if width == 0 || height == 0 {
            return Err(PmplError::InvalidInput(format!(
                "porous grid must be non-empty, got {width}x{height}"
            )));
        }
        Ok(PorousGrid {
            width,
            height,
            blocked: vec![false; width * height],
            visited: vec![false; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> usize {
        i + j * self.width
    }

    pub fn is_blocked(&self, i: usize, j: usize) -> bool {
        self.blocked[self.index(i, j)]
    }

    pub fn set_blocked(&mut self, i: usize, j: usize, blocked: bool) {
        let idx = self.index(i, j);
        self.blocked[idx] = blocked;
    }

    /// Block every cell independently with probability `probability`.
    pub fn fill_randomly<R: Rng + ?Sized>(&mut self, probability: f64, rng: &mut R) {
        for cell in self.blocked.iter_mut() {
            *cell = rng.gen::<f64>() < probability;
        }
        self.visited.fill(false);
    }

    fn neighbours(&self, i: usize, j: usize) -> impl Iterator<Item = (usize, usize)> {
        let (w, h) = (self.width, self.height);
        [
            (i + 1 < w).then(|| (i + 1, j)),
            (j + 1 < h).then(|| (i, j + 1)),
            (i > 0).then(|| (i - 1, j)),
            (j > 0).then(|| (i, j - 1)),
        ]
        .into_iter()
        .flatten()
    }

    /// Breadth-first search from the open cells of the first row.
    pub fn path_exists(&mut self) -> bool {
        self.visited.fill(false);
        let mut queue = VecDeque::new();
        for i in 0..self.width {
            if !self.is_blocked(i, 0) {
                let idx = self.index(i, 0);
                self.visited[idx] = true;
                queue.push_back((i, 0));
            }
        }

        while let Some((i, j)) = queue.pop_front() {
            if j == self.height - 1 {
                return true;
            }
            let next: Vec<(usize, usize)> = self
                .neighbours(i, j)
                .filter(|&(ni, nj)| {
                    let idx = self.index(ni, nj);
                    !self.blocked[idx] && !self.visited[idx]
                })
                .collect();
            for (ni, nj) in next {
                let idx = self.index(ni, nj);
                self.visited[idx] = true;
                queue.push_back((ni, nj));
            }
        }
        false
    }
}

/// Fraction of `samples` random fills at `probability` that admit a path.
pub fn estimate_pass_probability<R: Rng + ?Sized>(
    grid: &mut PorousGrid,
    probability: f64,
    samples: usize,
    rng: &mut R,
) -> PmplResult<f64> {
    if samples == 0 {
        return Err(PmplError::InvalidInput(
            "pass probability needs samples >= 1".to_string(),
        ));
    }
    let mut passes = 0usize;
    for _ in 0..samples {
        grid.fill_randomly(probability, rng);
        if grid.path_exists() {
            passes += 1;
        }
    }
    Ok(passes as f64 / samples as f64)
}

/// `(p, P_pass)` for `p = k/count`, `k = 0..=count`.
///
/// Points run in parallel, each on its own RNG stream derived from `seed`.
pub fn pass_probability_curve(
    width: usize,
    height: usize,
    count: usize,
    samples: usize,
    seed: Option<u64>,
) -> PmplResult<Vec<(f64, f64)>> {
    if count == 0 {
        return Err(PmplError::InvalidInput(
            "probability_steps must be >= 1".to_string(),
        ));
    }
    PorousGrid::new(width, height)?;
    (0..=count)
        .into_par_iter()
        .map(|k| {
            let probability = k as f64 / count as f64;
            let mut grid = PorousGrid::new(width, height)?;
            let mut rng = seeded(seed, k as u64);
            let pass = estimate_pass_probability(&mut grid, probability, samples, &mut rng)?;
            Ok((probability, pass))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_grid_has_path() {
        let mut grid = PorousGrid::new(5, 7).unwrap();
        assert!(grid.path_exists());
    }

    #[test]
    fn test_blocked_row_cuts_path() {
        let mut grid = PorousGrid::new(5, 5).unwrap();
        for i in 0..5 {
            grid.set_blocked(i, 2, true);
        }
        assert!(!grid.path_exists());
        grid.set_blocked(3, 2, false);
        assert!(grid.path_exists());
    }

    #[test]
    fn test_blocked_first_row_cell_is_not_a_start() {
        // Only the blocked cell (0, 0) touches the open column below it.
        let mut grid = PorousGrid::new(3, 3).unwrap();
        grid.set_blocked(0, 0, true);
        for j in 0..3 {
            grid.set_blocked(1, j, true);
        }
        for j in 0..3 {
            grid.set_blocked(2, j, true);
        }
        assert!(!grid.path_exists());
    }

    #[test]
    fn test_winding_path_found() {
        // S-shaped corridor through a 3x5 grid.
        let mut grid = PorousGrid::new(3, 5).unwrap();
        grid.set_blocked(1, 1, true);
        grid.set_blocked(2, 1, true);
        grid.set_blocked(0, 3, true);
        grid.set_blocked(1, 3, true);
        assert!(grid.path_exists());
    }

    #[test]
    fn test_single_row_grid() {
        let mut grid = PorousGrid::new(4, 1).unwrap();
        assert!(grid.path_exists());
        for i in 0..4 {
            grid.set_blocked(i, 0, true);
        }
        assert!(!grid.path_exists());
    }

    #[test]
    fn test_extreme_probabilities() {
        let mut grid = PorousGrid::new(10, 10).unwrap();
        let mut rng = seeded(Some(5), 0);
        assert_eq!(
            estimate_pass_probability(&mut grid, 0.0, 20, &mut rng).unwrap(),
            1.0
        );
        assert_eq!(
            estimate_pass_probability(&mut grid, 1.0, 20, &mut rng).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_curve_shape() {
        let curve = pass_probability_curve(20, 20, 10, 30, Some(9)).unwrap();
        assert_eq!(curve.len(), 11);
        assert_eq!(curve[0], (0.0, 1.0));
        assert_eq!(curve[10], (1.0, 0.0));
        assert!(curve.windows(2).all(|w| w[1].0 > w[0].0));
        // Well below the site-percolation threshold (~0.407 blocked) paths are common.
        assert!(curve[1].1 > 0.9);
        assert!(curve[8].1 < 0.1);
    }

    #[test]
    fn test_curve_reproducible_with_seed() {
        let a = pass_probability_curve(15, 15, 8, 10, Some(1)).unwrap();
        let b = pass_probability_curve(15, 15, 8, 10, Some(1)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(PorousGrid::new(0, 5).is_err());
        assert!(pass_probability_curve(5, 5, 0, 10, None).is_err());
        let mut grid = PorousGrid::new(3, 3).unwrap();
        let mut rng = seeded(Some(1), 0);
        assert!(estimate_pass_probability(&mut grid, 0.5, 0, &mut rng).is_err());
    }
}
