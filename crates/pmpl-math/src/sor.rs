//! Successive Over-Relaxation (SOR) solver for the Poisson equation on the
//! unit square with Dirichlet boundary data.
//!
//! The discretisation is the 5-point stencil on a uniform grid with spacing
//! `h = 1/(n - 1)`:
//!   r_ij = φ_{i-1,j} + φ_{i+1,j} + φ_{i,j-1} + φ_{i,j+1} - 4 φ_ij - f_ij h²
//!   φ_ij ← φ_ij + ω r_ij / 4
//! swept lexicographically in place (x outer, y inner). Fields are stored
//! `[ny, nx]`, i.e. `phi[[j, i]]` with `j` along y.

use crate::optimum::RelaxationSample;
use ndarray::Array2;
use pmpl_types::error::{PmplError, PmplResult};
use rayon::prelude::*;
use tracing::{debug, warn};

/// Dirichlet problem `∇²φ = f` on `[0, 1]²`.
#[derive(Debug, Clone)]
pub struct LaplaceProblem {
    /// Initial field; boundary rows/columns hold the Dirichlet data.
    pub phi: Array2<f64>,
    /// Right-hand side `f`.
    pub rhs: Array2<f64>,
    /// Grid spacing `h`.
    pub step: f64,
}

impl LaplaceProblem {
    /// `nodes × nodes` grid with boundary values from `boundary(x, y)`,
    /// zero interior and zero right-hand side.
    pub fn dirichlet<F>(nodes: usize, boundary: F) -> PmplResult<Self>
    where
        F: Fn(f64, f64) -> f64,
    {
        if nodes < 3 {
            return Err(PmplError::InvalidInput(format!(
                "Laplace grid needs >= 3 nodes per side, got {nodes}"
            )));
        }
        let step = 1.0 / (nodes - 1) as f64;
        let mut phi = Array2::zeros((nodes, nodes));
        for j in 0..nodes {
            for i in 0..nodes {
                if is_border(i, j, nodes) {
                    phi[[j, i]] = boundary(i as f64 * step, j as f64 * step);
                }
            }
        }
        Ok(LaplaceProblem {
            phi,
            rhs: Array2::zeros((nodes, nodes)),
            step,
        })
    }

    pub fn nodes(&self) -> usize {
        self.phi.ncols()
    }

    /// Node coordinates along either axis.
    pub fn coordinates(&self) -> Vec<f64> {
        (0..self.nodes()).map(|i| i as f64 * self.step).collect()
    }
}

fn is_border(i: usize, j: usize, nodes: usize) -> bool {
    i == 0 || j == 0 || i == nodes - 1 || j == nodes - 1
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SorConfig {
    /// Relaxation factor in (0, 2); 1 is Gauss-Seidel.
    pub omega: f64,
    /// Stop when max |r| <= tolerance * h².
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for SorConfig {
    fn default() -> Self {
        Self {
            omega: 1.84,
            tolerance: 1e-5,
            max_iterations: 1_000_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SorSolution {
    pub phi: Array2<f64>,
    /// Number of full sweeps performed.
    pub steps: usize,
    /// Max |r| of the last sweep.
    pub residual: f64,
    pub converged: bool,
}

/// One in-place sweep over the interior. Returns the max |residual| seen.
pub fn sor_sweep(phi: &mut Array2<f64>, rhs: &Array2<f64>, step: f64, omega: f64) -> f64 {
    let (ny, nx) = phi.dim();
    let h2 = step * step;
    let mut max_residual: f64 = 0.0;

    for i in 1..nx - 1 {
        for j in 1..ny - 1 {
            let residual = local_residual(phi, rhs, i, j, h2);
            phi[[j, i]] += omega * 0.25 * residual;
            max_residual = max_residual.max(residual.abs());
        }
    }
    max_residual
}

/// Max |residual| of the current field without updating it.
pub fn sor_residual(phi: &Array2<f64>, rhs: &Array2<f64>, step: f64) -> f64 {
    let (ny, nx) = phi.dim();
    let h2 = step * step;
    let mut max_residual: f64 = 0.0;
    for i in 1..nx - 1 {
        for j in 1..ny - 1 {
            max_residual = max_residual.max(local_residual(phi, rhs, i, j, h2).abs());
        }
    }
    max_residual
}

#[inline(always)]
fn local_residual(phi: &Array2<f64>, rhs: &Array2<f64>, i: usize, j: usize, h2: f64) -> f64 {
    -4.0 * phi[[j, i]] + phi[[j, i - 1]] + phi[[j, i + 1]] + phi[[j - 1, i]] + phi[[j + 1, i]]
        - rhs[[j, i]] * h2
}

/// Sweep until the residual drops below `tolerance * h²` or the iteration
/// budget runs out. A non-finite residual is reported as divergence.
pub fn sor_solve(problem: &LaplaceProblem, config: SorConfig) -> PmplResult<SorSolution> {
    if !config.omega.is_finite() || config.omega <= 0.0 || config.omega >= 2.0 {
        return Err(PmplError::InvalidInput(format!(
            "SOR omega must be in (0, 2), got {}",
            config.omega
        )));
    }
    if problem.phi.dim() != problem.rhs.dim() {
        return Err(PmplError::InvalidInput(format!(
            "SOR field/rhs shape mismatch: phi={:?}, rhs={:?}",
            problem.phi.dim(),
            problem.rhs.dim()
        )));
    }
    let mut phi = problem.phi.clone();
    let (ny, nx) = phi.dim();
    if nx < 3 || ny < 3 {
        return Ok(SorSolution {
            phi,
            steps: 0,
            residual: 0.0,
            converged: true,
        });
    }

    let threshold = config.tolerance * problem.step * problem.step;
    let mut steps = 0usize;
    let mut residual = f64::INFINITY;
    while steps < config.max_iterations {
        steps += 1;
        residual = sor_sweep(&mut phi, &problem.rhs, problem.step, config.omega);
        if !residual.is_finite() {
            return Err(PmplError::SolverDiverged {
                iteration: steps,
                message: format!("non-finite residual at omega={}", config.omega),
            });
        }
        if residual <= threshold {
            return Ok(SorSolution {
                phi,
                steps,
                residual,
                converged: true,
            });
        }
    }

    Ok(SorSolution {
        phi,
        steps,
        residual,
        converged: false,
    })
}

/// Σ |φ - exact| h² over the interior nodes.
pub fn l1_error<F>(phi: &Array2<f64>, step: f64, exact: F) -> f64
where
    F: Fn(f64, f64) -> f64,
{
    let (ny, nx) = phi.dim();
    let mut norm = 0.0;
    for i in 1..nx.saturating_sub(1) {
        for j in 1..ny.saturating_sub(1) {
            norm += (phi[[j, i]] - exact(i as f64 * step, j as f64 * step)).abs() * step * step;
        }
    }
    norm
}

/// Iterations to convergence for ω = 1 + k/samples, k = 1..samples-1.
///
/// Points are solved in parallel and returned in ω order. A point that
/// exhausts `max_iterations` is kept with that iteration count.
pub fn relaxation_sweep(
    problem: &LaplaceProblem,
    samples: usize,
    tolerance: f64,
    max_iterations: usize,
) -> PmplResult<Vec<RelaxationSample>> {
    if samples < 2 {
        return Ok(Vec::new());
    }
    (1..samples)
        .into_par_iter()
        .map(|k| {
            let omega = 1.0 + k as f64 / samples as f64;
            let solution = sor_solve(
                problem,
                SorConfig {
                    omega,
                    tolerance,
                    max_iterations,
                },
            )?;
            if solution.converged {
                debug!(omega, steps = solution.steps, "relaxation sweep point");
            } else {
                warn!(
                    omega,
                    residual = solution.residual,
                    "relaxation sweep point did not converge"
                );
            }
            Ok(RelaxationSample::new(omega, solution.steps as u64))
        })
        .collect()
}
