// ─────────────────────────────────────────────────────────────────────
// PMPL — Trajectory Tables
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Multi-body trajectory files.
//!
//! Row `r` holds the sample time followed by six columns per body:
//! `t, x0, y0, z0, vx0, vy0, vz0, x1, ...`.

use crate::table::{format_row, read_table};
use ndarray::{s, Array2, ArrayView1, ArrayView2};
use pmpl_types::error::{PmplError, PmplResult};
use pmpl_types::state::{Particle, Vector3};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Columns per body.
pub const BODY_COLUMNS: usize = 6;

/// Write every particle's recorded trajectory side by side.
///
/// All trajectories must have the same number of samples; times are taken
/// from the first particle.
pub fn write_trajectories(path: impl AsRef<Path>, particles: &[Particle]) -> PmplResult<()> {
    let path = path.as_ref();
    let first = particles.first().ok_or_else(|| {
        PmplError::EmptyInput("trajectory file needs at least one particle".to_string())
    })?;
    let expected = first.trajectory.len();
    for (index, p) in particles.iter().enumerate() {
        if p.trajectory.len() != expected {
            return Err(PmplError::TrajectoryLength {
                index,
                expected,
                found: p.trajectory.len(),
            });
        }
    }

    let mut out = BufWriter::new(File::create(path)?);
    let mut row = Vec::with_capacity(1 + BODY_COLUMNS * particles.len());
    for r in 0..expected {
        row.clear();
        row.push(first.trajectory[r].t);
        for p in particles {
            row.extend_from_slice(&p.trajectory[r].columns());
        }
        format_row(&mut out, &row)?;
    }
    out.flush()?;
    debug!(
        path = %path.display(),
        rows = expected,
        bodies = particles.len(),
        "wrote trajectories"
    );
    Ok(())
}

/// Column view over a loaded trajectory file.
#[derive(Debug, Clone)]
pub struct TrajectoryTable {
    data: Array2<f64>,
}

impl TrajectoryTable {
    pub fn from_array(data: Array2<f64>) -> PmplResult<Self> {
        if data.nrows() == 0 {
            return Err(PmplError::EmptyInput(
                "trajectory table has no rows".to_string(),
            ));
        }
        let cols = data.ncols();
        if cols < 1 + BODY_COLUMNS || (cols - 1) % BODY_COLUMNS != 0 {
            return Err(PmplError::InvalidInput(format!(
                "trajectory table needs 1 + 6k columns, found {cols}"
            )));
        }
        Ok(TrajectoryTable { data })
    }

    pub fn read(path: impl AsRef<Path>) -> PmplResult<Self> {
        Self::from_array(read_table(path)?)
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn times(&self) -> ArrayView1<'_, f64> {
        self.data.column(0)
    }

    pub fn body_count(&self) -> usize {
        (self.data.ncols() - 1) / BODY_COLUMNS
    }

    /// `rows × 6` view of body `k`: x, y, z, vx, vy, vz.
    pub fn body(&self, k: usize) -> PmplResult<ArrayView2<'_, f64>> {
        if k >= self.body_count() {
            return Err(PmplError::InvalidInput(format!(
                "body index {k} out of range for {} bodies",
                self.body_count()
            )));
        }
        let start = 1 + BODY_COLUMNS * k;
        Ok(self.data.slice(s![.., start..start + BODY_COLUMNS]))
    }

    /// `(x, y)` of bodies `0, stride, 2·stride, ...` at `row`.
    pub fn positions_at(&self, row: usize, stride: usize) -> Vec<(f64, f64)> {
        let stride = stride.max(1);
        (0..self.body_count())
            .step_by(stride)
            .map(|k| {
                let c = 1 + BODY_COLUMNS * k;
                (self.data[[row, c]], self.data[[row, c + 1]])
            })
            .collect()
    }

    /// Velocity of every body at `row`.
    pub fn velocities_at(&self, row: usize) -> Vec<Vector3> {
        (0..self.body_count())
            .map(|k| {
                let c = 1 + BODY_COLUMNS * k + 3;
                Vector3::new(
                    self.data[[row, c]],
                    self.data[[row, c + 1]],
                    self.data[[row, c + 2]],
                )
            })
            .collect()
    }

    pub fn final_velocities(&self) -> Vec<Vector3> {
        self.velocities_at(self.rows() - 1)
    }
}
