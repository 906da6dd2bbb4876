//! Velocity samples of particles crossing the x-boundary of the box.

use pmpl_io::table::write_table;
use pmpl_types::error::PmplResult;
use pmpl_types::state::{Interval, Particle, Vector3};
use std::path::Path;

/// Collects the velocity of every particle found outside `side_x` before
/// the periodic border folds it back.
#[derive(Debug, Clone, Default)]
pub struct SideSampler {
    samples: Vec<Vector3>,
}

impl SideSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of crossings recorded by this call.
    pub fn sample(&mut self, particles: &[Particle], side_x: Interval) -> usize {
        let before = self.samples.len();
        self.samples.extend(
            particles
                .iter()
                .filter(|p| !side_x.contains(p.position.x))
                .map(|p| p.velocity),
        );
        self.samples.len() - before
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Vector3] {
        &self.samples
    }

    /// Write `vx,vy,vz` rows.
    pub fn write(&self, path: impl AsRef<Path>) -> PmplResult<()> {
        let rows: Vec<[f64; 3]> = self.samples.iter().map(|v| [v.x, v.y, v.z]).collect();
        write_table(path, &rows)
    }
}
