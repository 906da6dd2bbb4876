//! Closed-form reference solutions overlaid on simulated datasets.

/// Harmonic function `exp(-2x) cos(2y)`, used both as Dirichlet boundary
/// data and as the exact solution of the Laplace problems.
pub fn laplace_reference(x: f64, y: f64) -> f64 {
    (-2.0 * x).exp() * (2.0 * y).cos()
}

/// Non-relativistic gyration of a charge in `E = E x̂`, `B = B ẑ`, starting
/// at the origin with velocity `(v0x, v0y, 0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExBOrbit {
    pub charge: f64,
    pub mass: f64,
    pub e_field: f64,
    pub b_field: f64,
    pub v0x: f64,
    pub v0y: f64,
}

impl ExBOrbit {
    /// Cyclotron angular frequency `qB/m`.
    pub fn cyclotron_frequency(&self) -> f64 {
        self.charge * self.b_field / self.mass
    }

    /// Drift speed `E/B`, directed along −ŷ.
    pub fn drift_speed(&self) -> f64 {
        self.e_field / self.b_field
    }

    /// `(x, y)` at time `t`.
    pub fn position(&self, t: f64) -> (f64, f64) {
        let wc = self.cyclotron_frequency();
        let vd = self.drift_speed();
        let (s, c) = (wc * t).sin_cos();
        let x = (self.v0x * s - (self.v0y + vd) * c) / wc + (vd + self.v0y) / wc;
        let y = (self.v0x * c + (self.v0y + vd) * s) / wc - vd * t - self.v0x / wc;
        (x, y)
    }

    pub fn positions(&self, times: &[f64]) -> Vec<(f64, f64)> {
        times.iter().map(|&t| self.position(t)).collect()
    }
}
