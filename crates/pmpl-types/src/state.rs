// ─────────────────────────────────────────────────────────────────────
// PMPL — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Cartesian 3-vector used for positions, velocities, forces and fields.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }

    pub fn cross(&self, b: &Vector3) -> Vector3 {
        Vector3 {
            x: self.y * b.z - self.z * b.y,
            y: self.z * b.x - self.x * b.z,
            z: self.x * b.y - self.y * b.x,
        }
    }

    pub fn dot(&self, b: &Vector3) -> f64 {
        self.x * b.x + self.y * b.y + self.z * b.z
    }

    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vector3 {
    type Output = Vector3;
    fn add(self, b: Vector3) -> Vector3 {
        Vector3::new(self.x + b.x, self.y + b.y, self.z + b.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;
    fn sub(self, b: Vector3) -> Vector3 {
        Vector3::new(self.x - b.x, self.y - b.y, self.z - b.z)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;
    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<Vector3> for f64 {
    type Output = Vector3;
    fn mul(self, a: Vector3) -> Vector3 {
        Vector3::new(self * a.x, self * a.y, self * a.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, b: Vector3) {
        *self = *self + b;
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, b: Vector3) {
        *self = *self - b;
    }
}

/// One sampled point of a particle trajectory in phase space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhasePoint {
    pub t: f64,
    pub position: Vector3,
    pub velocity: Vector3,
}

impl PhasePoint {
    /// Row layout used by trajectory files: x, y, z, vx, vy, vz.
    pub fn columns(&self) -> [f64; 6] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.velocity.x,
            self.velocity.y,
            self.velocity.z,
        ]
    }
}

/// Point particle with an attached trajectory recording.
///
/// `previous_velocity` holds the velocity half a step behind `velocity`
/// (leapfrog), `proper_velocity` holds `γv` for relativistic pushers.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub mass: f64,
    pub charge: f64,
    pub position: Vector3,
    pub velocity: Vector3,
    pub previous_velocity: Vector3,
    pub proper_velocity: Vector3,
    pub force: Vector3,
    pub trajectory: Vec<PhasePoint>,
    pub next_collision_time: f64,
}

impl Particle {
    /// Create a particle and record its initial phase point at `t = 0`.
    pub fn new(mass: f64, position: Vector3, velocity: Vector3, charge: f64) -> Self {
        Particle {
            mass,
            charge,
            position,
            velocity,
            previous_velocity: velocity,
            proper_velocity: velocity,
            force: Vector3::ZERO,
            trajectory: vec![PhasePoint {
                t: 0.0,
                position,
                velocity,
            }],
            next_collision_time: 0.0,
        }
    }

    pub fn neutral(mass: f64, position: Vector3, velocity: Vector3) -> Self {
        Particle::new(mass, position, velocity, 0.0)
    }

    pub fn acceleration(&self) -> Vector3 {
        (1.0 / self.mass) * self.force
    }

    /// Append the current state to the trajectory.
    pub fn record(&mut self, t: f64) {
        self.trajectory.push(PhasePoint {
            t,
            position: self.position,
            velocity: self.velocity,
        });
    }

    /// Overwrite the velocity and forget the leapfrog history.
    pub fn reset_velocity(&mut self, velocity: Vector3) {
        self.velocity = velocity;
        self.previous_velocity = velocity;
        self.proper_velocity = velocity;
    }
}

/// Closed real interval `[begin, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub begin: f64,
    pub end: f64,
}

impl Interval {
    pub const UNIT: Interval = Interval {
        begin: 0.0,
        end: 1.0,
    };

    pub const fn new(begin: f64, end: f64) -> Self {
        Interval { begin, end }
    }

    pub fn width(&self) -> f64 {
        self.end - self.begin
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.begin && value <= self.end
    }

    /// Map `value` back into the interval periodically.
    pub fn wrap(&self, value: f64) -> f64 {
        if self.contains(value) {
            return value;
        }
        let width = self.width();
        if width <= 0.0 {
            return self.begin;
        }
        self.begin + (value - self.begin).rem_euclid(width)
    }

    pub fn is_valid(&self) -> bool {
        self.begin.is_finite() && self.end.is_finite() && self.end > self.begin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_product_right_handed() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross(&x), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_vector_arithmetic() {
        let mut a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(0.5, -1.0, 2.0);
        assert_eq!(a + b, Vector3::new(1.5, 1.0, 5.0));
        assert_eq!(a - b, Vector3::new(0.5, 3.0, 1.0));
        assert_eq!(2.0 * b, Vector3::new(1.0, -2.0, 4.0));
        a += b;
        a -= b;
        assert_eq!(a, Vector3::new(1.0, 2.0, 3.0));
        assert!((Vector3::new(3.0, 4.0, 0.0).norm() - 5.0).abs() < 1e-15);
    }

    #[test]
    fn test_particle_records_initial_point() {
        let p = Particle::new(
            2.0,
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            1.0,
        );
        assert_eq!(p.trajectory.len(), 1);
        assert_eq!(p.trajectory[0].t, 0.0);
        assert_eq!(p.trajectory[0].columns(), [1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert_eq!(p.previous_velocity, p.velocity);
    }

    #[test]
    fn test_acceleration_is_force_over_mass() {
        let mut p = Particle::neutral(4.0, Vector3::ZERO, Vector3::ZERO);
        p.force = Vector3::new(8.0, -4.0, 2.0);
        assert_eq!(p.acceleration(), Vector3::new(2.0, -1.0, 0.5));
    }

    #[test]
    fn test_interval_wrap() {
        let side = Interval::UNIT;
        assert_eq!(side.wrap(0.25), 0.25);
        assert!((side.wrap(1.25) - 0.25).abs() < 1e-12);
        assert!((side.wrap(-0.25) - 0.75).abs() < 1e-12);
        assert!((side.wrap(-2.1) - 0.9).abs() < 1e-12);
        assert!(side.contains(side.wrap(37.3)));
    }

    #[test]
    fn test_interval_validity() {
        assert!(Interval::UNIT.is_valid());
        assert!(!Interval::new(1.0, 1.0).is_valid());
        assert!(!Interval::new(0.0, f64::NAN).is_valid());
    }
}
