// ─────────────────────────────────────────────────────────────────────
// PMPL — Particle Ensembles
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Operations over particle ensembles: force accumulation, energies,
//! semi-implicit Euler updates, periodic borders and initial loading.
//!
//! Velocities are advanced before positions, so `velocity` and
//! `previous_velocity` straddle the current position by half a step and
//! their mean is the velocity at the position's time level.

use pmpl_types::constants::K_BOLTZMANN;
use pmpl_types::error::{PmplError, PmplResult};
use pmpl_types::state::{Interval, Particle, Vector3};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Pairwise interaction between two particles.
pub trait PairInteraction {
    /// Force exerted on `a` by `b`.
    fn force(&self, a: &Particle, b: &Particle) -> Vector3;

    /// Potential energy of the pair.
    fn potential(&self, a: &Particle, b: &Particle) -> f64;
}

/// Newtonian gravity with constant `g` in the caller's units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonianGravity {
    pub g: f64,
}

impl PairInteraction for NewtonianGravity {
    fn force(&self, a: &Particle, b: &Particle) -> Vector3 {
        let r = b.position - a.position;
        let dist = r.norm();
        (self.g * a.mass * b.mass / (dist * dist * dist)) * r
    }

    fn potential(&self, a: &Particle, b: &Particle) -> f64 {
        -self.g * a.mass * b.mass / (b.position - a.position).norm()
    }
}

pub fn validate_particle(particle: &Particle, label: &str) -> PmplResult<()> {
    if !particle.position.is_finite() {
        return Err(PmplError::InvalidInput(format!(
            "{label} position components must be finite"
        )));
    }
    if !particle.velocity.is_finite() {
        return Err(PmplError::InvalidInput(format!(
            "{label} velocity components must be finite"
        )));
    }
    if !particle.charge.is_finite() {
        return Err(PmplError::InvalidInput(format!(
            "{label}.charge must be finite"
        )));
    }
    if !particle.mass.is_finite() || particle.mass <= 0.0 {
        return Err(PmplError::InvalidInput(format!(
            "{label}.mass must be finite and > 0"
        )));
    }
    Ok(())
}

pub fn set_all_forces(particles: &mut [Particle], force: Vector3) {
    for particle in particles.iter_mut() {
        particle.force = force;
    }
}

/// Add every pair force once, applying Newton's third law.
pub fn accumulate_pair_forces<I: PairInteraction>(particles: &mut [Particle], interaction: &I) {
    let n = particles.len();
    for i in 0..n {
        for j in i + 1..n {
            let f = interaction.force(&particles[i], &particles[j]);
            particles[i].force += f;
            particles[j].force -= f;
        }
    }
}

pub fn total_potential_energy<I: PairInteraction>(particles: &[Particle], interaction: &I) -> f64 {
    let mut total = 0.0;
    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            total += interaction.potential(a, b);
        }
    }
    total
}

/// Kinetic energy evaluated at the midpoint velocity `½(v + v_prev)`.
pub fn total_kinetic_energy(particles: &[Particle]) -> f64 {
    particles
        .iter()
        .map(|p| {
            let v = 0.5 * (p.velocity + p.previous_velocity);
            0.5 * p.mass * v.dot(&v)
        })
        .sum()
}

pub fn update_velocities(particles: &mut [Particle], dt: f64) {
    for particle in particles.iter_mut() {
        particle.previous_velocity = particle.velocity;
        particle.velocity += dt * particle.acceleration();
    }
}

pub fn update_positions(particles: &mut [Particle], dt: f64) {
    for particle in particles.iter_mut() {
        particle.position += dt * particle.velocity;
    }
}

pub fn record_trajectories(particles: &mut [Particle], t: f64) {
    for particle in particles.iter_mut() {
        particle.record(t);
    }
}

/// Fold x and y back into the box; z is unbounded.
pub fn apply_periodic_border(particles: &mut [Particle], side_x: Interval, side_y: Interval) {
    for particle in particles.iter_mut() {
        particle.position.x = side_x.wrap(particle.position.x);
        particle.position.y = side_y.wrap(particle.position.y);
    }
}

/// `count` particles at rest, uniformly placed in `side_x × side_y` at z = 0.
pub fn generate_in_rectangle<R: Rng + ?Sized>(
    count: usize,
    side_x: Interval,
    side_y: Interval,
    mass: f64,
    rng: &mut R,
) -> PmplResult<Vec<Particle>> {
    if !side_x.is_valid() || !side_y.is_valid() {
        return Err(PmplError::InvalidInput(
            "rectangle sides must be finite intervals with end > begin".to_string(),
        ));
    }
    if !mass.is_finite() || mass <= 0.0 {
        return Err(PmplError::InvalidInput(format!(
            "particle mass must be finite and > 0, got {mass}"
        )));
    }
    Ok((0..count)
        .map(|_| {
            let position = Vector3::new(
                rng.gen_range(side_x.begin..side_x.end),
                rng.gen_range(side_y.begin..side_y.end),
                0.0,
            );
            Particle::neutral(mass, position, Vector3::ZERO)
        })
        .collect())
}

/// Draw each velocity component from `N(0, √(kT/m))`.
///
/// The initial trajectory sample is refreshed so that `t = 0` carries the
/// thermal velocities.
pub fn set_thermal_velocities<R: Rng + ?Sized>(
    particles: &mut [Particle],
    temperature: f64,
    rng: &mut R,
) -> PmplResult<()> {
    if !temperature.is_finite() || temperature < 0.0 {
        return Err(PmplError::InvalidInput(format!(
            "temperature must be finite and >= 0, got {temperature}"
        )));
    }
    for particle in particles.iter_mut() {
        let sigma = (K_BOLTZMANN * temperature / particle.mass).sqrt();
        let normal = Normal::new(0.0, sigma)
            .map_err(|e| PmplError::InvalidInput(format!("thermal velocity spread: {e}")))?;
        let v = Vector3::new(normal.sample(rng), normal.sample(rng), normal.sample(rng));
        particle.reset_velocity(v);
        if let Some(first) = particle.trajectory.first_mut() {
            if first.t == 0.0 {
                first.velocity = v;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmpl_math::rng::seeded;
    use pmpl_types::constants::{G_KM, M_ELECTRON, T_ONE_EV};

    fn two_bodies() -> Vec<Particle> {
        vec![
            Particle::neutral(2.0, Vector3::ZERO, Vector3::ZERO),
            Particle::neutral(3.0, Vector3::new(2.0, 0.0, 0.0), Vector3::ZERO),
        ]
    }

    #[test]
    fn test_gravity_is_attractive_and_symmetric() {
        let mut bodies = two_bodies();
        let gravity = NewtonianGravity { g: 1.0 };
        set_all_forces(&mut bodies, Vector3::ZERO);
        accumulate_pair_forces(&mut bodies, &gravity);
        // |F| = 1 * 2 * 3 / 4
        assert!((bodies[0].force.x - 1.5).abs() < 1e-15);
        assert!((bodies[1].force.x + 1.5).abs() < 1e-15);
        assert_eq!(bodies[0].force + bodies[1].force, Vector3::ZERO);
        assert!((total_potential_energy(&bodies, &gravity) + 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_kinetic_energy_uses_midpoint_velocity() {
        let mut p = Particle::neutral(2.0, Vector3::ZERO, Vector3::new(1.0, 0.0, 0.0));
        p.previous_velocity = Vector3::new(3.0, 0.0, 0.0);
        // mean velocity 2 -> ½ · 2 · 4
        assert!((total_kinetic_energy(&[p]) - 4.0).abs() < 1e-15);
    }

    #[test]
    fn test_semi_implicit_euler_order() {
        let mut ps = vec![Particle::neutral(1.0, Vector3::ZERO, Vector3::ZERO)];
        set_all_forces(&mut ps, Vector3::new(2.0, 0.0, 0.0));
        update_velocities(&mut ps, 0.5);
        update_positions(&mut ps, 0.5);
        assert_eq!(ps[0].previous_velocity, Vector3::ZERO);
        assert_eq!(ps[0].velocity, Vector3::new(1.0, 0.0, 0.0));
        // Position uses the already updated velocity
        assert_eq!(ps[0].position, Vector3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_circular_orbit_energy_conserved() {
        // Light body on a circular orbit around a heavy one, G·M = 1.
        let mut bodies = vec![
            Particle::neutral(1.0 / G_KM, Vector3::ZERO, Vector3::ZERO),
            Particle::neutral(1e-10, Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0)),
        ];
        let gravity = NewtonianGravity { g: G_KM };
        let e0 = total_potential_energy(&bodies, &gravity) + total_kinetic_energy(&bodies);
        let dt = 1e-3;
        let mut drift: f64 = 0.0;
        for _ in 0..6283 {
            let pe = total_potential_energy(&bodies, &gravity);
            set_all_forces(&mut bodies, Vector3::ZERO);
            accumulate_pair_forces(&mut bodies, &gravity);
            update_velocities(&mut bodies, dt);
            update_positions(&mut bodies, dt);
            let e = pe + total_kinetic_energy(&bodies);
            drift = drift.max(((e - e0) / e0).abs());
        }
        assert!(drift < 1e-5, "relative energy drift {drift}");
        let r = (bodies[1].position - bodies[0].position).norm();
        assert!((r - 1.0).abs() < 5e-3);
    }

    #[test]
    fn test_periodic_border_wraps_x_and_y_only() {
        let mut ps = vec![Particle::neutral(
            1.0,
            Vector3::new(1.25, -0.25, 7.0),
            Vector3::ZERO,
        )];
        apply_periodic_border(&mut ps, Interval::UNIT, Interval::UNIT);
        assert!((ps[0].position.x - 0.25).abs() < 1e-15);
        assert!((ps[0].position.y - 0.75).abs() < 1e-15);
        assert_eq!(ps[0].position.z, 7.0);
    }

    #[test]
    fn test_generate_in_rectangle_bounds() {
        let mut rng = seeded(Some(1), 0);
        let side_y = Interval::new(-2.0, 3.0);
        let ps = generate_in_rectangle(500, Interval::UNIT, side_y, M_ELECTRON, &mut rng).unwrap();
        assert_eq!(ps.len(), 500);
        for p in &ps {
            assert!(Interval::UNIT.contains(p.position.x));
            assert!(side_y.contains(p.position.y));
            assert_eq!(p.position.z, 0.0);
            assert_eq!(p.velocity, Vector3::ZERO);
            assert_eq!(p.trajectory.len(), 1);
        }
        assert!(generate_in_rectangle(3, Interval::new(1.0, 1.0), side_y, 1.0, &mut rng).is_err());
        assert!(generate_in_rectangle(3, Interval::UNIT, side_y, 0.0, &mut rng).is_err());
    }

    #[test]
    fn test_thermal_velocities_match_temperature() {
        let mut rng = seeded(Some(2), 0);
        let mut ps =
            generate_in_rectangle(20_000, Interval::UNIT, Interval::UNIT, M_ELECTRON, &mut rng)
                .unwrap();
        set_thermal_velocities(&mut ps, T_ONE_EV, &mut rng).unwrap();
        // <½ m v²> = 3/2 k T
        let mean_energy = total_kinetic_energy(&ps) / ps.len() as f64;
        let expected = 1.5 * K_BOLTZMANN * T_ONE_EV;
        assert!(
            ((mean_energy - expected) / expected).abs() < 0.03,
            "mean energy {mean_energy}, expected {expected}"
        );
        assert_eq!(ps[0].previous_velocity, ps[0].velocity);
        assert_eq!(ps[0].trajectory[0].velocity, ps[0].velocity);
    }

    #[test]
    fn test_validate_particle_rejects_bad_state() {
        let mut p = Particle::neutral(1.0, Vector3::ZERO, Vector3::ZERO);
        validate_particle(&p, "p").unwrap();
        p.mass = 0.0;
        match validate_particle(&p, "p").unwrap_err() {
            PmplError::InvalidInput(msg) => assert!(msg.contains("p.mass")),
            other => panic!("Unexpected error: {other:?}"),
        }
        p.mass = 1.0;
        p.velocity.y = f64::NAN;
        assert!(validate_particle(&p, "p").is_err());
    }
}
