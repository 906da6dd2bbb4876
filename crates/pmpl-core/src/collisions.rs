// ─────────────────────────────────────────────────────────────────────
// PMPL — Background Gas Collisions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Elastic scattering of tracked particles on a background gas, scheduled
//! with the null-collision method.
//!
//! Every particle carries the time of its next candidate collision, drawn
//! from an exponential distribution with the maximal rate `ν_max`. When the
//! simulation clock passes that time the candidate is accepted with
//! probability `ν / ν_max` and a new candidate time is drawn.

use pmpl_types::config::BackgroundGas;
use pmpl_types::constants::K_BOLTZMANN;
use pmpl_types::error::{PmplError, PmplResult};
use pmpl_types::state::{Particle, Vector3};
use rand::Rng;
use rand_distr::{Distribution, Exp1, Normal};
use std::f64::consts::PI;

/// `(ν, ν_max)` of a collisional background, `None` for free streaming.
pub fn collision_frequencies(gas: &BackgroundGas) -> Option<(f64, f64)> {
    match *gas {
        BackgroundGas::None => None,
        BackgroundGas::Cold {
            collision_frequency,
            max_collision_frequency,
            ..
        }
        | BackgroundGas::Hot {
            collision_frequency,
            max_collision_frequency,
            ..
        } => Some((collision_frequency, max_collision_frequency)),
    }
}

fn next_interval<R: Rng + ?Sized>(max_frequency: f64, rng: &mut R) -> f64 {
    let e: f64 = Exp1.sample(rng);
    e / max_frequency
}

/// Draw the first candidate collision time of every particle after `t0`.
pub fn init_collision_times<R: Rng + ?Sized>(
    particles: &mut [Particle],
    t0: f64,
    max_frequency: f64,
    rng: &mut R,
) {
    for particle in particles.iter_mut() {
        particle.next_collision_time = t0 + next_interval(max_frequency, rng);
    }
}

/// Scatter on an atom at rest, in the x–y plane.
///
/// The in-plane velocity is turned by `χ ~ U(0, 2π)` and shrunk by the
/// recoil factor `√(1 − 2(m/M)(1 − cos χ))`; `v_z` is unchanged.
pub fn scatter_cold<R: Rng + ?Sized>(particle: &mut Particle, background_mass: f64, rng: &mut R) {
    let chi = 2.0 * PI * rng.gen::<f64>();
    let (sin_chi, cos_chi) = chi.sin_cos();
    let v = particle.velocity;
    let loss = 2.0 * particle.mass / background_mass * (1.0 - cos_chi);
    let factor = (1.0 - loss).max(0.0).sqrt();
    let vx = factor * (v.x * cos_chi - v.y * sin_chi);
    let vy = factor * (v.x * sin_chi + v.y * cos_chi);
    particle.reset_velocity(Vector3::new(vx, vy, v.z));
}

/// Uniformly distributed unit vector.
pub fn isotropic_direction<R: Rng + ?Sized>(rng: &mut R) -> Vector3 {
    let cos_theta = 2.0 * rng.gen::<f64>() - 1.0;
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = 2.0 * PI * rng.gen::<f64>();
    Vector3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

/// Elastic binary collision: the relative velocity keeps its magnitude and
/// takes the direction `n` in the centre-of-mass frame.
///
/// Returns the post-collision velocities `(v', V')`.
pub fn elastic_collision(
    v: Vector3,
    m: f64,
    background_velocity: Vector3,
    background_mass: f64,
    n: Vector3,
) -> (Vector3, Vector3) {
    let total = m + background_mass;
    let centre = (1.0 / total) * (m * v + background_mass * background_velocity);
    let g = (v - background_velocity).norm() * n;
    (
        centre + (background_mass / total) * g,
        centre - (m / total) * g,
    )
}

/// Scatter on an atom drawn from a Maxwellian at `temperature`.
pub fn scatter_hot<R: Rng + ?Sized>(
    particle: &mut Particle,
    background_mass: f64,
    temperature: f64,
    rng: &mut R,
) -> PmplResult<()> {
    let sigma = (K_BOLTZMANN * temperature / background_mass).sqrt();
    let normal = Normal::new(0.0, sigma)
        .map_err(|e| PmplError::InvalidInput(format!("background thermal spread: {e}")))?;
    let atom = Vector3::new(normal.sample(rng), normal.sample(rng), normal.sample(rng));
    let n = isotropic_direction(rng);
    let (v, _) = elastic_collision(particle.velocity, particle.mass, atom, background_mass, n);
    particle.reset_velocity(v);
    Ok(())
}

/// Process every candidate collision up to time `t`. Returns the number of
/// accepted (real) collisions.
pub fn collide_all<R: Rng + ?Sized>(
    particles: &mut [Particle],
    gas: &BackgroundGas,
    t: f64,
    rng: &mut R,
) -> PmplResult<usize> {
    let Some((frequency, max_frequency)) = collision_frequencies(gas) else {
        return Ok(0);
    };
    let acceptance = frequency / max_frequency;
    let mut collisions = 0usize;
    for particle in particles.iter_mut() {
        while particle.next_collision_time <= t {
            if rng.gen::<f64>() < acceptance {
                match *gas {
                    BackgroundGas::Cold { mass, .. } => scatter_cold(particle, mass, rng),
                    BackgroundGas::Hot {
                        mass, temperature, ..
                    } => scatter_hot(particle, mass, temperature, rng)?,
                    BackgroundGas::None => {}
                }
                collisions += 1;
            }
            particle.next_collision_time += next_interval(max_frequency, rng);
        }
    }
    Ok(collisions)
}
