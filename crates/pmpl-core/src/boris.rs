// ─────────────────────────────────────────────────────────────────────
// PMPL — Boris Pusher
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Boris velocity update in uniform static fields, in tangent form.
//!
//! Half electric kick, magnetic rotation by the exact angle `q|B|dt/m`,
//! half electric kick:
//!   v⁻ = v + (q dt / 2m) E
//!   f₁ = tan(q dt |B| / 2m) / |B|,  v' = v⁻ + f₁ (v⁻ × B)
//!   f₂ = 2 f₁ / (1 + f₁² |B|²),     v⁺ = v⁻ + f₂ (v' × B)
//!   v  = v⁺ + (q dt / 2m) E
//! Positions are advanced separately by `particles::update_positions`.

use pmpl_types::constants::C_LIGHT;
use pmpl_types::state::{Particle, Vector3};

/// Lorentz factor for proper velocity `u = γv`.
pub fn gamma_from_proper_speed(u: f64) -> f64 {
    let beta = u / C_LIGHT;
    (1.0 + beta * beta).sqrt()
}

/// Rotate `v` about `b` by the angle `qm_half_dt * |b| * 2`.
#[inline]
fn rotate(v: Vector3, b: Vector3, qm_half_dt: f64) -> Vector3 {
    let b_norm = b.norm();
    if b_norm == 0.0 {
        return v;
    }
    let f1 = (qm_half_dt * b_norm).tan() / b_norm;
    let v_prime = v + f1 * v.cross(&b);
    let f2 = 2.0 * f1 / (1.0 + f1 * f1 * b_norm * b_norm);
    v + f2 * v_prime.cross(&b)
}

/// Non-relativistic Boris velocity update.
pub fn boris_push(particles: &mut [Particle], dt: f64, e_field: Vector3, b_field: Vector3) {
    for particle in particles.iter_mut() {
        let kick = particle.charge * dt / (2.0 * particle.mass);
        let v_minus = particle.velocity + kick * e_field;
        let v_plus = rotate(v_minus, b_field, kick);

        particle.previous_velocity = particle.velocity;
        particle.velocity = v_plus + kick * e_field;
        particle.proper_velocity = particle.velocity;
    }
}

/// Relativistic Boris velocity update on the proper velocity `u = γv`.
///
/// The rotation angle is divided by `γ(u⁻)`, evaluated after the first
/// electric half kick; `v = u / γ(u)` afterwards.
pub fn boris_push_relativistic(
    particles: &mut [Particle],
    dt: f64,
    e_field: Vector3,
    b_field: Vector3,
) {
    for particle in particles.iter_mut() {
        let kick = particle.charge * dt / (2.0 * particle.mass);
        let u_minus = particle.proper_velocity + kick * e_field;
        let gamma = gamma_from_proper_speed(u_minus.norm());
        let u_plus = rotate(u_minus, b_field, kick / gamma);
        let u = u_plus + kick * e_field;

        particle.previous_velocity = particle.velocity;
        particle.proper_velocity = u;
        particle.velocity = (1.0 / gamma_from_proper_speed(u.norm())) * u;
    }
}

/// Proper velocity `γv` for a sub-luminal velocity.
pub fn proper_velocity(v: Vector3) -> Vector3 {
    let beta2 = v.dot(&v) / (C_LIGHT * C_LIGHT);
    (1.0 / (1.0 - beta2).sqrt()) * v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::update_positions;
    use pmpl_math::analytic::ExBOrbit;
    use pmpl_types::constants::{M_ELECTRON, Q_ELECTRON};

    fn unit_particle(v: Vector3) -> Particle {
        Particle::new(1.0, Vector3::ZERO, v, 1.0)
    }

    #[test]
    fn test_magnetic_rotation_preserves_speed() {
        let mut ps = vec![unit_particle(Vector3::new(0.3, -1.2, 0.4))];
        let speed0 = ps[0].velocity.norm();
        for _ in 0..10_000 {
            boris_push(&mut ps, 0.05, Vector3::ZERO, Vector3::new(0.2, 0.1, 1.5));
        }
        assert!((ps[0].velocity.norm() - speed0).abs() < 1e-12);
    }

    #[test]
    fn test_rotation_angle_is_exact() {
        // q|B|dt/m = π/2: a quarter turn per step.
        let dt = std::f64::consts::FRAC_PI_2;
        let mut ps = vec![unit_particle(Vector3::new(1.0, 0.0, 0.0))];
        boris_push(&mut ps, dt, Vector3::ZERO, Vector3::new(0.0, 0.0, 1.0));
        let v = ps[0].velocity;
        // Positive charge gyrates clockwise about +z.
        assert!(v.x.abs() < 1e-12);
        assert!((v.y + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_magnetic_field_is_pure_kick() {
        let mut ps = vec![unit_particle(Vector3::ZERO)];
        boris_push(&mut ps, 0.1, Vector3::new(2.0, 0.0, -1.0), Vector3::ZERO);
        assert!((ps[0].velocity.x - 0.2).abs() < 1e-15);
        assert!((ps[0].velocity.z + 0.1).abs() < 1e-15);
        assert_eq!(ps[0].previous_velocity, Vector3::ZERO);
    }

    #[test]
    fn test_crossed_fields_follow_analytic_orbit() {
        let orbit = ExBOrbit {
            charge: 1.0,
            mass: 1.0,
            e_field: 1.0,
            b_field: 1.0,
            v0x: 1.0,
            v0y: 1.0,
        };
        let dt = 1e-3;
        let mut ps = vec![unit_particle(Vector3::new(1.0, 1.0, 0.0))];
        for _ in 0..10_000 {
            boris_push(&mut ps, dt, Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0));
            update_positions(&mut ps, dt);
        }
        let (x, y) = orbit.position(10.0);
        let p = ps[0].position;
        assert!(
            (p.x - x).abs() < 0.05 && (p.y - y).abs() < 0.05,
            "boris ({}, {}) vs analytic ({x}, {y})",
            p.x,
            p.y
        );
    }

    #[test]
    fn test_relativistic_speed_stays_below_light() {
        let v0 = Vector3::new(0.0, 1e8, 0.0);
        let mut ps = vec![Particle::new(M_ELECTRON, Vector3::ZERO, v0, Q_ELECTRON)];
        ps[0].proper_velocity = proper_velocity(v0);
        for _ in 0..1000 {
            boris_push_relativistic(
                &mut ps,
                1e-13,
                Vector3::new(1e9, 0.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
            );
            let p = &ps[0];
            assert!(p.velocity.norm() < C_LIGHT);
            let gamma = gamma_from_proper_speed(p.proper_velocity.norm());
            let back = gamma * p.velocity;
            assert!((back - p.proper_velocity).norm() <= 1e-9 * p.proper_velocity.norm());
        }
    }

    #[test]
    fn test_relativistic_matches_classic_at_low_speed() {
        let v0 = Vector3::new(10.0, -5.0, 1.0);
        let mut classic = vec![Particle::new(M_ELECTRON, Vector3::ZERO, v0, Q_ELECTRON)];
        let mut rel = classic.clone();
        rel[0].proper_velocity = proper_velocity(v0);
        let e = Vector3::new(1e-6, 0.0, 0.0);
        let b = Vector3::new(0.0, 0.0, 1e-6);
        for _ in 0..100 {
            boris_push(&mut classic, 1e-6, e, b);
            boris_push_relativistic(&mut rel, 1e-6, e, b);
        }
        let diff = (classic[0].velocity - rel[0].velocity).norm();
        assert!(diff < 1e-9 * classic[0].velocity.norm().max(1.0), "diff {diff}");
    }

    #[test]
    fn test_proper_velocity_inverts_gamma() {
        let v = Vector3::new(1e8, 2e8, 0.0);
        let u = proper_velocity(v);
        let back = (1.0 / gamma_from_proper_speed(u.norm())) * u;
        assert!((back - v).norm() < 1e-6);
    }
}
