// ─────────────────────────────────────────────────────────────────────
// PMPL — Scenario Runners
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Simulation drivers that turn a configuration section into datasets.
//!
//! Time-dependent runs take `steps = round(T/dt)` steps. After step `k`
//! (1-based) the clock reads `k·dt`, and a sample is recorded whenever
//! `k` is a multiple of `Sampling::record_every()`. The initial state is
//! always the first trajectory sample.

use crate::boris::{boris_push, boris_push_relativistic, proper_velocity};
use crate::collisions::{collide_all, collision_frequencies, init_collision_times};
use crate::particles::{
    accumulate_pair_forces, apply_periodic_border, generate_in_rectangle, record_trajectories,
    set_all_forces, set_thermal_velocities, total_kinetic_energy, total_potential_energy,
    update_positions, update_velocities, validate_particle, NewtonianGravity,
};
use crate::sampler::SideSampler;
use crate::timing::time_it;
use pmpl_io::{
    write_relaxation_table, write_sor_snapshot, write_table, write_trajectories, DataLayout,
    SorSnapshot,
};
use pmpl_math::analytic::laplace_reference;
use pmpl_math::optimum::optimal_relaxation;
use pmpl_math::percolation::pass_probability_curve;
use pmpl_math::random_walk::{estimate_potential, Lattice};
use pmpl_math::rng::seeded;
use pmpl_math::sor::{l1_error, relaxation_sweep, sor_solve, LaplaceProblem, SorConfig};
use pmpl_types::config::{
    BorisConfig, CarloStudyConfig, GasConfig, LabConfig, PorousStudyConfig, SolarConfig,
    SorStudyConfig,
};
use pmpl_types::error::{PmplError, PmplResult};
use pmpl_types::state::{Particle, Vector3};
use rand::Rng;
use rayon::prelude::*;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scenario {
    Boris,
    BorisRelativistic,
    Collisionless,
    Collisional,
    Hot,
    Solar,
    Sor,
    Carlo,
    Porous,
}

impl Scenario {
    pub const ALL: [Scenario; 9] = [
        Scenario::Boris,
        Scenario::BorisRelativistic,
        Scenario::Collisionless,
        Scenario::Collisional,
        Scenario::Hot,
        Scenario::Solar,
        Scenario::Sor,
        Scenario::Carlo,
        Scenario::Porous,
    ];

    /// Command-line name.
    pub fn name(self) -> &'static str {
        match self {
            Scenario::Boris => "boris",
            Scenario::BorisRelativistic => "boris-relativistic",
            Scenario::Collisionless => "collisionless",
            Scenario::Collisional => "collisional",
            Scenario::Hot => "hot",
            Scenario::Solar => "solar",
            Scenario::Sor => "sor",
            Scenario::Carlo => "carlo",
            Scenario::Porous => "porous",
        }
    }

    /// Dataset file prefix.
    pub fn file_prefix(self) -> &'static str {
        match self {
            Scenario::BorisRelativistic => "boris_relativistic",
            other => other.name(),
        }
    }

    /// First RNG stream id owned by this scenario.
    fn stream(self, k: u64) -> u64 {
        ((self as u64 + 1) << 32) | (k & 0xFFFF_FFFF)
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = PmplError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Scenario::ALL
            .into_iter()
            .find(|sc| sc.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Scenario::ALL.iter().map(|sc| sc.name()).collect();
                PmplError::InvalidInput(format!(
                    "unknown scenario '{s}', expected one of: {}",
                    names.join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub scenario: Scenario,
    pub elapsed: Duration,
    pub files: Vec<PathBuf>,
}

/// `(E - E0) / E`, zero when `E` vanishes.
fn relative_drift(energy: f64, initial: f64) -> f64 {
    if energy == 0.0 {
        0.0
    } else {
        (energy - initial) / energy
    }
}

pub fn run_scenario(
    scenario: Scenario,
    config: &LabConfig,
    layout: &DataLayout,
) -> PmplResult<RunSummary> {
    layout.ensure_dirs()?;
    info!(scenario = %scenario, "simulation started");
    let seed = config.seed;
    let (files, elapsed) = time_it(|| match scenario {
        Scenario::Boris => run_boris(&config.boris, layout, scenario.file_prefix()),
        Scenario::BorisRelativistic => {
            run_boris(&config.boris_relativistic, layout, scenario.file_prefix())
        }
        Scenario::Collisionless => run_gas(
            &config.collisionless,
            layout,
            scenario.file_prefix(),
            &mut seeded(seed, scenario.stream(0)),
        ),
        Scenario::Collisional => run_gas(
            &config.collisional,
            layout,
            scenario.file_prefix(),
            &mut seeded(seed, scenario.stream(0)),
        ),
        Scenario::Hot => run_gas(
            &config.hot,
            layout,
            scenario.file_prefix(),
            &mut seeded(seed, scenario.stream(0)),
        ),
        Scenario::Solar => run_solar(&config.solar, layout),
        Scenario::Sor => run_sor(&config.sor, layout),
        Scenario::Carlo => run_carlo(&config.carlo, layout, seed),
        Scenario::Porous => run_porous(&config.porous, layout, seed),
    });
    let files = files?;
    info!(
        scenario = %scenario,
        elapsed_s = elapsed.as_secs_f64(),
        files = files.len(),
        "simulation finished"
    );
    Ok(RunSummary {
        scenario,
        elapsed,
        files,
    })
}

/// Run each scenario in order, stopping at the first failure.
pub fn run_scenarios(
    scenarios: &[Scenario],
    config: &LabConfig,
    layout: &DataLayout,
) -> PmplResult<Vec<RunSummary>> {
    scenarios
        .iter()
        .map(|&sc| run_scenario(sc, config, layout))
        .collect()
}

/// Single charged particle in static crossed fields.
pub fn run_boris(cfg: &BorisConfig, layout: &DataLayout, prefix: &str) -> PmplResult<Vec<PathBuf>> {
    cfg.validate(prefix)?;
    let mut particles = vec![Particle::new(cfg.mass, cfg.position, cfg.velocity, cfg.charge)];
    validate_particle(&particles[0], prefix)?;
    if cfg.relativistic {
        particles[0].proper_velocity = proper_velocity(cfg.velocity);
    }
    let dt = cfg.sampling.time_step;
    let steps = cfg.sampling.steps();
    let every = cfg.sampling.record_every();

    for step in 1..=steps {
        if cfg.relativistic {
            boris_push_relativistic(&mut particles, dt, cfg.electric_field, cfg.magnetic_field);
        } else {
            boris_push(&mut particles, dt, cfg.electric_field, cfg.magnetic_field);
        }
        update_positions(&mut particles, dt);
        if step % every == 0 {
            record_trajectories(&mut particles, step as f64 * dt);
        }
    }
    if !particles[0].position.is_finite() {
        return Err(PmplError::SolverDiverged {
            iteration: steps,
            message: format!("{prefix} particle left the finite range"),
        });
    }

    let path = layout.trajectories(prefix);
    write_trajectories(&path, &particles)?;
    debug!(
        prefix,
        samples = particles[0].trajectory.len(),
        "boris trajectory written"
    );
    Ok(vec![path])
}

/// Electron gas in a periodic box, optionally scattering on a background.
pub fn run_gas<R: Rng + ?Sized>(
    cfg: &GasConfig,
    layout: &DataLayout,
    prefix: &str,
    rng: &mut R,
) -> PmplResult<Vec<PathBuf>> {
    cfg.validate(prefix)?;
    let mut particles = generate_in_rectangle(
        cfg.particle_count,
        cfg.side,
        cfg.side,
        cfg.particle_mass,
        rng,
    )?;
    set_thermal_velocities(&mut particles, cfg.temperature, rng)?;
    if let Some((_, max_frequency)) = collision_frequencies(&cfg.background) {
        init_collision_times(&mut particles, 0.0, max_frequency, rng);
    }

    let dt = cfg.sampling.time_step;
    let steps = cfg.sampling.steps();
    let every = cfg.sampling.record_every();
    let progress = (steps / 10).max(1);
    let initial_energy = total_kinetic_energy(&particles);
    let mut energy_rows: Vec<[f64; 2]> = Vec::with_capacity(steps / every + 1);
    let mut sampler = SideSampler::new();
    let mut collisions = 0usize;

    for step in 1..=steps {
        let t = step as f64 * dt;
        update_positions(&mut particles, dt);
        collisions += collide_all(&mut particles, &cfg.background, t, rng)?;
        sampler.sample(&particles, cfg.side);
        apply_periodic_border(&mut particles, cfg.side, cfg.side);

        if step % every == 0 {
            record_trajectories(&mut particles, t);
            let energy = total_kinetic_energy(&particles);
            energy_rows.push([t, relative_drift(energy, initial_energy)]);
        }
        if step % progress == 0 {
            debug!(prefix, step, steps, collisions, "gas progress");
        }
    }
    info!(
        prefix,
        particles = particles.len(),
        collisions,
        side_samples = sampler.len(),
        "gas run complete"
    );

    let trajectories = layout.trajectories(prefix);
    let energy = layout.energy(prefix);
    let side = layout.side_speeds(prefix);
    write_trajectories(&trajectories, &particles)?;
    write_table(&energy, &energy_rows)?;
    sampler.write(&side)?;
    Ok(vec![trajectories, energy, side])
}

/// Gravitating bodies advanced with semi-implicit Euler.
///
/// The energy row of step `k` pairs the potential energy at the start of
/// the step with the midpoint kinetic energy, and is stamped with that
/// start time.
pub fn run_solar(cfg: &SolarConfig, layout: &DataLayout) -> PmplResult<Vec<PathBuf>> {
    cfg.validate()?;
    let mut bodies: Vec<Particle> = cfg
        .bodies
        .iter()
        .map(|b| Particle::neutral(b.mass, b.position, b.velocity))
        .collect();
    for (body, entry) in bodies.iter().zip(&cfg.bodies) {
        validate_particle(body, &entry.name)?;
    }
    let gravity = NewtonianGravity {
        g: cfg.gravitational_constant,
    };
    let dt = cfg.sampling.time_step;
    let steps = cfg.sampling.steps();
    let every = cfg.sampling.record_every();
    let initial_energy =
        total_potential_energy(&bodies, &gravity) + total_kinetic_energy(&bodies);
    let mut energy_rows: Vec<[f64; 2]> = Vec::with_capacity(steps / every + 1);

    for step in 1..=steps {
        let recording = step % every == 0;
        let potential = if recording {
            total_potential_energy(&bodies, &gravity)
        } else {
            0.0
        };
        set_all_forces(&mut bodies, Vector3::ZERO);
        accumulate_pair_forces(&mut bodies, &gravity);
        update_velocities(&mut bodies, dt);
        update_positions(&mut bodies, dt);

        if recording {
            record_trajectories(&mut bodies, step as f64 * dt);
            let energy = potential + total_kinetic_energy(&bodies);
            energy_rows.push([(step - 1) as f64 * dt, relative_drift(energy, initial_energy)]);
        }
    }
    if let Some(idx) = bodies.iter().position(|b| !b.position.is_finite()) {
        return Err(PmplError::SolverDiverged {
            iteration: steps,
            message: format!("solar body {} ({}) left the finite range", idx, cfg.bodies[idx].name),
        });
    }
    if let Some(last) = energy_rows.last() {
        info!(bodies = bodies.len(), final_drift = last[1], "solar run complete");
    }

    let trajectories = layout.trajectories("solar");
    let energy = layout.energy("solar");
    write_trajectories(&trajectories, &bodies)?;
    write_table(&energy, &energy_rows)?;
    Ok(vec![trajectories, energy])
}

/// Laplace problem by SOR: relaxation sweep, timing sweep, field snapshot.
pub fn run_sor(cfg: &SorStudyConfig, layout: &DataLayout) -> PmplResult<Vec<PathBuf>> {
    cfg.validate()?;

    let table = if cfg.omega_samples >= 2 {
        let problem = LaplaceProblem::dirichlet(cfg.nodes, laplace_reference)?;
        relaxation_sweep(&problem, cfg.omega_samples, cfg.tolerance, cfg.max_iterations)?
    } else {
        info!("relaxation sweep disabled (omega_samples < 2)");
        Vec::new()
    };
    match optimal_relaxation(&table) {
        Ok(best) => info!(omega = best.omega, steps = best.steps, "optimal relaxation"),
        Err(PmplError::EmptyInput(_)) => debug!("no relaxation rows to scan"),
        Err(e) => return Err(e),
    }
    let optimization = layout.sor_optimization();
    write_relaxation_table(&optimization, &table)?;

    let solver = SorConfig {
        omega: cfg.timing_omega,
        tolerance: cfg.tolerance,
        max_iterations: cfg.max_iterations,
    };
    let mut timing_rows: Vec<[f64; 2]> = Vec::new();
    for nodes in cfg.timing_sizes.sizes() {
        let problem = LaplaceProblem::dirichlet(nodes, laplace_reference)?;
        let (solution, elapsed) = time_it(|| sor_solve(&problem, solver));
        let solution = solution?;
        if !solution.converged {
            warn!(nodes, residual = solution.residual, "SOR timing run did not converge");
        }
        debug!(nodes, steps = solution.steps, elapsed_s = elapsed.as_secs_f64(), "SOR timing");
        timing_rows.push([nodes as f64, elapsed.as_secs_f64()]);
    }
    let timing = layout.sor_time();
    write_table(&timing, &timing_rows)?;

    let problem = LaplaceProblem::dirichlet(cfg.final_nodes, laplace_reference)?;
    let solution = sor_solve(&problem, solver)?;
    let error = l1_error(&solution.phi, problem.step, laplace_reference);
    info!(
        nodes = cfg.final_nodes,
        steps = solution.steps,
        converged = solution.converged,
        l1_error = error,
        "SOR field solved"
    );
    let coords = problem.coordinates();
    let snapshot = SorSnapshot::from_field(&solution.phi, coords.clone(), coords)?;
    let snapshot_path = layout.sor_snapshot();
    write_sor_snapshot(&snapshot_path, &snapshot)?;

    Ok(vec![optimization, timing, snapshot_path])
}

/// Random-walk estimate of the Laplace problem at the lattice centre.
pub fn run_carlo(
    cfg: &CarloStudyConfig,
    layout: &DataLayout,
    seed: Option<u64>,
) -> PmplResult<Vec<PathBuf>> {
    cfg.validate()?;

    let mut timing_rows: Vec<[f64; 2]> = Vec::new();
    for nodes in cfg.timing_sizes.sizes() {
        let lattice = Lattice::unit(nodes)?;
        let mut rng = seeded(seed, Scenario::Carlo.stream(nodes as u64));
        let (estimate, elapsed) = time_it(|| {
            estimate_potential(
                &lattice,
                lattice.centre(),
                cfg.walkers,
                laplace_reference,
                &mut rng,
            )
        });
        let estimate = estimate?;
        debug!(nodes, estimate, elapsed_s = elapsed.as_secs_f64(), "carlo timing");
        timing_rows.push([nodes as f64, elapsed.as_secs_f64()]);
    }
    let timing = layout.carlo_time();
    write_table(&timing, &timing_rows)?;

    let lattice = Lattice::unit(cfg.precision_nodes)?;
    let centre = lattice.centre();
    let base = Scenario::Carlo.stream(0) | 0x8000_0000;
    let estimates = (0..cfg.precision_repeats)
        .into_par_iter()
        .map(|k| {
            let mut rng = seeded(seed, base + k as u64);
            estimate_potential(&lattice, centre, cfg.walkers, laplace_reference, &mut rng)
        })
        .collect::<PmplResult<Vec<f64>>>()?;
    if !estimates.is_empty() {
        let n = estimates.len() as f64;
        let mean = estimates.iter().sum::<f64>() / n;
        let var = estimates.iter().map(|e| (e - mean) * (e - mean)).sum::<f64>() / n;
        let (x, y) = lattice.real_point(centre);
        info!(
            repeats = estimates.len(),
            mean,
            std = var.sqrt(),
            exact = laplace_reference(x, y),
            "carlo precision"
        );
    }
    let precision_rows: Vec<[f64; 1]> = estimates.iter().map(|&e| [e]).collect();
    let precision = layout.carlo_precision();
    write_table(&precision, &precision_rows)?;

    Ok(vec![timing, precision])
}

/// Pass-through probability of a porous grid against infill probability.
pub fn run_porous(
    cfg: &PorousStudyConfig,
    layout: &DataLayout,
    seed: Option<u64>,
) -> PmplResult<Vec<PathBuf>> {
    cfg.validate()?;
    let derived = seed.map(|s| seeded(Some(s), Scenario::Porous.stream(0)).gen::<u64>());
    let curve = pass_probability_curve(
        cfg.width,
        cfg.height,
        cfg.probability_steps,
        cfg.samples,
        derived,
    )?;
    let rows: Vec<[f64; 2]> = curve.iter().map(|&(p, pass)| [p, pass]).collect();
    let path = layout.porous();
    write_table(&path, &rows)?;
    info!(points = rows.len(), "porous curve written");
    Ok(vec![path])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmpl_io::{read_relaxation_table, read_sor_snapshot, read_table, TrajectoryTable};
    use pmpl_types::config::{BackgroundGas, GridSweep, Sampling};
    use pmpl_types::constants::{M_ARGON, T_ONE_EV};

    fn temp_layout() -> (tempfile::TempDir, DataLayout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path().join("data"), dir.path().join("images"));
        layout.ensure_dirs().unwrap();
        (dir, layout)
    }

    fn small_gas(background: BackgroundGas) -> GasConfig {
        GasConfig {
            particle_count: 200,
            sampling: Sampling {
                time_step: 1e-8,
                final_time: 1e-6,
                print_count: 10,
            },
            background,
            ..GasConfig::collisionless()
        }
    }

    #[test]
    fn test_scenario_names_round_trip() {
        for sc in Scenario::ALL {
            assert_eq!(sc.name().parse::<Scenario>().unwrap(), sc);
        }
        assert_eq!(
            "boris_relativistic".parse::<Scenario>().unwrap(),
            Scenario::BorisRelativistic
        );
        assert_eq!(Scenario::BorisRelativistic.file_prefix(), "boris_relativistic");
        assert!("warp".parse::<Scenario>().is_err());
    }

    #[test]
    fn test_streams_are_disjoint() {
        assert_ne!(Scenario::Boris.stream(0), Scenario::Collisionless.stream(0));
        assert_ne!(Scenario::Carlo.stream(20), Scenario::Carlo.stream(22));
    }

    #[test]
    fn test_boris_sampling_has_no_duplicate_start() {
        let (_dir, layout) = temp_layout();
        let mut cfg = BorisConfig::classic();
        cfg.sampling.final_time = 1.0;
        cfg.sampling.print_count = 100;
        run_boris(&cfg, &layout, "boris").unwrap();

        let table = TrajectoryTable::read(layout.trajectories("boris")).unwrap();
        // t = 0 plus one sample every 10 steps of 1000
        assert_eq!(table.rows(), 101);
        let t = table.times().to_vec();
        assert_eq!(t[0], 0.0);
        assert!((t[1] - 0.01).abs() < 1e-12);
        assert!((t[100] - 1.0).abs() < 1e-12);
        assert!(t.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_boris_relativistic_speed_below_light() {
        let (_dir, layout) = temp_layout();
        let mut cfg = BorisConfig::relativistic_electron();
        cfg.sampling.final_time = 2e-11;
        cfg.sampling.print_count = 20;
        run_boris(&cfg, &layout, "boris_relativistic").unwrap();
        let table = TrajectoryTable::read(layout.trajectories("boris_relativistic")).unwrap();
        let body = table.body(0).unwrap();
        for row in body.outer_iter() {
            let v = Vector3::new(row[3], row[4], row[5]);
            assert!(v.norm() < pmpl_types::constants::C_LIGHT);
        }
        // Initial velocity is the configured one
        assert_eq!(body[[0, 4]], 1e8);
    }

    #[test]
    fn test_collisionless_gas_conserves_energy() {
        let (_dir, layout) = temp_layout();
        let cfg = small_gas(BackgroundGas::None);
        let mut rng = seeded(Some(1), 0);
        let files = run_gas(&cfg, &layout, "collisionless", &mut rng).unwrap();
        assert_eq!(files.len(), 3);

        let energy = read_table(layout.energy("collisionless")).unwrap();
        assert_eq!(energy.dim(), (10, 2));
        assert!(energy.column(1).iter().all(|d| d.abs() < 1e-12));

        let table = TrajectoryTable::read(layout.trajectories("collisionless")).unwrap();
        assert_eq!(table.body_count(), 200);
        assert_eq!(table.rows(), 11);
        for k in 0..200 {
            let body = table.body(k).unwrap();
            for r in 0..table.rows() {
                assert!((0.0..=1.0).contains(&body[[r, 0]]));
                assert!((0.0..=1.0).contains(&body[[r, 1]]));
            }
        }
        // Thermal electrons cross a 1 m box edge within 1 µs
        let side = read_table(layout.side_speeds("collisionless")).unwrap();
        assert!(side.nrows() > 0);
        assert_eq!(side.ncols(), 3);
    }

    #[test]
    fn test_cold_background_cools_gas() {
        let (_dir, layout) = temp_layout();
        // Heavy-ish background so that recoil losses are visible quickly.
        let cfg = small_gas(BackgroundGas::Cold {
            mass: 20.0 * pmpl_types::constants::M_ELECTRON,
            collision_frequency: 1e7,
            max_collision_frequency: 1e7,
        });
        let mut rng = seeded(Some(2), 0);
        run_gas(&cfg, &layout, "collisional", &mut rng).unwrap();
        let energy = read_table(layout.energy("collisional")).unwrap();
        let last = energy[[energy.nrows() - 1, 1]];
        assert!(last < -0.1, "final relative drift {last}");
    }

    #[test]
    fn test_hot_background_run_writes_all_files() {
        let (_dir, layout) = temp_layout();
        let cfg = small_gas(BackgroundGas::Hot {
            mass: M_ARGON,
            temperature: T_ONE_EV,
            collision_frequency: 0.5e7,
            max_collision_frequency: 1e7,
        });
        let mut rng = seeded(Some(3), 0);
        let files = run_gas(&cfg, &layout, "hot", &mut rng).unwrap();
        for f in &files {
            assert!(f.exists(), "{} missing", f.display());
        }
    }

    #[test]
    fn test_solar_energy_drift_small() {
        let (_dir, layout) = temp_layout();
        let mut cfg = SolarConfig::default();
        cfg.sampling.final_time = 30.0 * 24.0 * 3600.0;
        cfg.sampling.print_count = 720;
        run_solar(&cfg, &layout).unwrap();

        let energy = read_table(layout.energy("solar")).unwrap();
        assert_eq!(energy.nrows(), 720);
        assert_eq!(energy[[0, 0]], 0.0);
        let max_drift = energy
            .column(1)
            .iter()
            .fold(0.0f64, |acc, d| acc.max(d.abs()));
        assert!(max_drift < 1e-4, "max relative drift {max_drift}");

        let table = TrajectoryTable::read(layout.trajectories("solar")).unwrap();
        assert_eq!(table.body_count(), 3);
        assert!((table.times()[1] - 3600.0).abs() < 1e-9);
    }

    #[test]
    fn test_sor_study_outputs() {
        let (_dir, layout) = temp_layout();
        let cfg = SorStudyConfig {
            nodes: 15,
            omega_samples: 10,
            timing_sizes: GridSweep {
                start: 10,
                end: 16,
                step: 2,
            },
            final_nodes: 12,
            ..SorStudyConfig::default()
        };
        run_sor(&cfg, &layout).unwrap();

        let table = read_relaxation_table(layout.sor_optimization()).unwrap();
        assert_eq!(table.len(), 9);
        let timing = read_table(layout.sor_time()).unwrap();
        assert_eq!(timing.column(0).to_vec(), vec![10.0, 12.0, 14.0]);

        let snapshot = read_sor_snapshot(layout.sor_snapshot()).unwrap();
        assert_eq!(snapshot.x.len(), 12);
        assert_eq!(snapshot.phi.len(), 12);
        assert!((snapshot.phi[0][0] - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_sor_study_without_sweep_writes_empty_table() {
        let (_dir, layout) = temp_layout();
        let cfg = SorStudyConfig {
            timing_sizes: GridSweep {
                start: 8,
                end: 9,
                step: 1,
            },
            final_nodes: 8,
            ..SorStudyConfig::default()
        };
        run_sor(&cfg, &layout).unwrap();
        assert!(read_relaxation_table(layout.sor_optimization())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_carlo_study_outputs() {
        let (_dir, layout) = temp_layout();
        let cfg = CarloStudyConfig {
            walkers: 200,
            timing_sizes: GridSweep {
                start: 10,
                end: 14,
                step: 2,
            },
            precision_nodes: 21,
            precision_repeats: 8,
        };
        run_carlo(&cfg, &layout, Some(5)).unwrap();
        let timing = read_table(layout.carlo_time()).unwrap();
        assert_eq!(timing.dim(), (2, 2));
        let precision = read_table(layout.carlo_precision()).unwrap();
        assert_eq!(precision.dim(), (8, 1));
        let exact = laplace_reference(0.5, 0.5);
        for e in precision.column(0) {
            assert!((e - exact).abs() < 0.2);
        }
    }

    #[test]
    fn test_porous_study_is_seed_reproducible() {
        let (_dir, layout) = temp_layout();
        let cfg = PorousStudyConfig {
            width: 12,
            height: 12,
            probability_steps: 5,
            samples: 10,
        };
        run_porous(&cfg, &layout, Some(9)).unwrap();
        let a = read_table(layout.porous()).unwrap();
        run_porous(&cfg, &layout, Some(9)).unwrap();
        let b = read_table(layout.porous()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.dim(), (6, 2));
        assert_eq!(a[[0, 1]], 1.0);
        assert_eq!(a[[5, 1]], 0.0);
    }

    #[test]
    fn test_run_scenario_reports_files() {
        let (_dir, layout) = temp_layout();
        let mut config = LabConfig {
            seed: Some(1),
            ..LabConfig::default()
        };
        config.porous = PorousStudyConfig {
            width: 5,
            height: 5,
            probability_steps: 2,
            samples: 2,
        };
        let summary = run_scenario(Scenario::Porous, &config, &layout).unwrap();
        assert_eq!(summary.scenario, Scenario::Porous);
        assert_eq!(summary.files, vec![layout.porous()]);
    }

    #[test]
    fn test_invalid_section_rejected() {
        let (_dir, layout) = temp_layout();
        let mut cfg = BorisConfig::classic();
        cfg.mass = -1.0;
        match run_boris(&cfg, &layout, "boris").unwrap_err() {
            PmplError::ConfigError(msg) => assert!(msg.contains("boris.mass")),
            other => panic!("Unexpected error: {other:?}"),
        }
    }
}
