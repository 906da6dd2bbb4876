// ─────────────────────────────────────────────────────────────────────
// PMPL — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::constants::{
    C_LIGHT, EARTH_PERIHELION_KM, EARTH_PERIHELION_SPEED_KM_S, G_KM, MOON_PERIGEE_KM,
    MOON_PERIGEE_SPEED_KM_S, M_ARGON, M_EARTH, M_ELECTRON, M_MOON, M_SUN, Q_ELECTRON, T_ONE_EV,
    YEAR_S,
};
use crate::error::{PmplError, PmplResult};
use crate::state::{Interval, Vector3};
use serde::{Deserialize, Serialize};

/// Top-level lab configuration, one section per scenario.
/// Every section is optional in JSON; absent sections take the values the
/// reference datasets were produced with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    /// Global RNG seed. `None` draws from OS entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub boris: BorisConfig,
    pub boris_relativistic: BorisConfig,
    pub collisionless: GasConfig,
    pub collisional: GasConfig,
    pub hot: GasConfig,
    pub solar: SolarConfig,
    pub sor: SorStudyConfig,
    pub carlo: CarloStudyConfig,
    pub porous: PorousStudyConfig,
}

impl Default for LabConfig {
    fn default() -> Self {
        LabConfig {
            seed: None,
            boris: BorisConfig::classic(),
            boris_relativistic: BorisConfig::relativistic_electron(),
            collisionless: GasConfig::collisionless(),
            collisional: GasConfig::collisional(),
            hot: GasConfig::hot(),
            solar: SolarConfig::default(),
            sor: SorStudyConfig::default(),
            carlo: CarloStudyConfig::default(),
            porous: PorousStudyConfig::default(),
        }
    }
}

impl LabConfig {
    /// Load from a JSON file; missing sections fall back to defaults.
    pub fn from_file(path: &str) -> PmplResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PmplResult<()> {
        self.boris.validate("boris")?;
        self.boris_relativistic.validate("boris_relativistic")?;
        self.collisionless.validate("collisionless")?;
        self.collisional.validate("collisional")?;
        self.hot.validate("hot")?;
        self.solar.validate()?;
        self.sor.validate()?;
        self.carlo.validate()?;
        self.porous.validate()?;
        Ok(())
    }
}

fn config_error(msg: String) -> PmplError {
    PmplError::ConfigError(msg)
}

fn require_positive(value: f64, name: &str) -> PmplResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(config_error(format!(
            "{name} must be finite and > 0, got {value}"
        )));
    }
    Ok(())
}

fn require_finite_vector(value: &Vector3, name: &str) -> PmplResult<()> {
    if !value.is_finite() {
        return Err(config_error(format!("{name} components must be finite")));
    }
    Ok(())
}

/// Time stepping and output sampling of a time-dependent run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sampling {
    pub time_step: f64,
    pub final_time: f64,
    /// Approximate number of recorded samples over the run.
    pub print_count: usize,
}

impl Sampling {
    pub fn steps(&self) -> usize {
        (self.final_time / self.time_step).round() as usize
    }

    /// Record a sample every this many steps (never zero).
    pub fn record_every(&self) -> usize {
        (self.steps() / self.print_count.max(1)).max(1)
    }

    pub fn validate(&self, label: &str) -> PmplResult<()> {
        require_positive(self.time_step, &format!("{label}.time_step"))?;
        require_positive(self.final_time, &format!("{label}.final_time"))?;
        if self.print_count == 0 {
            return Err(config_error(format!("{label}.print_count must be >= 1")));
        }
        if self.steps() == 0 {
            return Err(config_error(format!(
                "{label}.final_time must cover at least one time_step"
            )));
        }
        Ok(())
    }
}

/// Single charged particle in uniform, static E and B fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorisConfig {
    pub mass: f64,
    pub charge: f64,
    pub position: Vector3,
    pub velocity: Vector3,
    pub electric_field: Vector3,
    pub magnetic_field: Vector3,
    /// Push the proper velocity `γv` instead of `v`.
    pub relativistic: bool,
    pub sampling: Sampling,
}

impl BorisConfig {
    /// Unit-mass, unit-charge particle drifting in crossed unit fields.
    pub fn classic() -> Self {
        BorisConfig {
            mass: 1.0,
            charge: 1.0,
            position: Vector3::ZERO,
            velocity: Vector3::new(1.0, 1.0, 0.0),
            electric_field: Vector3::new(1.0, 0.0, 0.0),
            magnetic_field: Vector3::new(0.0, 0.0, 1.0),
            relativistic: false,
            sampling: Sampling {
                time_step: 1e-3,
                final_time: 10.0,
                print_count: 1000,
            },
        }
    }

    /// Electron at a third of the speed of light in a 1 T field.
    pub fn relativistic_electron() -> Self {
        BorisConfig {
            mass: M_ELECTRON,
            charge: Q_ELECTRON,
            position: Vector3::ZERO,
            velocity: Vector3::new(0.0, 1e8, 0.0),
            electric_field: Vector3::new(1e8, 0.0, 0.0),
            magnetic_field: Vector3::new(0.0, 0.0, 1.0),
            relativistic: true,
            sampling: Sampling {
                time_step: 1e-13,
                final_time: 1e-10,
                print_count: 1000,
            },
        }
    }

    pub fn validate(&self, label: &str) -> PmplResult<()> {
        require_positive(self.mass, &format!("{label}.mass"))?;
        if !self.charge.is_finite() {
            return Err(config_error(format!("{label}.charge must be finite")));
        }
        require_finite_vector(&self.position, &format!("{label}.position"))?;
        require_finite_vector(&self.velocity, &format!("{label}.velocity"))?;
        require_finite_vector(&self.electric_field, &format!("{label}.electric_field"))?;
        require_finite_vector(&self.magnetic_field, &format!("{label}.magnetic_field"))?;
        if self.relativistic && self.velocity.norm() >= C_LIGHT {
            return Err(config_error(format!(
                "{label}.velocity must be below the speed of light"
            )));
        }
        self.sampling.validate(&format!("{label}.sampling"))
    }
}

/// Background gas the tracked particles scatter on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackgroundGas {
    /// Free streaming.
    None,
    /// Background atoms at rest.
    Cold {
        mass: f64,
        collision_frequency: f64,
        max_collision_frequency: f64,
    },
    /// Background atoms with a Maxwellian velocity distribution.
    Hot {
        mass: f64,
        temperature: f64,
        collision_frequency: f64,
        max_collision_frequency: f64,
    },
}

impl BackgroundGas {
    fn validate(&self, label: &str) -> PmplResult<()> {
        let (mass, freq, max_freq) = match *self {
            BackgroundGas::None => return Ok(()),
            BackgroundGas::Cold {
                mass,
                collision_frequency,
                max_collision_frequency,
            } => (mass, collision_frequency, max_collision_frequency),
            BackgroundGas::Hot {
                mass,
                temperature,
                collision_frequency,
                max_collision_frequency,
            } => {
                require_positive(temperature, &format!("{label}.temperature"))?;
                (mass, collision_frequency, max_collision_frequency)
            }
        };
        require_positive(mass, &format!("{label}.mass"))?;
        require_positive(max_freq, &format!("{label}.max_collision_frequency"))?;
        if !freq.is_finite() || freq < 0.0 || freq > max_freq {
            return Err(config_error(format!(
                "{label}.collision_frequency must be in [0, max_collision_frequency], got {freq}"
            )));
        }
        Ok(())
    }
}

/// Electron gas in a periodic square.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GasConfig {
    pub particle_count: usize,
    pub side: Interval,
    pub particle_mass: f64,
    pub temperature: f64,
    pub sampling: Sampling,
    pub background: BackgroundGas,
}

impl GasConfig {
    pub fn collisionless() -> Self {
        GasConfig {
            particle_count: 10_000,
            side: Interval::UNIT,
            particle_mass: M_ELECTRON,
            temperature: T_ONE_EV,
            sampling: Sampling {
                time_step: 1e-9,
                final_time: 1e-5,
                print_count: 350,
            },
            background: BackgroundGas::None,
        }
    }

    pub fn collisional() -> Self {
        GasConfig {
            background: BackgroundGas::Cold {
                mass: M_ARGON,
                collision_frequency: 0.5e7,
                max_collision_frequency: 1e7,
            },
            ..GasConfig::collisionless()
        }
    }

    pub fn hot() -> Self {
        GasConfig {
            particle_count: 1000,
            sampling: Sampling {
                time_step: 1e-8,
                final_time: 1e-2,
                print_count: 350,
            },
            background: BackgroundGas::Hot {
                mass: M_ARGON,
                temperature: T_ONE_EV,
                collision_frequency: 0.5e7,
                max_collision_frequency: 1e7,
            },
            ..GasConfig::collisionless()
        }
    }

    pub fn validate(&self, label: &str) -> PmplResult<()> {
        if self.particle_count == 0 {
            return Err(config_error(format!("{label}.particle_count must be >= 1")));
        }
        if !self.side.is_valid() {
            return Err(config_error(format!(
                "{label}.side must be a finite interval with end > begin"
            )));
        }
        require_positive(self.particle_mass, &format!("{label}.particle_mass"))?;
        require_positive(self.temperature, &format!("{label}.temperature"))?;
        self.sampling.validate(&format!("{label}.sampling"))?;
        self.background.validate(&format!("{label}.background"))
    }
}

/// Named gravitating body; positions in km, velocities in km/s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyConfig {
    pub name: String,
    pub mass: f64,
    pub position: Vector3,
    pub velocity: Vector3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarConfig {
    pub gravitational_constant: f64,
    pub bodies: Vec<BodyConfig>,
    pub sampling: Sampling,
}

impl Default for SolarConfig {
    fn default() -> Self {
        SolarConfig {
            gravitational_constant: G_KM,
            bodies: vec![
                BodyConfig {
                    name: "Sun".to_string(),
                    mass: M_SUN,
                    position: Vector3::ZERO,
                    velocity: Vector3::ZERO,
                },
                BodyConfig {
                    name: "Earth".to_string(),
                    mass: M_EARTH,
                    position: Vector3::new(EARTH_PERIHELION_KM, 0.0, 0.0),
                    velocity: Vector3::new(0.0, EARTH_PERIHELION_SPEED_KM_S, 0.0),
                },
                BodyConfig {
                    name: "Moon".to_string(),
                    mass: M_MOON,
                    position: Vector3::new(EARTH_PERIHELION_KM + MOON_PERIGEE_KM, 0.0, 0.0),
                    velocity: Vector3::new(
                        0.0,
                        EARTH_PERIHELION_SPEED_KM_S + MOON_PERIGEE_SPEED_KM_S,
                        0.0,
                    ),
                },
            ],
            sampling: Sampling {
                time_step: 60.0 * 60.0,
                final_time: YEAR_S,
                print_count: 5000,
            },
        }
    }
}

impl SolarConfig {
    pub fn validate(&self) -> PmplResult<()> {
        require_positive(self.gravitational_constant, "solar.gravitational_constant")?;
        if self.bodies.len() < 2 {
            return Err(config_error(
                "solar.bodies must contain at least two bodies".to_string(),
            ));
        }
        for (idx, body) in self.bodies.iter().enumerate() {
            require_positive(body.mass, &format!("solar.bodies[{idx}].mass"))?;
            require_finite_vector(&body.position, &format!("solar.bodies[{idx}].position"))?;
            require_finite_vector(&body.velocity, &format!("solar.bodies[{idx}].velocity"))?;
        }
        for i in 0..self.bodies.len() {
            for j in i + 1..self.bodies.len() {
                if self.bodies[i].position == self.bodies[j].position {
                    return Err(config_error(format!(
                        "solar.bodies[{i}] and solar.bodies[{j}] share a position"
                    )));
                }
            }
        }
        self.sampling.validate("solar.sampling")
    }
}

/// Half-open range of square grid sizes `start, start + step, .. < end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSweep {
    pub start: usize,
    pub end: usize,
    pub step: usize,
}

impl GridSweep {
    pub fn sizes(&self) -> Vec<usize> {
        (self.start..self.end).step_by(self.step.max(1)).collect()
    }

    fn validate(&self, label: &str) -> PmplResult<()> {
        if self.step == 0 {
            return Err(config_error(format!("{label}.step must be >= 1")));
        }
        if self.start < 3 {
            return Err(config_error(format!(
                "{label}.start must be >= 3 so the grid has an interior"
            )));
        }
        Ok(())
    }
}

impl Default for GridSweep {
    fn default() -> Self {
        GridSweep {
            start: 20,
            end: 202,
            step: 2,
        }
    }
}

/// Laplace problem solved by successive over-relaxation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SorStudyConfig {
    /// Nodes per side for the relaxation parameter sweep.
    pub nodes: usize,
    /// Number of ω subdivisions of (1, 2); 0 disables the sweep.
    pub omega_samples: usize,
    pub timing_sizes: GridSweep,
    pub timing_omega: f64,
    /// Nodes per side of the solve persisted as the field snapshot.
    pub final_nodes: usize,
    /// Convergence when max |residual| <= tolerance * h².
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for SorStudyConfig {
    fn default() -> Self {
        SorStudyConfig {
            nodes: 201,
            omega_samples: 0,
            timing_sizes: GridSweep::default(),
            timing_omega: 1.84,
            final_nodes: 202,
            tolerance: 1e-5,
            max_iterations: 1_000_000,
        }
    }
}

impl SorStudyConfig {
    pub fn validate(&self) -> PmplResult<()> {
        if self.nodes < 3 || self.final_nodes < 3 {
            return Err(config_error(
                "sor.nodes and sor.final_nodes must be >= 3".to_string(),
            ));
        }
        if !self.timing_omega.is_finite() || self.timing_omega <= 0.0 || self.timing_omega >= 2.0
        {
            return Err(config_error(format!(
                "sor.timing_omega must be in (0, 2), got {}",
                self.timing_omega
            )));
        }
        require_positive(self.tolerance, "sor.tolerance")?;
        if self.max_iterations == 0 {
            return Err(config_error("sor.max_iterations must be >= 1".to_string()));
        }
        self.timing_sizes.validate("sor.timing_sizes")
    }
}

/// Random-walk (Monte Carlo) estimate of the same Laplace problem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarloStudyConfig {
    pub walkers: usize,
    pub timing_sizes: GridSweep,
    pub precision_nodes: usize,
    pub precision_repeats: usize,
}

impl Default for CarloStudyConfig {
    fn default() -> Self {
        CarloStudyConfig {
            walkers: 1000,
            timing_sizes: GridSweep::default(),
            precision_nodes: 202,
            precision_repeats: 100,
        }
    }
}

impl CarloStudyConfig {
    pub fn validate(&self) -> PmplResult<()> {
        if self.walkers == 0 {
            return Err(config_error("carlo.walkers must be >= 1".to_string()));
        }
        if self.precision_nodes < 3 {
            return Err(config_error(
                "carlo.precision_nodes must be >= 3".to_string(),
            ));
        }
        self.timing_sizes.validate("carlo.timing_sizes")
    }
}

/// Site percolation through a randomly blocked grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PorousStudyConfig {
    pub width: usize,
    pub height: usize,
    /// Infill probability resolution: p = i / probability_steps.
    pub probability_steps: usize,
    /// Random fills per probability.
    pub samples: usize,
}

impl Default for PorousStudyConfig {
    fn default() -> Self {
        PorousStudyConfig {
            width: 50,
            height: 50,
            probability_steps: 100,
            samples: 100,
        }
    }
}

impl PorousStudyConfig {
    pub fn validate(&self) -> PmplResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(config_error(
                "porous.width and porous.height must be >= 1".to_string(),
            ));
        }
        if self.probability_steps == 0 || self.samples == 0 {
            return Err(config_error(
                "porous.probability_steps and porous.samples must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
