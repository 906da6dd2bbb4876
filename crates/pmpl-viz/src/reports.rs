// ─────────────────────────────────────────────────────────────────────
// PMPL — Dataset Reports
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One report per dataset family: load, transform, render.
//!
//! Analytic overlays take their physical parameters from the same
//! configuration that produced the data.

use crate::plot::{render_frames, render_panels, Frame, Heatmap, HistogramChart, LineChart};
use ndarray::{Array2, ArrayView1};
use pmpl_io::{
    read_relaxation_table, read_sor_snapshot, read_table, DataLayout, TrajectoryTable,
};
use pmpl_math::analytic::ExBOrbit;
use pmpl_math::optimum::optimal_relaxation;
use pmpl_math::stats::{linspace, maxwell_boltzmann_speed_pdf, normalize_by_max, speed, Histogram};
use pmpl_types::config::{BorisConfig, GasConfig, LabConfig};
use pmpl_types::error::{PmplError, PmplResult};
use pmpl_types::state::Vector3;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

const BINS: usize = 30;
const MB_POINTS: usize = 50;
/// Every this many particles is drawn in the animation frames.
const FRAME_STRIDE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Report {
    Boris,
    BorisRelativistic,
    Carlo,
    SorCarlo,
    Collisionless,
    Collisional,
    Hot,
    CollisionlessSide,
    Porous,
    Solar,
    Sor,
}

impl Report {
    pub const ALL: [Report; 11] = [
        Report::Boris,
        Report::BorisRelativistic,
        Report::Carlo,
        Report::SorCarlo,
        Report::Collisionless,
        Report::Collisional,
        Report::Hot,
        Report::CollisionlessSide,
        Report::Porous,
        Report::Solar,
        Report::Sor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Report::Boris => "boris",
            Report::BorisRelativistic => "boris-relativistic",
            Report::Carlo => "carlo",
            Report::SorCarlo => "sor-carlo",
            Report::Collisionless => "collisionless",
            Report::Collisional => "collisional",
            Report::Hot => "hot",
            Report::CollisionlessSide => "collisionless-side",
            Report::Porous => "porous",
            Report::Solar => "solar",
            Report::Sor => "sor",
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Report {
    type Err = PmplError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Report::ALL
            .into_iter()
            .find(|r| r.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Report::ALL.iter().map(|r| r.name()).collect();
                PmplError::InvalidInput(format!(
                    "unknown report '{s}', expected one of: {}",
                    names.join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone)]
pub struct ReportSummary {
    pub report: Report,
    pub images: Vec<PathBuf>,
}

pub fn run_report(
    report: Report,
    config: &LabConfig,
    layout: &DataLayout,
) -> PmplResult<ReportSummary> {
    layout.ensure_dirs()?;
    let images = match report {
        Report::Boris => boris_report(&config.boris, layout, "boris", "Boris", "Boris", "Analytic")?,
        Report::BorisRelativistic => {
            let mut images = boris_report(
                &config.boris_relativistic,
                layout,
                "boris_relativistic",
                "Relativistic Boris simulation",
                "Boris relativistic",
                "Analytic non relativistic",
            )?;
            images.push(boris_speed_report(layout)?);
            images
        }
        Report::Carlo => vec![carlo_report(layout)?],
        Report::SorCarlo => vec![sor_carlo_report(layout)?],
        Report::Collisionless => gas_report(&config.collisionless, layout, &GAS_COLLISIONLESS)?,
        Report::Collisional => gas_report(&config.collisional, layout, &GAS_COLLISIONAL)?,
        Report::Hot => gas_report(&config.hot, layout, &GAS_HOT)?,
        Report::CollisionlessSide => vec![side_compare_report(&config.collisionless, layout)?],
        Report::Porous => vec![porous_report(layout)?],
        Report::Solar => solar_report(config, layout)?,
        Report::Sor => sor_report(layout)?,
    };
    info!(report = %report, images = images.len(), "report rendered");
    Ok(ReportSummary { report, images })
}

pub fn run_reports(
    reports: &[Report],
    config: &LabConfig,
    layout: &DataLayout,
) -> PmplResult<Vec<ReportSummary>> {
    reports
        .iter()
        .map(|&r| run_report(r, config, layout))
        .collect()
}

fn xy(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> Vec<(f64, f64)> {
    x.iter().copied().zip(y.iter().copied()).collect()
}

/// Two-column table as `(col0, col1)` points.
fn read_pairs(path: &std::path::Path) -> PmplResult<Vec<(f64, f64)>> {
    let data = read_table(path)?;
    if data.ncols() < 2 {
        return Err(PmplError::InvalidInput(format!(
            "{} needs at least two columns, found {}",
            path.display(),
            data.ncols()
        )));
    }
    Ok(xy(data.column(0), data.column(1)))
}

fn speeds(velocities: &[Vector3]) -> Vec<f64> {
    velocities.iter().map(|v| speed(v.x, v.y, v.z)).collect()
}

/// Maxwell–Boltzmann speed curve from zero to `v_max`.
fn mb_curve(mass: f64, temperature: f64, v_max: f64) -> Vec<(f64, f64)> {
    linspace(0.0, v_max, MB_POINTS)
        .into_iter()
        .map(|v| (v, maxwell_boltzmann_speed_pdf(v, mass, temperature)))
        .collect()
}

fn mb_label(temperature: f64) -> String {
    format!("f(T={temperature} K)")
}

fn boris_report(
    cfg: &BorisConfig,
    layout: &DataLayout,
    prefix: &str,
    title: &str,
    sim_label: &str,
    analytic_label: &str,
) -> PmplResult<Vec<PathBuf>> {
    let table = TrajectoryTable::read(layout.trajectories(prefix))?;
    let body = table.body(0)?;
    let simulated = xy(body.column(0), body.column(1));

    let orbit = ExBOrbit {
        charge: cfg.charge,
        mass: cfg.mass,
        e_field: cfg.electric_field.x,
        b_field: cfg.magnetic_field.z,
        v0x: cfg.velocity.x,
        v0y: cfg.velocity.y,
    };
    if orbit.b_field == 0.0 {
        warn!(prefix, "no B_z, analytic orbit omitted");
    }
    let times = table.times().to_vec();
    let mut chart = LineChart::new(title)
        .labels("x [m]", "y [m]")
        .points(Some(sim_label), simulated)
        .grid();
    if orbit.b_field != 0.0 {
        chart = chart.line(Some(analytic_label), orbit.positions(&times));
    }
    let path = layout.image(&format!("{prefix}.svg"));
    chart.render(&path)?;
    Ok(vec![path])
}

fn boris_speed_report(layout: &DataLayout) -> PmplResult<PathBuf> {
    let table = TrajectoryTable::read(layout.trajectories("boris_relativistic"))?;
    let body = table.body(0)?;
    let points: Vec<(f64, f64)> = table
        .times()
        .iter()
        .zip(body.outer_iter())
        .map(|(&t, row)| (t, speed(row[3], row[4], row[5])))
        .collect();
    let path = layout.image("boris_relativistic_speed.svg");
    LineChart::new("Relativistic Boris particle speed")
        .labels("t [s]", "|v| [m/s]")
        .line(None, points)
        .scientific()
        .render(&path)?;
    Ok(path)
}

fn carlo_report(layout: &DataLayout) -> PmplResult<PathBuf> {
    let points = read_pairs(&layout.carlo_time())?;
    let path = layout.image("carlo.svg");
    LineChart::new("Monte carlo simulation scaling")
        .labels("Grid size", "Simulation time [s]")
        .line(None, points)
        .grid()
        .render(&path)?;
    Ok(path)
}

fn normalized(points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
    points
        .iter()
        .zip(normalize_by_max(&ys))
        .map(|(p, y)| (p.0, y))
        .collect()
}

fn sor_carlo_report(layout: &DataLayout) -> PmplResult<PathBuf> {
    let carlo = normalized(read_pairs(&layout.carlo_time())?);
    let sor = normalized(read_pairs(&layout.sor_time())?);
    let path = layout.image("carlo_sor_compare.svg");
    LineChart::new("SOR and carlo simulation times compared")
        .labels("Grid size", "Normalized simulation time")
        .line(Some("Carlo"), carlo)
        .line(Some("SOR"), sor)
        .grid()
        .render(&path)?;
    Ok(path)
}

/// Titles and file prefix of one gas dataset.
struct GasReport {
    prefix: &'static str,
    frame_title: &'static str,
    title: &'static str,
}

const GAS_COLLISIONLESS: GasReport = GasReport {
    prefix: "collisionless",
    frame_title: "Collisionless gas",
    title: "Collisionless gas",
};

const GAS_COLLISIONAL: GasReport = GasReport {
    prefix: "collisional",
    frame_title: "Collisional gas",
    title: "Collisional gas",
};

const GAS_HOT: GasReport = GasReport {
    prefix: "hot",
    frame_title: "Hot background gas",
    title: "Hot gas",
};

fn side_velocities(data: &Array2<f64>) -> PmplResult<Vec<Vector3>> {
    if data.nrows() > 0 && data.ncols() != 3 {
        return Err(PmplError::InvalidInput(format!(
            "side speed rows need 3 columns (vx, vy, vz), found {}",
            data.ncols()
        )));
    }
    Ok(data
        .outer_iter()
        .map(|r| Vector3::new(r[0], r[1], r[2]))
        .collect())
}

fn gas_report(cfg: &GasConfig, layout: &DataLayout, gas: &GasReport) -> PmplResult<Vec<PathBuf>> {
    let mut images = Vec::new();
    let table = TrajectoryTable::read(layout.trajectories(gas.prefix))?;

    let frames: Vec<Frame> = table
        .times()
        .iter()
        .enumerate()
        .map(|(row, &t)| Frame {
            title: format!("{}, time {t:.3e} s", gas.frame_title),
            points: table.positions_at(row, FRAME_STRIDE),
        })
        .collect();
    let side = cfg.side.begin..cfg.side.end;
    let frame_dir = layout.image(&format!("{}_frames", gas.prefix));
    images.extend(render_frames(&frame_dir, gas.prefix, &frames, side.clone(), side)?);

    let energy = read_pairs(&layout.energy(gas.prefix))?;
    let energy_path = layout.image(&format!("{}_energy.svg", gas.prefix));
    LineChart::new(format!("{} energy", gas.title))
        .labels("t [s]", "ΔE/E [-]")
        .line(None, energy)
        .scientific()
        .render(&energy_path)?;
    images.push(energy_path);

    let side_path = layout.side_speeds(gas.prefix);
    if side_path.exists() {
        let side = side_velocities(&read_table(&side_path)?)?;
        if side.is_empty() {
            warn!(prefix = gas.prefix, "no side samples, side histogram skipped");
        } else {
            let path = layout.image(&format!("{}_side_distribution.svg", gas.prefix));
            HistogramChart::new(format!("{} side speed distribution", gas.title))
                .x_label("|v| [m/s]")
                .histogram("Side", Histogram::density(&speeds(&side), BINS)?)
                .render(&path)?;
            images.push(path);
        }
    }

    let final_speeds = speeds(&table.final_velocities());
    let histogram = Histogram::density(&final_speeds, BINS)?;
    let v_max = histogram.range().1;
    let path = layout.image(&format!("{}_distribution.svg", gas.prefix));
    HistogramChart::new(format!("{} speed distribution", gas.title))
        .x_label("|v| [m/s]")
        .histogram("Samples", histogram)
        .curve(
            mb_label(cfg.temperature),
            mb_curve(cfg.particle_mass, cfg.temperature, v_max),
        )
        .render(&path)?;
    images.push(path);
    Ok(images)
}

fn side_compare_report(cfg: &GasConfig, layout: &DataLayout) -> PmplResult<PathBuf> {
    let side = side_velocities(&read_table(layout.side_speeds("collisionless"))?)?;
    if side.is_empty() {
        return Err(PmplError::EmptyInput(
            "collisionless side speeds are empty".to_string(),
        ));
    }
    let table = TrajectoryTable::read(layout.trajectories("collisionless"))?;
    let volume = table.final_velocities();

    let component = |vs: &[Vector3], pick: fn(&Vector3) -> f64| -> Vec<f64> {
        vs.iter().map(pick).collect()
    };
    let mut panels = Vec::with_capacity(4);
    let axes: [(&str, fn(&Vector3) -> f64); 3] =
        [("v_x", |v| v.x), ("v_y", |v| v.y), ("v_z", |v| v.z)];
    for (name, pick) in axes {
        panels.push(
            HistogramChart::new(name)
                .x_label(format!("{name} [m/s]"))
                .histogram(
                    format!("Volume {name}"),
                    Histogram::density(&component(&volume, pick), BINS)?,
                )
                .histogram(
                    format!("Side {name}"),
                    Histogram::density(&component(&side, pick), BINS)?,
                ),
        );
    }
    let volume_hist = Histogram::density(&speeds(&volume), BINS)?;
    let side_hist = Histogram::density(&speeds(&side), BINS)?;
    let v_max = volume_hist.range().1.max(side_hist.range().1);
    panels.push(
        HistogramChart::new("|v|")
            .x_label("|v| [m/s]")
            .histogram("Volume", volume_hist)
            .histogram("Side", side_hist)
            .curve(
                mb_label(cfg.temperature),
                mb_curve(cfg.particle_mass, cfg.temperature, v_max),
            ),
    );

    let path = layout.image("collisionless_distribution_compare.svg");
    render_panels(
        &path,
        "Comparison of volumetric and side distribution",
        &panels,
        (2, 2),
    )?;
    Ok(path)
}

fn porous_report(layout: &DataLayout) -> PmplResult<PathBuf> {
    let points = read_pairs(&layout.porous())?;
    let path = layout.image("porous.svg");
    LineChart::new("Porous material")
        .labels("Infill probability", "Pass through probability")
        .line(None, points)
        .grid()
        .render(&path)?;
    Ok(path)
}

fn solar_report(config: &LabConfig, layout: &DataLayout) -> PmplResult<Vec<PathBuf>> {
    let energy = read_pairs(&layout.energy("solar"))?;
    let energy_path = layout.image("solar_energy.svg");
    LineChart::new("Solar system energy")
        .labels("t [s]", "ΔE/E [-]")
        .line(None, energy)
        .scientific()
        .render(&energy_path)?;

    let table = TrajectoryTable::read(layout.trajectories("solar"))?;
    let names: Vec<String> = (0..table.body_count())
        .map(|k| {
            config
                .solar
                .bodies
                .get(k)
                .map(|b| b.name.clone())
                .unwrap_or_else(|| format!("Body {k}"))
        })
        .collect();
    let build = |title: &str| -> PmplResult<LineChart> {
        let mut chart = LineChart::new(title).labels("x [km]", "y [km]").grid();
        for (k, name) in names.iter().enumerate() {
            let body = table.body(k)?;
            chart = chart.line(Some(name.as_str()), xy(body.column(0), body.column(1)));
        }
        Ok(chart)
    };

    let full_path = layout.image("solar.svg");
    build("Solar system simulation")?.render(&full_path)?;

    let zoom_path = layout.image("solar_zoom.svg");
    build("Solar system simulation zoom")?
        .x_range(-1.53e8..-1.47e8)
        .y_range(-0.4e8..0.4e8)
        .render(&zoom_path)?;

    Ok(vec![energy_path, full_path, zoom_path])
}

fn sor_report(layout: &DataLayout) -> PmplResult<Vec<PathBuf>> {
    let mut images = Vec::new();

    let snapshot = read_sor_snapshot(layout.sor_snapshot())?;
    let field_path = layout.image("sor.svg");
    Heatmap {
        title: "exp(-2x) cos(2y) by SOR".to_string(),
        x_label: "x".to_string(),
        y_label: "y".to_string(),
        values: snapshot.to_array()?,
        x: snapshot.x,
        y: snapshot.y,
    }
    .render(&field_path)?;
    images.push(field_path);

    let table = read_relaxation_table(layout.sor_optimization())?;
    match optimal_relaxation(&table) {
        Ok(best) => {
            info!(omega = best.omega, steps = best.steps, "optimal relaxation parameter");
            let curve: Vec<(f64, f64)> =
                table.iter().map(|s| (s.omega, s.steps as f64)).collect();
            let label = format!("optimum ω = {:.3}", best.omega);
            let path = layout.image("sor_optimization.svg");
            LineChart::new("SOR optimization")
                .labels("ω", "steps")
                .line(None, curve)
                .points(Some(label.as_str()), vec![(best.omega, best.steps as f64)])
                .grid()
                .render(&path)?;
            images.push(path);
        }
        Err(PmplError::EmptyInput(_)) => {
            warn!("sor_optimization.csv is empty, optimization plot skipped");
        }
        Err(e) => return Err(e),
    }

    let timing = read_pairs(&layout.sor_time())?;
    let time_path = layout.image("sor_time.svg");
    LineChart::new("SOR simulation scaling")
        .labels("Grid size", "Simulation time [s]")
        .line(None, timing)
        .grid()
        .render(&time_path)?;
    images.push(time_path);
    Ok(images)
}
