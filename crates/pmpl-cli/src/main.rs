//! pmpl CLI - run the particle and mesh simulators and render their reports.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pmpl_core::scenarios::{run_scenarios, Scenario};
use pmpl_io::{read_relaxation_table, DataLayout};
use pmpl_math::optimum::optimal_relaxation;
use pmpl_types::config::LabConfig;
use pmpl_viz::{run_reports, Report};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "pmpl")]
#[command(version)]
#[command(about = "Particle & mesh physics lab: simulators, datasets and plots")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration; defaults are used when absent
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for datasets
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// Directory for rendered images
    #[arg(long, global = true, default_value = "images")]
    images_dir: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run simulators and write their datasets
    Simulate {
        /// Scenarios to run (boris, boris-relativistic, collisionless, collisional,
        /// hot, solar, sor, carlo, porous)
        #[arg(required_unless_present = "all")]
        scenarios: Vec<Scenario>,

        /// Run every scenario
        #[arg(long, conflicts_with = "scenarios")]
        all: bool,

        /// Seed for every random stream, overrides the configuration
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Render reports from existing datasets
    Evaluate {
        /// Reports to render (boris, boris-relativistic, carlo, sor-carlo,
        /// collisionless, collisional, hot, collisionless-side, porous, solar, sor)
        #[arg(required_unless_present = "all")]
        reports: Vec<Report>,

        /// Render every report
        #[arg(long, conflicts_with = "reports")]
        all: bool,
    },

    /// Print the relaxation parameter with the fewest SOR steps
    Optimum {
        /// Table of `omega,steps` rows; defaults to the dataset directory's
        #[arg(short, long)]
        table: Option<PathBuf>,
    },

    /// Validate the configuration file
    Validate,

    /// Show the default configuration
    ExampleConfig,
}

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")
}

fn load_config(path: Option<&PathBuf>) -> Result<LabConfig> {
    match path {
        Some(path) => LabConfig::from_file(&path.to_string_lossy())
            .with_context(|| format!("Failed to load config from {path:?}")),
        None => Ok(LabConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;
    let layout = DataLayout::new(&cli.data_dir, &cli.images_dir);

    match cli.command {
        Commands::ExampleConfig => {
            let text = serde_json::to_string_pretty(&LabConfig::default())
                .context("Failed to serialize default config")?;
            println!("{text}");
        }

        Commands::Validate => {
            let Some(path) = cli.config.as_ref() else {
                bail!("validate needs --config PATH");
            };
            load_config(Some(path))?;
            info!(config = ?path, "Configuration is valid");
        }

        Commands::Simulate {
            scenarios,
            all,
            seed,
        } => {
            let mut config = load_config(cli.config.as_ref())?;
            if seed.is_some() {
                config.seed = seed;
            }
            let scenarios = if all { Scenario::ALL.to_vec() } else { scenarios };
            let summaries = run_scenarios(&scenarios, &config, &layout)
                .context("Simulation failed")?;
            for summary in &summaries {
                info!(
                    "{}: {:.2} s, {} files",
                    summary.scenario,
                    summary.elapsed.as_secs_f64(),
                    summary.files.len()
                );
                for file in &summary.files {
                    info!("  {}", file.display());
                }
            }
        }

        Commands::Evaluate { reports, all } => {
            let config = load_config(cli.config.as_ref())?;
            let reports = if all { Report::ALL.to_vec() } else { reports };
            let summaries =
                run_reports(&reports, &config, &layout).context("Report rendering failed")?;
            let images: usize = summaries.iter().map(|s| s.images.len()).sum();
            info!(reports = summaries.len(), images, images_dir = ?layout.images_dir, "Reports written");
        }

        Commands::Optimum { table } => {
            let path = table.unwrap_or_else(|| layout.sor_optimization());
            let samples = read_relaxation_table(&path)
                .with_context(|| format!("Failed to read {path:?}"))?;
            let best = optimal_relaxation(&samples)
                .with_context(|| format!("No optimum in {path:?}"))?;
            info!(steps = best.steps, row = best.index, "Optimal relaxation parameter");
            println!("{}", best.omega);
        }
    }

    Ok(())
}
