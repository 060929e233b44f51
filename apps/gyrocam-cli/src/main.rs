use anyhow::Result;
use clap::{Parser, Subcommand};
use gyrocam_common::RotationOrder;
use gyrocam_input::{AbsencePolicy, AngleSet, ControlsConfig, OrientationSample};
use gyrocam_tools::OrientationInspector;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod trace;

use trace::Trace;

#[derive(Parser)]
#[command(name = "gyrocam-cli", about = "CLI tool for device orientation camera controls")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Controller config file (.yaml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Compute the camera rotation for one set of sensor angles
    Transform {
        /// Device alpha in degrees
        #[arg(long, allow_hyphen_values = true)]
        alpha: Option<f64>,
        /// Device beta in degrees
        #[arg(long, allow_hyphen_values = true)]
        beta: Option<f64>,
        /// Device gamma in degrees
        #[arg(long, allow_hyphen_values = true)]
        gamma: Option<f64>,
        /// Screen orientation in degrees
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        screen: i32,
        /// Alpha offset in radians (overrides the config file)
        #[arg(long, allow_hyphen_values = true)]
        offset: Option<f64>,
        /// Treat 0 degree readings as real angles
        #[arg(long)]
        explicit_zero: bool,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Replay a recorded sensor trace and print every change
    Replay {
        /// Trace file (.yaml or .json)
        trace: PathBuf,
        /// Emit JSON lines instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => ControlsConfig::load(path)?,
        None => ControlsConfig::default(),
    };
    tracing::debug!(?config, "controller config");

    match cli.command {
        Commands::Info => {
            println!("gyrocam-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("tools: {}", gyrocam_tools::crate_info());
            println!(
                "config: alpha_offset={} absence={:?} dispatch={:?}",
                config.alpha_offset, config.absence, config.dispatch
            );
        }
        Commands::Transform {
            alpha,
            beta,
            gamma,
            screen,
            offset,
            explicit_zero,
            json,
        } => {
            if let Some(offset) = offset {
                config.alpha_offset = offset;
            }
            if explicit_zero {
                config.absence = AbsencePolicy::Explicit;
            }
            let sample = OrientationSample { alpha, beta, gamma };
            let angles = AngleSet::resolve(&sample, screen, config.alpha_offset, config.absence);
            let summary = OrientationInspector::summarize(angles.quaternion(), RotationOrder::Yxz);
            if json {
                println!("{}", serde_json::to_string(&summary)?);
            } else {
                println!("{summary}");
            }
        }
        Commands::Replay { trace, json } => {
            let trace = Trace::load(&trace)?;
            tracing::info!(events = trace.events.len(), "replaying trace");
            for (i, summary) in trace::replay(&trace, config)?.iter().enumerate() {
                if json {
                    println!("{}", serde_json::to_string(summary)?);
                } else {
                    println!("change {i}: {summary}");
                }
            }
        }
    }

    Ok(())
}
