//! patower CLI - pressure-advance calibration tower generator.
//!
//! Emits the tower G-code on stdout, or to a file with `-o`. Diagnostics
//! go to stderr via `tracing` so the stream can be piped straight into a
//! `.gcode` file:
//!
//! ```text
//! patower --layers 100 --pa-max 0.06 > pa_tower.gcode
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use patower::{generate_gcode, TowerSettings};
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "patower")]
#[command(about = "Generate a pressure-advance calibration tower", long_about = None)]
struct Cli {
    /// TOML settings file; missing fields fall back to defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the G-code here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of ramped layers
    #[arg(long)]
    layers: Option<u32>,

    /// Pressure advance at the bottom of the ramp
    #[arg(long)]
    pa_min: Option<f64>,

    /// Pressure advance at the top of the ramp
    #[arg(long)]
    pa_max: Option<f64>,

    /// Side length of the calibration square (mm)
    #[arg(long)]
    side: Option<f64>,

    /// Hotend temperature (degrees C)
    #[arg(long)]
    print_temp: Option<f64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    info!(
        layers = settings.layer_count,
        pa_min = settings.pa_min,
        pa_max = settings.pa_max,
        side = settings.square_side_length,
        "generating calibration tower"
    );

    let gcode = generate_gcode(&settings)?;
    debug!(lines = gcode.lines().count(), "tower generated");

    match &cli.output {
        Some(path) => {
            fs::write(path, &gcode)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => print!("{gcode}"),
    }

    Ok(())
}

fn load_settings(cli: &Cli) -> Result<TowerSettings> {
    let mut settings = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("invalid settings in {}", path.display()))?
        }
        None => TowerSettings::default(),
    };

    if let Some(layers) = cli.layers {
        settings.layer_count = layers;
    }
    if let Some(pa_min) = cli.pa_min {
        settings.pa_min = pa_min;
    }
    if let Some(pa_max) = cli.pa_max {
        settings.pa_max = pa_max;
    }
    if let Some(side) = cli.side {
        settings.square_side_length = side;
    }
    if let Some(temp) = cli.print_temp {
        settings.print_temp = temp;
    }

    Ok(settings)
}
