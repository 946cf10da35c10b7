//! Overlay layer renderer.
//!
//! Renders every configured layer for every case of a dataset into
//! `<output>/<layer>/<case>.<ext>`, plus `<output>/<layer>/legend.png`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use layers::{validate_layers, LayerFactory};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use layer_render::{load_dataset, render_all, RenderConfig};

#[derive(Parser, Debug)]
#[command(name = "layer-render")]
#[command(about = "Render overlay layers from a gridded dataset")]
struct Args {
    /// Layer configuration file (YAML)
    #[arg(short, long, env = "LAYER_RENDER_CONFIG")]
    config: PathBuf,

    /// Dataset file (.json, or .nc with the netcdf feature)
    #[arg(short, long, env = "LAYER_RENDER_DATASET")]
    dataset: PathBuf,

    /// Output directory
    #[arg(short, long, env = "LAYER_RENDER_OUTPUT", default_value = "layers")]
    output: PathBuf,

    /// Log level, or a full filter directive such as `layers=debug,info`
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, env = "LAYER_RENDER_JSON_LOGS")]
    json_logs: bool,
}

fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs)?;

    info!(config = ?args.config, dataset = ?args.dataset, "Starting layer renderer");

    let config = RenderConfig::load(&args.config)?;
    let dataset = load_dataset(&args.dataset)?;

    let factory = LayerFactory::with_http(config.fetch_timeout()).context("Failed to create tile fetcher")?;
    let mut layers = factory
        .create_all(&config.layers, &config.coordinate_names())
        .context("Invalid layer definition")?;
    info!(layers = layers.len(), "Created layers");

    let issues = validate_layers(&mut layers, &dataset);
    if !issues.is_empty() {
        for issue in &issues {
            error!(layer = %issue.layer, error = %issue.error, "Invalid layer");
        }
        bail!("{} of {} layers failed validation", issues.len(), layers.len());
    }

    let summary = render_all(
        &layers,
        &dataset,
        &config.case_dimension,
        &args.output,
        &config.image_format,
    )?;

    if !summary.failures.is_empty() {
        bail!(
            "{} builds failed, first: {}",
            summary.failures.len(),
            summary.failures[0]
        );
    }
    info!(output = ?args.output, images = summary.images, legends = summary.legends, "Done");
    Ok(())
}

fn init_tracing(filter: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_new(filter).context("Invalid log level")?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
