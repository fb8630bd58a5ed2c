//! The `glimpse details` command: detail lines for a photo or albums.
//!
//! One file is summarized as a single item. Anything else becomes a set
//! selection with one album per containing directory.

use clap::Args;
use glimpse_core::{Config, Glimpse, OutputWriter};
use std::path::PathBuf;

use super::dump::open_output;
use super::types::OutputFormat;

/// Arguments for the `details` command.
#[derive(Args, Debug)]
pub struct DetailsArgs {
    /// JPEG files or directories (each directory is one album)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (defaults to `output.format` from the config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// strftime pattern for dates (overrides `detail.date_format`)
    #[arg(long)]
    pub date_format: Option<String>,

    /// Do not derive a location from GPS coordinates
    #[arg(long)]
    pub no_location: bool,
}

/// Apply command-line overrides to the loaded configuration.
fn apply_overrides(args: &DetailsArgs, mut config: Config) -> Config {
    if let Some(date_format) = &args.date_format {
        config.detail.date_format = date_format.clone();
    }
    if args.no_location {
        config.detail.geocoder = "none".to_string();
    }
    config
}

/// Execute the details command.
pub async fn execute(args: DetailsArgs, config: Config) -> anyhow::Result<()> {
    let config = apply_overrides(&args, config);
    let format = args
        .format
        .unwrap_or_else(|| OutputFormat::from_config(&config.output.format));
    let pretty = config.output.pretty;

    let files = super::collect_files(&config, &args.inputs);
    if files.is_empty() {
        tracing::warn!("No photos selected");
        return Ok(());
    }
    tracing::debug!("Building details for {} file(s)", files.len());

    let glimpse = Glimpse::new(config);
    let report = tokio::task::spawn_blocking(move || glimpse.details(&files)).await??;

    let mut writer = OutputWriter::new(open_output(&args.output)?, format.into(), pretty);
    writer.write(&report)?;
    writer.flush()?;
    if let Some(path) = &args.output {
        tracing::info!("Output written to {:?}", path);
    }
    Ok(())
}
