//! Glimpse CLI - Inspect JPEG metadata and summarize photos.
//!
//! Glimpse reads the metadata segments of JPEG files (EXIF, frame header,
//! comment) and either dumps every decoded tag or renders the short detail
//! summary a photo viewer shows for a picture or an album selection.
//!
//! # Usage
//!
//! ```bash
//! # Dump all tags of one image
//! glimpse dump IMG_0001.jpg
//!
//! # Dump a directory as JSON Lines
//! glimpse dump ./photos/ --format jsonl --output tags.jsonl
//!
//! # Detail lines for a photo, or for several folders as albums
//! glimpse details IMG_0001.jpg
//! glimpse details ./2023/ ./2024/
//!
//! # View configuration
//! glimpse config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Glimpse - JPEG metadata inspection and photo detail summaries.
#[derive(Parser, Debug)]
#[command(name = "glimpse")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode and print every metadata tag of JPEG files
    Dump(cli::dump::DumpArgs),

    /// Render detail lines for a photo or a selection of albums
    Details(cli::details::DetailsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match glimpse_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `glimpse config path`."
            );
            glimpse_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Glimpse v{}", glimpse_core::VERSION);

    match cli.command {
        Commands::Dump(args) => cli::dump::execute(args, config).await,
        Commands::Details(args) => cli::details::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
