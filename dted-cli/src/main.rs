use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// DTED elevation data CLI tool
#[derive(Parser)]
#[command(name = "dted")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root directory of the DTED tile tree (e138/n35.dt1, ...)
    #[arg(short, long, env = "DTED_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// Maximum tiles in cache
    #[arg(
        short,
        long,
        env = "DTED_CACHE_SIZE",
        default_value = "100",
        global = true
    )]
    cache_size: u64,

    /// Only use tiles of this DTED level (0, 1 or 2)
    #[arg(short, long, env = "DTED_LEVEL", global = true, value_parser = clap::value_parser!(u8).range(0..=2))]
    level: Option<u8>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query elevation for a single coordinate
    Query {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Process elevation for multiple coordinates from a file
    Batch {
        /// Input file (CSV or GeoJSON)
        input: PathBuf,

        /// Output file (same format as input if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for latitude (CSV only)
        #[arg(long, default_value = "lat")]
        lat_col: String,

        /// Column name for longitude (CSV only)
        #[arg(long, default_value = "lon")]
        lon_col: String,
    },

    /// Display the headers and statistics of a DTED file
    Info {
        /// Path to a .dt0/.dt1/.dt2 file
        file: PathBuf,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// List available DTED tiles
    List,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dted=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = commands::ServiceConfig {
        data_dir: cli.data_dir,
        cache_size: cli.cache_size,
        level: cli.level,
    };

    match cli.command {
        Commands::Query { lat, lon, json } => commands::query::run(&config, lat, lon, json),
        Commands::Batch {
            input,
            output,
            lat_col,
            lon_col,
        } => commands::batch::run(&config, input, output, lat_col, lon_col),
        Commands::Info { file, json } => commands::info::run(file, json),
        Commands::List => commands::list::run(&config),
    }
}
