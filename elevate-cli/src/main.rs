//! Elevate CLI - ground elevation lookups over terrarium tiles.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::query::QueryArgs;
use commands::serve::ServeArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "elevate")]
#[command(version, about = "Ground elevation service over global terrain tiles", long_about = None)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP API until Ctrl+C
    Serve {
        /// Listen address, e.g. 0.0.0.0:1323 (overrides config and SERVER_ADDR)
        #[arg(long)]
        address: Option<String>,
    },

    /// Resolve heights once and print the JSON report
    ///
    /// Options must come before the coordinates, since coordinates may
    /// start with a minus sign.
    Query {
        /// Deadline for the whole batch in milliseconds
        #[arg(long, value_name = "MS")]
        deadline_ms: Option<u64>,

        /// Tile zoom level
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=elevate::coord::MAX_ZOOM as i64))]
        zoom: Option<u8>,

        /// Log lookup progress to stderr
        #[arg(short, long)]
        verbose: bool,

        /// Points as LAT,LON in decimal degrees
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true, value_name = "LAT,LON")]
        points: Vec<String>,
    },

    /// Write a default configuration file
    Init,

    /// View or modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Serve { address } => commands::serve::run(ServeArgs {
            config: cli.config,
            address,
        }),
        Commands::Query {
            deadline_ms,
            zoom,
            verbose,
            points,
        } => commands::query::run(QueryArgs {
            config: cli.config,
            points,
            deadline_ms,
            zoom,
            verbose,
        }),
        Commands::Init => commands::init::run(cli.config),
        Commands::Config { command } => commands::config::run(command, cli.config),
    }
}
