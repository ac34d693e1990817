//! civlite CLI - inspect scenarios and replay action scripts.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// civlite - a deterministic turn-based strategy simulation
#[derive(Parser, Debug)]
#[command(name = "civlite")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario JSON file (default: the built-in reference scenario)
    #[arg(short, long, global = true)]
    scenario: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the map as seen by one civilization
    Show {
        /// Viewing civilization
        #[arg(short, long, default_value = "0")]
        viewer: u8,

        /// Output format: text, ansi, or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Ignore fog of war
        #[arg(short, long)]
        all: bool,
    },

    /// Show the tiles a unit can reach this turn
    Reach {
        /// Unit id
        #[arg(short, long)]
        unit: u32,

        /// Viewing civilization
        #[arg(short, long, default_value = "0")]
        viewer: u8,

        /// Output format: text, ansi, or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Apply a JSON action script and print the result
    Run {
        /// Action script (JSON array of actions)
        #[arg(short = 'x', long)]
        actions: PathBuf,

        /// Viewing civilization for the final map
        #[arg(short, long, default_value = "0")]
        viewer: u8,

        /// Output format: text, ansi, or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Only print the final map
        #[arg(short, long)]
        quiet: bool,
    },

    /// Describe one tile
    Describe {
        /// Column
        #[arg(short, long)]
        x: u16,

        /// Row
        #[arg(short, long)]
        y: u16,

        /// Viewing civilization
        #[arg(short, long, default_value = "0")]
        viewer: u8,

        /// Selected unit, marked in the description
        #[arg(long)]
        selected: Option<u32>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let scenario = args.scenario.as_deref();

    let result = match args.command {
        Commands::Show {
            viewer,
            format,
            all,
        } => cli::show::execute(scenario, viewer, format, all),

        Commands::Reach {
            unit,
            viewer,
            format,
        } => cli::reach::execute(scenario, unit, viewer, format),

        Commands::Run {
            actions,
            viewer,
            format,
            quiet,
        } => cli::run::execute(scenario, &actions, viewer, format, quiet),

        Commands::Describe {
            x,
            y,
            viewer,
            selected,
        } => cli::describe::execute(scenario, x, y, viewer, selected),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
