//! navtrack CLI - Command-line interface
//!
//! Replays routes through the navtrack engine and inspects route files.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use navtrack::location::{DEFAULT_REPLAY_INTERVAL, DEFAULT_REPLAY_SPEED};

use commands::inspect::InspectArgs;
use commands::replay::ReplayArgs;

#[derive(Parser)]
#[command(name = "navtrack")]
#[command(version = navtrack::VERSION)]
#[command(about = "Route progress tracking for turn-by-turn navigation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a route file through the engine and print navigation events
    Replay {
        /// Route JSON file (a single route object)
        route: PathBuf,

        /// Simulated speed in meters per second
        #[arg(long, default_value_t = DEFAULT_REPLAY_SPEED)]
        speed: f64,

        /// Milliseconds between simulated fixes
        #[arg(long, default_value_t = DEFAULT_REPLAY_INTERVAL.as_millis() as u64)]
        interval_ms: u64,

        /// Config file (default: ~/.navtrack/config.ini)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Report raw fixes instead of fixes snapped to the route
        #[arg(long)]
        no_snap: bool,
    },

    /// Print a leg and step summary of a route file
    Inspect {
        /// Route JSON file (a single route object)
        route: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay {
            route,
            speed,
            interval_ms,
            config,
            no_snap,
        } => commands::replay::run(ReplayArgs {
            route,
            speed,
            interval_ms,
            config,
            no_snap,
        }),
        Commands::Inspect { route } => commands::inspect::run(InspectArgs { route }),
    };

    if let Err(e) = result {
        e.exit();
    }
}
