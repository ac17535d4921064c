//! CLI frontend for Navgrid scenes.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ng",
    about = "Navgrid: tile navigation and turn sequencing for tactical scenes",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log search and turn details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tiles of a scene with their neighbours
    Tiles {
        /// Scene file (JSON)
        scene: PathBuf,

        /// Show contact points and neighbour edges of one tile
        #[arg(short, long)]
        detail: Option<String>,
    },

    /// Show every tile reachable from a start tile within a budget
    Reach {
        /// Scene file (JSON)
        scene: PathBuf,

        /// Start tile, by name or #id
        from: String,

        /// Movement budget
        #[arg(short, long, default_value = "500")]
        budget: f32,

        /// Ignore the scene's obstacles
        #[arg(long)]
        no_obstacles: bool,
    },

    /// Find the cheapest route between two tiles
    Route {
        /// Scene file (JSON)
        scene: PathBuf,

        /// Start tile, by name or #id
        from: String,

        /// Destination tile, by name or #id
        to: String,

        /// Movement budget (default: unlimited)
        #[arg(short, long)]
        budget: Option<f32>,
    },

    /// Let the scene's units take turns moving around
    Skirmish {
        /// Scene file (JSON)
        scene: PathBuf,

        /// Number of rounds to play
        #[arg(short, long, default_value = "3")]
        rounds: u32,

        /// RNG seed for deterministic moves
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Tiles { scene, detail } => commands::tiles::run(&scene, detail.as_deref()),
        Commands::Reach {
            scene,
            from,
            budget,
            no_obstacles,
        } => commands::reach::run(&scene, &from, budget, no_obstacles),
        Commands::Route {
            scene,
            from,
            to,
            budget,
        } => commands::route::run(&scene, &from, &to, budget),
        Commands::Skirmish {
            scene,
            rounds,
            seed,
        } => commands::skirmish::run(&scene, rounds, seed),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
