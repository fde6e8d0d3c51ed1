//! CLI frontend for the Ashfall narrative engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "ash",
    about = "Ashfall — a branching-narrative survival engine",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a story interactively
    Play {
        /// Story file (JSON scene graph)
        story: PathBuf,

        /// Directory holding save files
        #[arg(short, long, default_value = ".")]
        save_dir: PathBuf,

        /// Ignore any existing save and start over
        #[arg(short, long)]
        new: bool,

        /// RNG seed for a new game
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Validate a story file and report content issues
    Check {
        /// Story file (JSON scene graph)
        story: PathBuf,

        /// Scene to start reachability from
        #[arg(long)]
        start: Option<String>,
    },

    /// Summarize a story file
    Info {
        /// Story file (JSON scene graph)
        story: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            story,
            save_dir,
            new,
            seed,
        } => commands::play::run(&story, &save_dir, new, seed),
        Commands::Check { story, start } => commands::check::run(&story, start.as_deref()),
        Commands::Info { story } => commands::info::run(&story),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
