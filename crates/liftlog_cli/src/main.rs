//! Liftlog CLI
//!
//! Command-line workout log backed by the local store, with push sync
//! to a remote authority.
//!
//! # Commands
//!
//! - `log` - Record a set
//! - `history` - Show logged sets, newest first
//! - `names` - List exercise names by usage
//! - `progress` - Show the chronological series and stats for one exercise
//! - `last` - Show the most recent set for one exercise
//! - `delete` - Remove a set by id
//! - `sync` - Push unsynced sets to the server
//! - `serve` - Run the remote authority server

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Offline-first workout log.
#[derive(Parser)]
#[command(name = "liftlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the log file
    #[arg(global = true, short, long, default_value = "liftlog.json")]
    data: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a set
    Log {
        /// Exercise name
        name: String,

        /// Weight moved
        weight: f64,

        /// Number of sets
        #[arg(short, long)]
        sets: Option<u32>,

        /// Repetitions per set
        #[arg(short, long)]
        reps: Option<u32>,

        /// Weight unit (kg, lb)
        #[arg(short, long, default_value = "kg")]
        unit: String,

        /// Free-text notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Show logged sets, newest first
    History {
        /// Only this exercise
        #[arg(short, long)]
        name: Option<String>,

        /// Maximum number of sets to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List exercise names, most used first
    Names,

    /// Show the chronological series and stats for one exercise
    Progress {
        /// Exercise name
        name: String,
    },

    /// Show the most recent set for one exercise
    Last {
        /// Exercise name
        name: String,
    },

    /// Remove a set by id
    Delete {
        /// Record id
        id: String,
    },

    /// Push unsynced sets to the server
    Sync {
        /// Server base URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        server: String,
    },

    /// Run the remote authority server
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "0.0.0.0:3000")]
        bind: String,

        /// Maximum entries accepted per sync batch
        #[arg(long, default_value = "1000")]
        max_batch: usize,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Log {
            name,
            weight,
            sets,
            reps,
            unit,
            notes,
        } => {
            commands::log::run(&cli.data, &name, weight, sets, reps, &unit, notes)?;
        }
        Commands::History { name, limit } => {
            commands::history::run(&cli.data, name.as_deref(), limit)?;
        }
        Commands::Names => {
            commands::names::run(&cli.data)?;
        }
        Commands::Progress { name } => {
            commands::progress::run(&cli.data, &name)?;
        }
        Commands::Last { name } => {
            commands::last::run(&cli.data, &name)?;
        }
        Commands::Delete { id } => {
            commands::delete::run(&cli.data, &id)?;
        }
        Commands::Sync { server } => {
            commands::sync::run(&cli.data, &server)?;
        }
        Commands::Serve { bind, max_batch } => {
            commands::serve::run(&cli.data, &bind, max_batch)?;
        }
        Commands::Version => {
            println!("Liftlog CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
