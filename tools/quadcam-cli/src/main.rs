//! Quadcam CLI for batch compositing of multi-camera dashcam footage.
//!
//! Usage:
//!   quadcam process <SOURCE> <DEST> [OPTIONS]   Process every session under a root
//!   quadcam scan <SOURCE>                       List sessions and marker state
//!   quadcam check                               Check encoder availability

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "quadcam",
    about = "Composite and concatenate multi-camera dashcam recordings",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every session under a source root
    Process {
        /// Directory containing one subfolder per recording session
        source: PathBuf,

        /// Directory receiving final outputs, the staging folder, and the run log
        dest: PathBuf,

        /// Layout to render; repeat for several (2x2, frontbig, backbig, leftbig, rightbig)
        #[arg(short, long = "layout", default_value = "2x2")]
        layouts: Vec<String>,

        /// Number of sessions processed concurrently (defaults to the configured value)
        #[arg(short, long)]
        jobs: Option<usize>,
    },

    /// List sessions, timestamp groups, and marker state without encoding
    Scan {
        /// Directory containing one subfolder per recording session
        source: PathBuf,

        /// Layouts whose marker state to report (default: all)
        #[arg(short, long = "layout")]
        layouts: Vec<String>,
    },

    /// Check encoder availability and configured defaults
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = quadcam_common::config::AppConfig::load();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    quadcam_common::logging::init_logging(&quadcam_common::config::LoggingConfig {
        level: log_level,
        json: config.logging.json,
    });

    match cli.command {
        Commands::Process {
            source,
            dest,
            layouts,
            jobs,
        } => commands::process::run(config, source, dest, layouts, jobs).await,
        Commands::Scan { source, layouts } => commands::scan::run(source, layouts),
        Commands::Check => commands::check::run(config),
    }
}
