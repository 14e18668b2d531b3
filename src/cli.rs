use clap::{Parser, Subcommand};
use segcat::SafeMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "segcat")]
#[command(author, version, about = "Virtual concatenation of media segments")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the segment table a concat script resolves to
    Inspect {
        /// Script to inspect
        #[arg(required = true)]
        script: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Safe mode override: auto, enabled or disabled
        #[arg(long)]
        safe: Option<SafeMode>,
    },

    /// Check whether a file is auto-detected as a concat script
    Probe {
        /// File to probe
        #[arg(required = true)]
        file: PathBuf,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
