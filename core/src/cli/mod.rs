pub mod report;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for csadump
#[derive(Parser, Debug)]
#[command(name = "csadump")]
#[command(about = "Decode the Siemens CSA headers of DICOM files")]
#[command(version)]
pub struct Cli {
    /// Paths to DICOM files
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Write raw item payloads exactly as decoded (text format only)
    #[arg(short, long)]
    pub echo: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}

/// Sets up env_logger at Debug level when verbose, Info otherwise
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
