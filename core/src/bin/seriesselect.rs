use clap::{Parser, ValueEnum};
use csaselect_core::cli::setup_logging;
use csaselect_core::{select_cmdline, ScanConfig, Series, TextReport, Tree};
use log::{error, info};
use std::path::PathBuf;
use std::process;

/// CLI tool for picking DICOM series to import from a directory
#[derive(Parser, Debug)]
#[command(name = "seriesselect")]
#[command(about = "Interactively select DICOM series from a directory of files")]
#[command(version)]
struct Cli {
    /// Directory containing DICOM files
    #[arg(value_name = "DIRECTORY")]
    directory: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Descend into sub-directories
    #[arg(short, long)]
    recursive: bool,

    /// Skip decoding of Siemens CSA headers
    #[arg(long)]
    no_csa: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
    /// File paths only (one per line)
    Paths,
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    // Verify directory exists
    if !cli.directory.is_dir() {
        eprintln!("Error: {} is not a directory", cli.directory.display());
        process::exit(1);
    }

    info!("Processing directory: {}", cli.directory.display());

    let config = ScanConfig::default()
        .recursive(cli.recursive)
        .read_csa(!cli.no_csa);

    let tree = match Tree::scan_directory(&cli.directory, &config) {
        Ok(tree) => tree,
        Err(e) => {
            error!("Failed to read directory: {}", e);
            eprintln!("Error: Failed to read directory: {}", e);
            process::exit(1);
        }
    };

    info!(
        "Found {} patients, {} series",
        tree.len(),
        tree.series_count()
    );

    let selection = match select_cmdline(&tree) {
        Ok(selection) => selection,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if selection.is_empty() {
        info!("Selection aborted");
    }

    output_selection(&selection, cli.format);
}

fn output_selection(selection: &[&Series], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{}", TextReport::new(selection));
        }
        OutputFormat::Paths => {
            for series in selection {
                for image in &series.images {
                    println!("{}", image.filename.display());
                }
            }
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match serde_json::to_string_pretty(selection) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}
