use clap::Parser;
use csaselect_core::cli::{setup_logging, Cli, OutputFormat};
use csaselect_core::extraction::tags::{
    get_bytes_value, CSA_IMAGE_HEADER_INFO, CSA_SERIES_HEADER_INFO,
};
use csaselect_core::CsaParser;
use dicom::core::Tag;
use dicom::object::{open_file, InMemDicomObject};
use log::{error, info, warn};
use std::io;
use std::path::Path;
use std::process;

/// CSA blocks looked up in every file
const CSA_BLOCKS: [(&str, Tag); 2] = [
    ("image", CSA_IMAGE_HEADER_INFO),
    ("series", CSA_SERIES_HEADER_INFO),
];

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let mut failed = false;
    for path in &cli.files {
        let dcm = match open_file(path) {
            Ok(dcm) => dcm,
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                failed = true;
                continue;
            }
        };

        match cli.format {
            OutputFormat::Text => dump_text(path, &dcm, cli.echo),
            OutputFormat::Json => {
                #[cfg(feature = "json")]
                {
                    match dump_json(path, &dcm) {
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

    if failed {
        process::exit(1);
    }
}

fn dump_text(path: &Path, dcm: &InMemDicomObject, echo: bool) {
    println!("{}", path.display());

    for (label, tag) in CSA_BLOCKS {
        let block = match get_bytes_value(dcm, tag) {
            Some(block) => block,
            None => {
                info!("{}: no CSA {} header", path.display(), label);
                continue;
            }
        };

        println!("  CSA {} header ({} bytes)", label, block.len());
        if echo {
            let stdout = io::stdout();
            let mut parser = CsaParser::with_echo(&block, stdout.lock());
            let decoded = parser.by_ref().count();
            if decoded < parser.declared_count() as usize {
                warn!(
                    "{}: decoded {} of {} declared entries",
                    path.display(),
                    decoded,
                    parser.declared_count()
                );
            }
        } else {
            for entry in CsaParser::new(&block) {
                println!("    {}", entry);
            }
        }
    }
}

#[cfg(feature = "json")]
fn dump_json(path: &Path, dcm: &InMemDicomObject) -> Result<String, serde_json::Error> {
    use serde::Serialize;

    #[derive(Serialize)]
    struct FileJson {
        file_path: String,
        blocks: Vec<BlockJson>,
    }

    #[derive(Serialize)]
    struct BlockJson {
        header: &'static str,
        entries: Vec<EntryJson>,
    }

    #[derive(Serialize)]
    struct EntryJson {
        name: String,
        vr: String,
        vm: u32,
        items: Vec<String>,
    }

    let blocks = CSA_BLOCKS
        .iter()
        .filter_map(|&(label, tag)| {
            get_bytes_value(dcm, tag).map(|block| BlockJson {
                header: label,
                entries: CsaParser::new(&block)
                    .map(|entry| EntryJson {
                        items: entry
                            .items
                            .iter()
                            .map(|item| String::from_utf8_lossy(item.trimmed()).into_owned())
                            .collect(),
                        name: entry.name,
                        vr: entry.vr,
                        vm: entry.vm,
                    })
                    .collect(),
            })
        })
        .collect();

    serde_json::to_string_pretty(&FileJson {
        file_path: path.display().to_string(),
        blocks,
    })
}
