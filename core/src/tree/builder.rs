use super::node::{Patient, Series, Study, Tree};
use crate::error::Result;
use crate::extraction::{extract_image, extract_patient, extract_series, extract_study};
use crate::types::ScanConfig;
use dicom_object::{open_file, InMemDicomObject};
use log::{debug, info, warn};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

impl Tree {
    /// Reads one DICOM file and files it into the tree
    pub fn read_file(&mut self, path: &Path, config: &ScanConfig) -> Result<()> {
        let dcm = open_file(path)?;
        self.add_dicom(path.to_path_buf(), &dcm, config);
        Ok(())
    }

    /// Files an already-opened DICOM object into the tree
    ///
    /// The patient, study and series are looked up by their identifying
    /// attributes and created at the end of their parent's list when not
    /// found, so discovery order is preserved.
    pub fn add_dicom(&mut self, path: PathBuf, dcm: &InMemDicomObject, config: &ScanConfig) {
        let image = extract_image(path, dcm, config.read_csa);

        let patient = find_or_insert(&mut self.patients, extract_patient(dcm), same_patient);
        let study = find_or_insert(&mut patient.studies, extract_study(dcm), same_study);
        let series = find_or_insert(&mut study.series, extract_series(dcm), same_series);

        debug!(
            "{} -> series {} ({})",
            image.filename.display(),
            series.number,
            series.name
        );
        series.images.push(image);
    }

    /// Builds a tree from every DICOM file found under `directory`
    ///
    /// Files that cannot be read are skipped with a warning.
    pub fn scan_directory(directory: &Path, config: &ScanConfig) -> Result<Tree> {
        let files = collect_dicom_files(directory, config.recursive)?;
        info!("Found {} DICOM files", files.len());

        let mut tree = Tree::new();
        for path in files {
            if let Err(e) = tree.read_file(&path, config) {
                warn!("Skipping {}: {}", path.display(), e);
            }
        }

        if config.sort_images {
            tree.sort_images();
        }
        Ok(tree)
    }
}

fn find_or_insert<T, F>(nodes: &mut Vec<T>, candidate: T, same: F) -> &mut T
where
    F: Fn(&T, &T) -> bool,
{
    let index = match nodes.iter().position(|node| same(node, &candidate)) {
        Some(index) => index,
        None => {
            nodes.push(candidate);
            nodes.len() - 1
        }
    };
    &mut nodes[index]
}

fn same_patient(a: &Patient, b: &Patient) -> bool {
    a.name == b.name && a.id == b.id && a.dob == b.dob
}

fn same_study(a: &Study, b: &Study) -> bool {
    a.name == b.name && a.id == b.id && a.date == b.date && a.time == b.time
}

fn same_series(a: &Series, b: &Series) -> bool {
    a.name == b.name && a.number == b.number && a.modality == b.modality
}

/// Collects DICOM files in a directory
///
/// Accepts `.dcm` / `.dicom` files, and extension-less files that carry
/// the DICOM preamble magic.
pub fn collect_dicom_files(directory: &Path, recursive: bool) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(directory)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    let mut files = Vec::new();
    for path in entries {
        if path.is_dir() {
            if recursive {
                files.extend(collect_dicom_files(&path, recursive)?);
            }
        } else if path.is_file() {
            if let Some(ext) = path.extension() {
                // Accept .dcm and .dicom extensions
                if ext.eq_ignore_ascii_case("dcm") || ext.eq_ignore_ascii_case("dicom") {
                    files.push(path);
                }
            } else if is_dicom_file(&path) {
                debug!("Found headerless DICOM file: {}", path.display());
                files.push(path);
            }
        }
    }

    Ok(files)
}

/// Checks for the 128-byte preamble followed by the `DICM` magic
pub fn is_dicom_file(path: &Path) -> bool {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    let mut buffer = [0u8; 132];
    match file.read_exact(&mut buffer) {
        Ok(()) => &buffer[128..132] == b"DICM",
        Err(_) => false,
    }
}
