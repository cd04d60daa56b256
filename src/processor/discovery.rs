//! File discovery for DOE-2 report inputs
//!
//! Inputs may name report files directly, directories to search recursively
//! for `.SIM` files, or glob patterns.

use crate::constants::SIM_FILE_EXTENSION;
use crate::error::{Result, SimError};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File discovery over a set of user-supplied inputs
#[derive(Debug)]
pub struct FileDiscovery {
    inputs: Vec<String>,
}

impl FileDiscovery {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
        }
    }

    /// Resolve every input to report files, sorted and de-duplicated
    pub fn discover_report_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = BTreeSet::new();

        for input in &self.inputs {
            if is_glob_pattern(input) {
                files.extend(expand_glob(input)?);
                continue;
            }

            let path = Path::new(input);
            if path.is_dir() {
                files.extend(discover_directory(path));
            } else if path.is_file() {
                // Explicitly named files are taken whatever their extension
                files.insert(path.to_path_buf());
            } else {
                return Err(SimError::InputNotFound {
                    path: path.to_path_buf(),
                });
            }
        }

        if files.is_empty() {
            return Err(SimError::NoInputFiles {
                inputs: self.inputs.join(", "),
            });
        }

        debug!("Discovered {} report files", files.len());
        Ok(files.into_iter().collect())
    }
}

/// Recursively collect `.SIM` files under `dir`
fn discover_directory(dir: &Path) -> Vec<PathBuf> {
    debug!("Searching for report files in: {}", dir.display());

    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_sim_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|e| {
        SimError::configuration(format!("Invalid glob pattern '{}': {}", pattern, e))
    })?;

    Ok(paths
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Skipping unreadable glob match: {}", e);
                None
            }
        })
        .filter(|path| path.is_file())
        .collect())
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// Check if a path has the DOE-2 output extension
pub fn is_sim_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(SIM_FILE_EXTENSION))
}
