//! Catalog file discovery and parsing.
//!
//! The catalog file is a JSON array of `{"code": "...", "display": "..."}`
//! objects. Candidate locations are tried in order and the first file that
//! exists and parses wins; otherwise the embedded fallback is used.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::encoding::decode_text;
use crate::{Catalog, CatalogEntry, CatalogError};

/// Default catalog file name.
pub const CATALOG_FILE_NAME: &str = "kdl_embedded.json";

/// Candidate catalog paths in lookup order: next to the running executable,
/// the current working directory, then `source_dir`.
pub fn candidate_paths(file_name: &str, source_dir: &Path) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(3);

    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join(file_name));
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(file_name));
    }
    candidates.push(source_dir.join(file_name));

    candidates
}

/// Load the first usable catalog among `candidates`, or the fallback list.
///
/// Missing or invalid files are never an error for the caller.
pub fn load_catalog(candidates: &[PathBuf]) -> Catalog {
    for path in candidates {
        if !path.is_file() {
            debug!(path = %path.display(), "Catalog candidate not found");
            continue;
        }
        match load_from_path(path) {
            Ok(catalog) => {
                info!(path = %path.display(), entries = catalog.len(), "Loaded KDL catalog");
                return catalog;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unusable catalog file");
            }
        }
    }

    info!("No catalog file found, using built-in KDL list");
    Catalog::fallback()
}

/// Read and parse a single catalog file.
pub fn load_from_path(path: &Path) -> Result<Catalog, CatalogError> {
    let raw = std::fs::read(path)?;
    parse_catalog(&decode_text(&raw))
}

fn parse_catalog(text: &str) -> Result<Catalog, CatalogError> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(text)?;
    let catalog = Catalog::from_entries(entries);
    if catalog.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(catalog)
}
