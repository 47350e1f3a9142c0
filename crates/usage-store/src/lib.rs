//! Persistent per-code usage counters for KDL favorites.
//!
//! Counters live in a flat JSON object (`{"C34": 3, "A01": 1}`). The file is
//! read once when the store is opened and rewritten after every mutation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use code_catalog::UsageCounts;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Default counter file name inside the data directory.
pub const USAGE_FILE_NAME: &str = "kdl_usage.json";

/// Errors that can occur while persisting usage counters.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for usage store operations.
pub type Result<T> = std::result::Result<T, UsageError>;

/// Usage counter store, optionally backed by a JSON file.
#[derive(Debug, Clone, Default)]
pub struct UsageStore {
    path: Option<PathBuf>,
    counts: BTreeMap<String, u64>,
}

impl UsageStore {
    /// Open the counter file at `path`.
    ///
    /// A missing, unreadable or corrupt file yields an empty store; the file
    /// is (re)written on the next mutation.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let counts = match std::fs::read_to_string(&path) {
            Ok(text) => parse_counts(&text, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No usage file yet, starting empty");
                BTreeMap::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read usage file, starting empty");
                BTreeMap::new()
            }
        };

        info!(path = %path.display(), codes = counts.len(), "Usage counters loaded");
        Self {
            path: Some(path),
            counts,
        }
    }

    /// Create a store that is never written to disk (for testing).
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// All non-zero counters, ordered by code.
    pub fn counts(&self) -> &BTreeMap<String, u64> {
        &self.counts
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Record one use of `code` and persist immediately.
    ///
    /// The in-memory count is updated even when saving fails.
    pub fn increment(&mut self, code: &str) -> Result<u64> {
        let count = self.counts.entry(code.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        let count = *count;
        debug!(code, count, "Usage counter incremented");
        self.save()?;
        Ok(count)
    }

    /// Clear every counter and persist the empty mapping.
    pub fn reset(&mut self) -> Result<()> {
        self.counts.clear();
        info!("Usage counters reset");
        self.save()
    }

    /// Write the current counters to the backing file.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| UsageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(&self.counts)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|source| UsageError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, path).map_err(|source| UsageError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(())
    }
}

impl UsageCounts for UsageStore {
    fn count(&self, code: &str) -> u64 {
        self.counts.get(code).copied().unwrap_or(0)
    }
}

fn parse_counts(text: &str, path: &Path) -> BTreeMap<String, u64> {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Corrupt usage file, starting empty");
            return BTreeMap::new();
        }
    };

    let Value::Object(map) = value else {
        warn!(path = %path.display(), "Usage file is not a JSON object, starting empty");
        return BTreeMap::new();
    };

    map.into_iter()
        .filter_map(|(code, v)| match v.as_u64() {
            Some(n) => Some((code, n)),
            None => {
                warn!(code = %code, value = %v, "Ignoring non-integer usage count");
                None
            }
        })
        .collect()
}
