//! Diagnosis code catalog (KDL) with favorites ranking.
//!
//! Loads the list of selectable `(code, display)` entries from an optional
//! JSON file with an embedded fallback, indexes it by code and by display
//! text, and orders it for the selection dropdown by usage frequency.

pub mod defaults;
mod encoding;
pub mod favorites;
pub mod loader;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// Re-exports for convenience
pub use favorites::{FAVORITES_LIMIT, UsageCounts, favorite_codes, rank};
pub use loader::{CATALOG_FILE_NAME, candidate_paths, load_catalog, load_from_path};

/// Dropdown entry separating favorites from the remaining entries.
///
/// Never a valid selection; catalog entries with this display text are
/// rejected at load time.
pub const SEPARATOR: &str = "---";

/// Characters that structure the QR payload and therefore may not appear in
/// a code or a case number.
pub const FIELD_DELIMITERS: &[char] = &['{', '}', ',', ':'];

/// A single selectable diagnosis code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub code: String,
    pub display: String,
}

impl CatalogEntry {
    pub fn new(code: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display: display.into(),
        }
    }
}

/// Errors that can occur while reading a catalog source file.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog file contains no usable entries")]
    Empty,
}

/// Why a dropdown selection could not be resolved to a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("No KDL entry selected")]
    Empty,

    #[error("The separator is not a KDL entry")]
    Separator,

    #[error("Unknown KDL entry: {0}")]
    Unknown(String),
}

/// Immutable catalog with lookup indexes built once at load time.
///
/// Internal lookups go by `code`; the display index only exists to turn a
/// dropdown selection back into a code.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_code: HashMap<String, usize>,
    by_display: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, dropping entries that cannot be used safely.
    ///
    /// Rejected: blank code or display, display equal to [`SEPARATOR`], code
    /// containing a [`FIELD_DELIMITERS`] character, and any later duplicate of
    /// an already accepted code or display.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = Self {
            entries: Vec::new(),
            by_code: HashMap::new(),
            by_display: HashMap::new(),
        };

        for entry in entries {
            let entry = CatalogEntry::new(entry.code.trim(), entry.display.trim());
            if let Some(reason) = catalog.rejection_reason(&entry) {
                tracing::warn!(
                    code = %entry.code,
                    display = %entry.display,
                    reason,
                    "Skipping catalog entry"
                );
                continue;
            }
            let idx = catalog.entries.len();
            catalog.by_code.insert(entry.code.clone(), idx);
            catalog.by_display.insert(entry.display.clone(), idx);
            catalog.entries.push(entry);
        }

        catalog
    }

    /// The embedded ten-entry fallback list.
    pub fn fallback() -> Self {
        Self::from_entries(defaults::fallback_entries())
    }

    fn rejection_reason(&self, entry: &CatalogEntry) -> Option<&'static str> {
        if entry.code.is_empty() || entry.display.is_empty() {
            Some("blank code or display")
        } else if entry.display == SEPARATOR {
            Some("display collides with the dropdown separator")
        } else if entry.code.contains(FIELD_DELIMITERS) {
            Some("code contains a payload delimiter")
        } else if self.by_code.contains_key(&entry.code) {
            Some("duplicate code")
        } else if self.by_display.contains_key(&entry.display) {
            Some("duplicate display text")
        } else {
            None
        }
    }

    /// Entries in source order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by its code.
    pub fn get(&self, code: &str) -> Option<&CatalogEntry> {
        self.by_code.get(code).map(|&idx| &self.entries[idx])
    }

    /// Map a display text back to its code.
    pub fn code_for_display(&self, display: &str) -> Option<&str> {
        self.by_display
            .get(display)
            .map(|&idx| self.entries[idx].code.as_str())
    }

    /// Resolve a dropdown selection (display text) to its entry.
    pub fn resolve_selection(&self, selection: &str) -> Result<&CatalogEntry, SelectionError> {
        let selection = selection.trim();
        if selection.is_empty() {
            return Err(SelectionError::Empty);
        }
        if selection == SEPARATOR {
            return Err(SelectionError::Separator);
        }
        self.by_display
            .get(selection)
            .map(|&idx| &self.entries[idx])
            .ok_or_else(|| SelectionError::Unknown(selection.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_has_ten_entries() {
        let catalog = Catalog::fallback();
        assert_eq!(catalog.len(), 10);
        assert_eq!(
            catalog.get("C34").map(|e| e.display.as_str()),
            Some("Bösartige Neubildung: Bronchien und Lunge")
        );
    }

    #[test]
    fn separator_display_is_rejected() {
        let catalog = Catalog::from_entries([
            CatalogEntry::new("X01", SEPARATOR),
            CatalogEntry::new("X02", "Real entry"),
        ]);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("X01").is_none());
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let catalog = Catalog::from_entries([
            CatalogEntry::new("A01", "First"),
            CatalogEntry::new("A01", "Second"),
            CatalogEntry::new("B01", "First"),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.code_for_display("First"), Some("A01"));
        assert_eq!(catalog.code_for_display("Second"), None);
    }

    #[test]
    fn delimiter_in_code_is_rejected() {
        let catalog = Catalog::from_entries([
            CatalogEntry::new("A,01", "Comma"),
            CatalogEntry::new("A:01", "Colon"),
            CatalogEntry::new("{A01}", "Brace"),
            CatalogEntry::new("  ", "Blank"),
        ]);
        assert!(catalog.is_empty());
    }

    #[test]
    fn entries_are_trimmed() {
        let catalog = Catalog::from_entries([CatalogEntry::new(" J45 ", " Asthma bronchiale ")]);
        assert_eq!(catalog.code_for_display("Asthma bronchiale"), Some("J45"));
    }

    #[test]
    fn resolve_selection_errors() {
        let catalog = Catalog::fallback();
        assert_eq!(catalog.resolve_selection("  "), Err(SelectionError::Empty));
        assert_eq!(
            catalog.resolve_selection(SEPARATOR),
            Err(SelectionError::Separator)
        );
        assert_eq!(
            catalog.resolve_selection("Nope"),
            Err(SelectionError::Unknown("Nope".into()))
        );
        let entry = catalog
            .resolve_selection(" Asthma bronchiale ")
            .expect("selection should resolve");
        assert_eq!(entry.code, "J45");
    }
}
