//! Embedded fallback catalog used when no catalog file is found.

use crate::CatalogEntry;

/// `(code, display)` pairs of the built-in catalog.
pub const FALLBACK_ENTRIES: &[(&str, &str)] = &[
    ("A01", "Cholera durch Vibrio cholerae 01, Biovar cholerae"),
    ("A02", "Salmonellenenteritis"),
    ("B20", "HIV-Krankheit, durch HIV-1-Virus"),
    ("C34", "Bösartige Neubildung: Bronchien und Lunge"),
    ("E11", "Nicht insulinabhängiger Diabetes mellitus"),
    ("I10", "Essentielle (primäre) Hypertonie"),
    ("J45", "Asthma bronchiale"),
    ("K35", "Akute Appendizitis"),
    ("M54", "Rückenschmerzen"),
    ("N39", "Sonstige Krankheiten der Harnorgane"),
];

pub fn fallback_entries() -> Vec<CatalogEntry> {
    FALLBACK_ENTRIES
        .iter()
        .map(|&(code, display)| CatalogEntry::new(code, display))
        .collect()
}
