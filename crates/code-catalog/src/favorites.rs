//! Favorites-first ordering of the catalog for the selection dropdown.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{Catalog, SEPARATOR};

/// Maximum number of favorites shown above the separator.
pub const FAVORITES_LIMIT: usize = 5;

/// Read access to per-code usage counts.
pub trait UsageCounts {
    /// Number of recorded uses of `code` (0 if never used).
    fn count(&self, code: &str) -> u64;
}

impl UsageCounts for HashMap<String, u64> {
    fn count(&self, code: &str) -> u64 {
        self.get(code).copied().unwrap_or(0)
    }
}

impl UsageCounts for BTreeMap<String, u64> {
    fn count(&self, code: &str) -> u64 {
        self.get(code).copied().unwrap_or(0)
    }
}

/// Codes of the favorites, most used first.
///
/// Sorted by count descending then code ascending; the top
/// [`FAVORITES_LIMIT`] are taken and codes that were never used dropped.
pub fn favorite_codes<'a>(catalog: &'a Catalog, usage: &impl UsageCounts) -> Vec<&'a str> {
    let mut counted: Vec<(&str, u64)> = catalog
        .entries()
        .iter()
        .map(|e| (e.code.as_str(), usage.count(&e.code)))
        .collect();
    counted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    counted
        .into_iter()
        .take(FAVORITES_LIMIT)
        .filter(|&(_, count)| count > 0)
        .map(|(code, _)| code)
        .collect()
}

/// Build the dropdown list: favorites, [`SEPARATOR`], then every other entry
/// alphabetically by display text.
///
/// The separator is only present when there is at least one favorite.
pub fn rank(catalog: &Catalog, usage: &impl UsageCounts) -> Vec<String> {
    let favorites: Vec<&str> = favorite_codes(catalog, usage)
        .into_iter()
        .filter_map(|code| catalog.get(code))
        .map(|e| e.display.as_str())
        .collect();
    let favorite_set: HashSet<&str> = favorites.iter().copied().collect();

    let mut remainder: Vec<&str> = catalog
        .entries()
        .iter()
        .map(|e| e.display.as_str())
        .filter(|display| !favorite_set.contains(display))
        .collect();
    remainder.sort_unstable();

    let mut values = Vec::with_capacity(catalog.len() + 1);
    if !favorites.is_empty() {
        values.extend(favorites.iter().map(|d| d.to_string()));
        values.push(SEPARATOR.to_string());
    }
    values.extend(remainder.iter().map(|d| d.to_string()));
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CatalogEntry;

    fn usage(pairs: &[(&str, u64)]) -> HashMap<String, u64> {
        pairs.iter().map(|&(c, n)| (c.to_string(), n)).collect()
    }

    fn alphabetical(catalog: &Catalog) -> Vec<String> {
        let mut all: Vec<String> = catalog.entries().iter().map(|e| e.display.clone()).collect();
        all.sort();
        all
    }

    #[test]
    fn no_usage_is_plain_alphabetical() {
        let catalog = Catalog::fallback();
        let ranked = rank(&catalog, &HashMap::<String, u64>::new());
        assert_eq!(ranked, alphabetical(&catalog));
        assert!(!ranked.iter().any(|v| v == SEPARATOR));
    }

    #[test]
    fn fallback_scenario_with_two_favorites() {
        let catalog = Catalog::fallback();
        let ranked = rank(&catalog, &usage(&[("C34", 3), ("A01", 1)]));

        assert_eq!(ranked.len(), 11);
        assert_eq!(ranked[0], "Bösartige Neubildung: Bronchien und Lunge");
        assert_eq!(
            ranked[1],
            "Cholera durch Vibrio cholerae 01, Biovar cholerae"
        );
        assert_eq!(ranked[2], SEPARATOR);
        assert_eq!(
            &ranked[3..],
            &[
                "Akute Appendizitis",
                "Asthma bronchiale",
                "Essentielle (primäre) Hypertonie",
                "HIV-Krankheit, durch HIV-1-Virus",
                "Nicht insulinabhängiger Diabetes mellitus",
                "Rückenschmerzen",
                "Salmonellenenteritis",
                "Sonstige Krankheiten der Harnorgane",
            ]
        );
    }

    #[test]
    fn at_most_five_favorites_with_code_tie_break() {
        let catalog = Catalog::fallback();
        let counts = usage(&[
            ("N39", 2),
            ("M54", 2),
            ("K35", 2),
            ("J45", 2),
            ("I10", 2),
            ("E11", 2),
            ("A01", 9),
        ]);
        assert_eq!(
            favorite_codes(&catalog, &counts),
            vec!["A01", "E11", "I10", "J45", "K35"]
        );

        let ranked = rank(&catalog, &counts);
        assert_eq!(ranked[5], SEPARATOR);
        // M54 and N39 are used but fall below the top five.
        assert!(ranked[6..].contains(&"Rückenschmerzen".to_string()));
    }

    #[test]
    fn unknown_codes_and_zero_counts_are_ignored() {
        let catalog = Catalog::fallback();
        let ranked = rank(&catalog, &usage(&[("ZZZ", 100), ("A02", 0)]));
        assert_eq!(ranked, alphabetical(&catalog));
    }

    #[test]
    fn separator_and_remainder_invariants() {
        let catalog = Catalog::from_entries([
            CatalogEntry::new("B", "beta"),
            CatalogEntry::new("A", "alpha"),
            CatalogEntry::new("C", "gamma"),
            CatalogEntry::new("D", "Delta"),
        ]);
        let cases = [
            usage(&[]),
            usage(&[("A", 1)]),
            usage(&[("C", 4), ("B", 4), ("D", 1)]),
            usage(&[("A", 1), ("B", 1), ("C", 1), ("D", 1)]),
        ];

        for counts in &cases {
            let ranked = rank(&catalog, counts);
            let favorites = favorite_codes(&catalog, counts);
            let seps = ranked.iter().filter(|v| *v == SEPARATOR).count();
            assert_eq!(seps, usize::from(!favorites.is_empty()));
            assert!(ranked.windows(2).all(|w| !(w[0] == SEPARATOR && w[1] == SEPARATOR)));

            let remainder = &ranked[ranked
                .iter()
                .position(|v| v == SEPARATOR)
                .map_or(0, |i| i + 1)..];
            assert!(remainder.windows(2).all(|w| w[0] <= w[1]));
            assert_eq!(ranked.len(), catalog.len() + seps);
            for code in favorites {
                let display = &catalog.get(code).expect("favorite in catalog").display;
                assert!(!remainder.contains(display));
            }
        }
    }

    #[test]
    fn btree_usage_counts() {
        let catalog = Catalog::fallback();
        let counts: BTreeMap<String, u64> = [("J45".to_string(), 1)].into_iter().collect();
        assert_eq!(rank(&catalog, &counts)[0], "Asthma bronchiale");
    }
}
