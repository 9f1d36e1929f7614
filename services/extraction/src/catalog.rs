//! Category catalog loader.
//!
//! The database file is a JSON object mapping category name to a list of
//! CAS numbers. The declared category order is fixed here, not by JSON key
//! order, so classification rows always render the same columns.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chemextract_models::{CategoryCatalog, CategoryTable};

/// Declared category order for the regulatory lists.
pub const DECLARED_CATEGORIES: [&str; 8] = [
    "conditional",
    "special-control-1",
    "special-control-2",
    "prevention-plan",
    "explosive-precursor",
    "ozone-depleting",
    "banned",
    "schedule-1",
];

/// Load the catalog snapshot from disk.
///
/// A missing or unreadable file degrades to an all-empty catalog; startup
/// is never blocked on the catalog.
pub fn load_catalog(path: impl AsRef<Path>) -> CategoryCatalog {
    let path = path.as_ref();

    let raw: HashMap<String, Vec<String>> = match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(parsed) => parsed,
            Err(error) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %error,
                    "category database is not valid JSON, starting with empty tables"
                );
                HashMap::new()
            }
        },
        Err(error) => {
            tracing::warn!(
                path = %path.display(),
                error = %error,
                "category database unavailable, starting with empty tables"
            );
            HashMap::new()
        }
    };

    let catalog = catalog_from_raw(raw);
    tracing::info!(
        categories = catalog.len(),
        members = catalog.member_count(),
        "category catalog loaded"
    );
    catalog
}

/// Build the ordered snapshot from the raw name -> members mapping.
///
/// A declared category missing from the mapping becomes an empty table;
/// undeclared keys are ignored.
pub fn catalog_from_raw(mut raw: HashMap<String, Vec<String>>) -> CategoryCatalog {
    let tables = DECLARED_CATEGORIES
        .iter()
        .map(|&name| match raw.remove(name) {
            Some(members) => {
                CategoryTable::new(name, members.into_iter().collect::<HashSet<String>>())
            }
            None => {
                tracing::warn!(category = name, "category table missing, treating as empty");
                CategoryTable::empty(name)
            }
        })
        .collect();

    for unknown in raw.keys() {
        tracing::warn!(category = %unknown, "undeclared category in database, ignored");
    }

    CategoryCatalog::new(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_order_is_fixed() {
        let mut raw = HashMap::new();
        raw.insert("banned".to_string(), vec!["50-00-0".to_string()]);
        raw.insert("conditional".to_string(), vec!["7732-18-5".to_string()]);

        let catalog = catalog_from_raw(raw);
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, DECLARED_CATEGORIES.to_vec());
    }

    #[test]
    fn test_missing_tables_are_empty_not_errors() {
        let catalog = catalog_from_raw(HashMap::new());
        assert_eq!(catalog.len(), DECLARED_CATEGORIES.len());
        assert_eq!(catalog.member_count(), 0);
    }

    #[test]
    fn test_undeclared_categories_are_ignored() {
        let mut raw = HashMap::new();
        raw.insert("not-a-real-list".to_string(), vec!["50-00-0".to_string()]);

        let catalog = catalog_from_raw(raw);
        assert!(catalog.get("not-a-real-list").is_none());
        assert_eq!(catalog.member_count(), 0);
    }

    #[test]
    fn test_load_catalog_survives_missing_file() {
        let catalog = load_catalog("definitely/not/a/real/path.json");
        assert_eq!(catalog.len(), DECLARED_CATEGORIES.len());
        assert_eq!(catalog.member_count(), 0);
    }
}
