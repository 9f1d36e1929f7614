//! Category membership classification.
//!
//! The catalog snapshot is fixed at construction time; classification is a
//! pure function of (identifier, snapshot), so concurrent calls need no
//! locking.

use std::sync::Arc;

use chemextract_models::{CategoryCatalog, CategoryMembership};

/// Classifies valid CAS numbers against an immutable catalog snapshot.
#[derive(Clone)]
pub struct Classifier {
    catalog: Arc<CategoryCatalog>,
}

impl Classifier {
    pub fn new(catalog: Arc<CategoryCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    /// Exact-string membership against every table, in declared category
    /// order. An empty table simply reports no members.
    pub fn classify(&self, cas_number: &str) -> Vec<CategoryMembership> {
        self.catalog
            .tables()
            .iter()
            .map(|table| CategoryMembership {
                category: table.name.clone(),
                member: table.contains(cas_number),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chemextract_models::CategoryTable;

    fn classifier(tables: Vec<CategoryTable>) -> Classifier {
        Classifier::new(Arc::new(CategoryCatalog::new(tables)))
    }

    #[test]
    fn test_membership_flags() {
        let classifier = classifier(vec![
            CategoryTable::new("banned", ["50-00-0".to_string()].into_iter().collect()),
            CategoryTable::new("ozone-depleting", ["75-69-4".to_string()].into_iter().collect()),
        ]);

        let memberships = classifier.classify("50-00-0");
        assert_eq!(memberships.len(), 2);
        assert!(memberships[0].member);
        assert!(!memberships[1].member);
    }

    #[test]
    fn test_declared_order_is_preserved() {
        let classifier = classifier(vec![
            CategoryTable::empty("schedule-1"),
            CategoryTable::empty("banned"),
            CategoryTable::empty("conditional"),
        ]);

        let categories: Vec<String> = classifier
            .classify("7732-18-5")
            .into_iter()
            .map(|m| m.category)
            .collect();
        assert_eq!(categories, vec!["schedule-1", "banned", "conditional"]);
    }

    #[test]
    fn test_missing_table_reports_no_members() {
        let classifier = classifier(vec![CategoryTable::empty("banned")]);

        let memberships = classifier.classify("7732-18-5");
        assert_eq!(memberships.len(), 1);
        assert!(!memberships[0].member);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let classifier = classifier(vec![CategoryTable::new(
            "banned",
            ["50-00-0".to_string()].into_iter().collect(),
        )]);

        assert_eq!(classifier.classify("50-00-0"), classifier.classify("50-00-0"));
    }
}
