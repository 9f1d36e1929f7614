//! Classification models.
//!
//! Category tables are loaded once at startup and shared read-only across
//! all classification calls; no table is ever mutated by a request.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A named regulatory list of CAS numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTable {
    pub name: String,
    pub members: HashSet<String>,
}

impl CategoryTable {
    pub fn new(name: impl Into<String>, members: HashSet<String>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    /// A table that failed to load is treated as "no members", not an error.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: HashSet::new(),
        }
    }

    pub fn contains(&self, cas_number: &str) -> bool {
        self.members.contains(cas_number)
    }
}

/// The immutable, ordered snapshot of all category tables.
///
/// Order of `tables` is the declared category order and fixes the column
/// order of every classification row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCatalog {
    tables: Vec<CategoryTable>,
}

impl CategoryCatalog {
    pub fn new(tables: Vec<CategoryTable>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &[CategoryTable] {
        &self.tables
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&CategoryTable> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.tables.iter().map(|t| t.members.len()).sum()
    }
}

/// Membership verdict for one identifier in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMembership {
    pub category: String,
    pub member: bool,
}

/// Fully-labeled intermediate row: every row carries its product name and
/// the index of the document it came from. Kept available for renderers
/// that do not want the legacy first-row-only labeling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledRow {
    pub document_index: usize,
    pub product_name: String,
    pub cas_number: String,
    pub memberships: Vec<CategoryMembership>,
}

/// The external output unit: one row per distinct valid identifier per
/// document. The product name is populated only on the first row emitted
/// for a document and empty on subsequent rows of the same document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ClassificationRow {
    pub product_name: String,
    #[validate(custom = "validate_cas_number")]
    pub cas_number: String,
    pub memberships: Vec<CategoryMembership>,
}

impl ClassificationRow {
    /// Membership flag for a category, false when the category is unknown.
    pub fn flag(&self, category: &str) -> bool {
        self.memberships
            .iter()
            .find(|m| m.category == category)
            .map(|m| m.member)
            .unwrap_or(false)
    }
}

/// Validates CAS number segment shape: 2-7 digits, 2 digits, 1 digit.
pub fn validate_cas_format(cas_number: &str) -> bool {
    let parts: Vec<&str> = cas_number.split('-').collect();
    if parts.len() != 3 {
        return false;
    }

    if parts[0].len() < 2 || parts[0].len() > 7 || parts[1].len() != 2 || parts[2].len() != 1 {
        return false;
    }

    parts
        .iter()
        .all(|part| part.chars().all(|c| c.is_ascii_digit()))
}

fn validate_cas_number(cas_number: &str) -> Result<(), ValidationError> {
    if !validate_cas_format(cas_number) {
        return Err(ValidationError::new("invalid_cas_format"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table(name: &str, members: &[&str]) -> CategoryTable {
        CategoryTable::new(name, members.iter().map(|m| m.to_string()).collect())
    }

    #[test]
    fn test_catalog_preserves_declared_order() {
        let catalog = CategoryCatalog::new(vec![
            table("banned", &["50-00-0"]),
            table("ozone-depleting", &[]),
            table("schedule-1", &["7732-18-5"]),
        ]);

        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["banned", "ozone-depleting", "schedule-1"]);
        assert_eq!(catalog.member_count(), 2);
    }

    #[test]
    fn test_cas_format_validation() {
        assert!(validate_cas_format("7732-18-5"));
        assert!(validate_cas_format("50-00-0"));
        assert!(!validate_cas_format("1-00-0"));
        assert!(!validate_cas_format("7732-18"));
        assert!(!validate_cas_format("7732-1a-5"));
    }

    #[test]
    fn test_classification_row_validation() {
        let row = ClassificationRow {
            product_name: "Acetone SDS".to_string(),
            cas_number: "67-64-1".to_string(),
            memberships: vec![],
        };
        assert!(row.validate().is_ok());

        let bad = ClassificationRow {
            product_name: String::new(),
            cas_number: "not-a-cas".to_string(),
            memberships: vec![],
        };
        assert!(bad.validate().is_err());
    }

    proptest! {
        /// Any well-formed three-segment numeric string passes the format
        /// check, independent of its check digit.
        #[test]
        fn prop_cas_format_accepts_well_formed_segments(
            p1 in "[0-9]{2,7}",
            p2 in "[0-9]{2}",
            p3 in "[0-9]{1}",
        ) {
            let cas = format!("{}-{}-{}", p1, p2, p3);
            prop_assert!(validate_cas_format(&cas));
        }
    }

    #[test]
    fn test_unknown_category_flag_is_unset() {
        let row = ClassificationRow {
            product_name: String::new(),
            cas_number: "7732-18-5".to_string(),
            memberships: vec![CategoryMembership {
                category: "banned".to_string(),
                member: true,
            }],
        };
        assert!(row.flag("banned"));
        assert!(!row.flag("never-loaded"));
    }
}
