//! First-occurrence-ordered deduplication of the raw match stream.

use std::collections::HashSet;

use chemextract_models::{CasOccurrence, ExtractionSummary};

/// Reduces one document's ordered (candidate, validity) stream to distinct
/// lists without disturbing first-occurrence order.
///
/// The key is the exact candidate string; two lexically different strings
/// for the same substance stay distinct.
pub fn dedup_ordered<I>(occurrences: I) -> ExtractionSummary
where
    I: IntoIterator<Item = (String, bool)>,
{
    let mut summary = ExtractionSummary::default();
    let mut seen_valid: HashSet<String> = HashSet::new();
    let mut seen_invalid: HashSet<String> = HashSet::new();
    let mut seen_any: HashSet<String> = HashSet::new();

    for (cas_number, is_valid) in occurrences {
        if seen_any.insert(cas_number.clone()) {
            summary.all_ordered.push(CasOccurrence {
                cas_number: cas_number.clone(),
                is_valid,
            });
        }

        if is_valid {
            if seen_valid.insert(cas_number.clone()) {
                summary.valid.push(cas_number);
            }
        } else if seen_invalid.insert(cas_number.clone()) {
            summary.invalid.push(cas_number);
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occurrences(items: &[(&str, bool)]) -> Vec<(String, bool)> {
        items.iter().map(|(s, v)| (s.to_string(), *v)).collect()
    }

    #[test]
    fn test_first_occurrence_determines_position() {
        // [A, B, A, C] -> [A, B, C] no matter how often A repeats.
        let summary = dedup_ordered(occurrences(&[
            ("7732-18-5", true),
            ("50-00-0", true),
            ("7732-18-5", true),
            ("64-17-5", true),
        ]));

        assert_eq!(summary.valid, vec!["7732-18-5", "50-00-0", "64-17-5"]);
        assert!(summary.invalid.is_empty());
    }

    #[test]
    fn test_valid_and_invalid_are_separated() {
        let summary = dedup_ordered(occurrences(&[
            ("123-45-6", false),
            ("7732-18-5", true),
            ("123-45-6", false),
        ]));

        assert_eq!(summary.valid, vec!["7732-18-5"]);
        assert_eq!(summary.invalid, vec!["123-45-6"]);
    }

    #[test]
    fn test_all_ordered_tags_validity_as_first_seen() {
        let summary = dedup_ordered(occurrences(&[
            ("123-45-6", false),
            ("7732-18-5", true),
        ]));

        let tags: Vec<(&str, bool)> = summary
            .all_ordered
            .iter()
            .map(|o| (o.cas_number.as_str(), o.is_valid))
            .collect();
        assert_eq!(tags, vec![("123-45-6", false), ("7732-18-5", true)]);
    }

    #[test]
    fn test_empty_stream() {
        let summary = dedup_ordered(Vec::new());
        assert!(summary.is_empty());
        assert!(summary.valid.is_empty());
        assert!(summary.invalid.is_empty());
    }
}
