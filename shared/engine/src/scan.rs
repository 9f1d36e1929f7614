//! CAS number matching and check-digit validation.
//!
//! Matching is purely lexical over the literal text; validation is a total
//! function over the candidate alphabet.

use regex::Regex;

use chemextract_models::ExtractionSummary;

use crate::dedup::dedup_ordered;

/// A candidate CAS number located in source text.
///
/// The offset establishes ordering between candidates; it is not retained
/// in output records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CasMatch<'t> {
    pub text: &'t str,
    pub offset: usize,
}

/// Scans raw document text for CAS-shaped tokens.
pub struct CasScanner {
    pattern: Regex,
}

impl CasScanner {
    pub fn new() -> Self {
        // 2-7 leading digits not starting with 0, 2 digits, 1 check digit,
        // bounded so the token cannot overlap adjacent alphanumerics.
        let pattern = Regex::new(r"\b[1-9]\d{1,6}-\d{2}-\d\b").unwrap();
        Self { pattern }
    }

    /// Lazy, restartable sequence of candidates in text order.
    pub fn matches<'t>(&'t self, text: &'t str) -> impl Iterator<Item = CasMatch<'t>> + 't {
        self.pattern.find_iter(text).map(|m| CasMatch {
            text: m.as_str(),
            offset: m.start(),
        })
    }

    /// Match, validate, and deduplicate one document's text.
    pub fn scan(&self, text: &str) -> ExtractionSummary {
        dedup_ordered(
            self.matches(text)
                .map(|m| (m.text.to_string(), verify_check_digit(m.text))),
        )
    }
}

impl Default for CasScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Verifies the CAS Registry check digit.
///
/// Hyphens are stripped; the last digit is the declared check digit; the
/// remaining digits, least significant first, are weighted 1, 2, 3, ... and
/// summed. Malformed candidates (non-numeric content, empty digit sequence)
/// are invalid rather than an error.
pub fn verify_check_digit(candidate: &str) -> bool {
    let digits: Option<Vec<u32>> = candidate
        .chars()
        .filter(|c| *c != '-')
        .map(|c| c.to_digit(10))
        .collect();

    let digits = match digits {
        Some(digits) if !digits.is_empty() => digits,
        _ => return false,
    };

    let (check_digit, rest) = match digits.split_last() {
        Some(split) => split,
        None => return false,
    };

    let sum: u32 = rest
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &digit)| digit * (i as u32 + 1))
        .sum();

    sum % 10 == *check_digit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_check_digits() {
        // Water and formaldehyde are registry fixtures; the third is an
        // arbitrary non-matching checksum.
        assert!(verify_check_digit("7732-18-5"));
        assert!(verify_check_digit("50-00-0"));
        assert!(!verify_check_digit("123-45-6"));
    }

    #[test]
    fn test_validation_is_total() {
        assert!(!verify_check_digit(""));
        assert!(!verify_check_digit("-"));
        assert!(!verify_check_digit("abc"));
        assert!(!verify_check_digit("12a4-56-7"));
        assert!(!verify_check_digit("--"));
    }

    #[test]
    fn test_matches_in_text_order() {
        let scanner = CasScanner::new();
        let text = "contains water (7732-18-5) and formaldehyde (50-00-0)";

        let matches: Vec<&str> = scanner.matches(text).map(|m| m.text).collect();
        assert_eq!(matches, vec!["7732-18-5", "50-00-0"]);

        let offsets: Vec<usize> = scanner.matches(text).map(|m| m.offset).collect();
        assert!(offsets[0] < offsets[1]);
    }

    #[test]
    fn test_matcher_is_restartable() {
        let scanner = CasScanner::new();
        let text = "7732-18-5 then 50-00-0";

        let first: Vec<&str> = scanner.matches(text).map(|m| m.text).collect();
        let second: Vec<&str> = scanner.matches(text).map(|m| m.text).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_token_boundaries() {
        let scanner = CasScanner::new();

        // No partial overlap with adjacent alphanumerics.
        assert_eq!(scanner.matches("X7732-18-5").count(), 0);
        assert_eq!(scanner.matches("7732-18-5X").count(), 0);
        // Leading zero disqualifies the whole token, including suffixes.
        assert_eq!(scanner.matches("0123-45-6").count(), 0);
        // Punctuation and whitespace are valid boundaries.
        assert_eq!(scanner.matches("(7732-18-5),").count(), 1);
    }

    #[test]
    fn test_segment_widths() {
        let scanner = CasScanner::new();

        // 1 leading digit is too short, 8 is too long.
        assert_eq!(scanner.matches("1-23-4").count(), 0);
        assert_eq!(scanner.matches("12345678-90-1").count(), 0);
        assert_eq!(scanner.matches("12-34-5").count(), 1);
        assert_eq!(scanner.matches("1234567-89-0").count(), 1);
    }

    #[test]
    fn test_scan_separates_valid_and_invalid() {
        let scanner = CasScanner::new();
        let summary = scanner.scan("7732-18-5, 123-45-6, 50-00-0");

        assert_eq!(summary.valid, vec!["7732-18-5", "50-00-0"]);
        assert_eq!(summary.invalid, vec!["123-45-6"]);
        assert_eq!(summary.all_ordered.len(), 3);
    }
}
