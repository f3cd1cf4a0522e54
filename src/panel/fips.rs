//! County FIPS code normalisation and classification.
//!
//! Both functions work on strings only. Parsing a code as a number would drop
//! its leading zeros, so membership and suffix checks stay textual.

use std::collections::HashSet;

/// Width of a county FIPS code (2-digit state + 3-digit county).
pub const FIPS_WIDTH: usize = 5;

/// Suffix marking state and regional aggregates.
const AGGREGATE_SUFFIX: &str = "000";

/// Canonicalise a raw identifier cell.
///
/// Every non-digit character is stripped and the remainder is left-padded with
/// zeros to five characters. Returns `None` when no digits remain.
///
/// ```
/// use county_panel::panel::fips::normalize_fips;
///
/// assert_eq!(normalize_fips(Some("12,003")).as_deref(), Some("12003"));
/// assert_eq!(normalize_fips(Some("42")).as_deref(), Some("00042"));
/// assert_eq!(normalize_fips(Some("")), None);
/// ```
pub fn normalize_fips(value: Option<&str>) -> Option<String> {
    let digits: String = value?.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        Some(format!("{digits:0>width$}", width = FIPS_WIDTH))
    }
}

/// True when `code` names a genuine county rather than an aggregate.
///
/// The code must be exactly five ASCII digits, must not be blocklisted and must
/// not end in `000`.
pub fn is_real_county_fips(code: &str, aggregates: &HashSet<&str>) -> bool {
    if code.len() != FIPS_WIDTH || !code.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if aggregates.contains(code) {
        return false;
    }
    !code.ends_with(AGGREGATE_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CONFIG;

    fn is_county(code: &str) -> bool {
        is_real_county_fips(code, &DEFAULT_CONFIG.aggregate_set())
    }

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize_fips(Some("12,003")).as_deref(), Some("12003"));
        assert_eq!(normalize_fips(Some(" 01-001 ")).as_deref(), Some("01001"));
        assert_eq!(normalize_fips(Some("\"06037\"")).as_deref(), Some("06037"));
    }

    #[test]
    fn test_normalize_pads_short_codes() {
        assert_eq!(normalize_fips(Some("42")).as_deref(), Some("00042"));
        assert_eq!(normalize_fips(Some("1001")).as_deref(), Some("01001"));
    }

    #[test]
    fn test_normalize_missing() {
        assert_eq!(normalize_fips(None), None);
        assert_eq!(normalize_fips(Some("")), None);
        assert_eq!(normalize_fips(Some("(NA)")), None);
    }

    #[test]
    fn test_normalize_keeps_long_codes() {
        assert_eq!(normalize_fips(Some("123456")).as_deref(), Some("123456"));
        assert!(!is_county("123456"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["12,003", "42", "1001", "06037", "x9y", "99999"] {
            let once = normalize_fips(Some(raw));
            let twice = normalize_fips(once.as_deref());
            assert_eq!(once, twice, "normalising {raw:?} twice changed it");
        }
    }

    #[test]
    fn test_classifier_rules() {
        assert!(!is_county("00000"), "blocklisted");
        assert!(!is_county("00998"), "blocklisted");
        assert!(!is_county("00999"), "blocklisted");
        assert!(!is_county("99999"), "blocklisted");
        assert!(!is_county("12000"), "state aggregate");
        assert!(!is_county("51000"), "state aggregate");
        assert!(!is_county("1200"), "too short");
        assert!(!is_county("12a03"), "non-digit");
        assert!(is_county("12003"));
        assert!(is_county("01001"));
    }

    #[test]
    fn test_classifier_rejects_non_ascii_digits() {
        // Arabic-Indic digits are numeric but not ASCII.
        assert!(!is_county("١٢٠٠٣"));
    }
}
