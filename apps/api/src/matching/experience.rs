//! Estimates total years of experience from free text.
//!
//! Heuristic, not a computation: every pattern hit yields a candidate value and
//! the result is the sum of the *distinct* values, capped at 50. Figures too
//! large for an integer saturate rather than being skipped. Repeating the
//! same figure ("5 years of experience ... 5 years in management") counts once,
//! which also means two unrelated stints of equal length under-count.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Year that open-ended ranges ("2018 - present") are resolved against.
/// Fixed so that scores do not drift with the wall clock.
pub const REFERENCE_YEAR: i64 = 2025;

pub const MAX_EXPERIENCE_YEARS: u32 = 50;

enum YearsPattern {
    /// Capture group 1 is a number of years.
    Count(Regex),
    /// Capture group 1 is a start year, resolved against `REFERENCE_YEAR`.
    OpenRange(Regex),
}

static PATTERNS: Lazy<Vec<YearsPattern>> = Lazy::new(|| {
    let count = |p: &str| Regex::new(p).map(YearsPattern::Count);
    let range = |p: &str| Regex::new(p).map(YearsPattern::OpenRange);
    [
        count(r"(\d+)\+?\s*years?\s*(?:of\s*)?(?:experience|exp)"),
        count(r"(\d+)\+?\s*years?\s*in\s+"),
        count(r"(?:experience|exp)(?:\s*of\s*|\s+)(\d+)\+?\s*years?"),
        count(r"(\d+)\+?\s*yrs?\s*(?:of\s*)?(?:experience|exp)"),
        count(r"(\d+)\+?\s*years?\s*(?:working|in\s+field)"),
        count(r"\((\d+)\s*years?\)"),
        count(r"(\d+)\s*years?"),
        range(r"(\d{4})\s*[-–]\s*(?:present|current)"),
    ]
    .into_iter()
    .filter_map(Result::ok)
    .collect()
});

/// Returns the estimated years of experience stated in `text`, in `0..=50`.
pub fn extract_years(text: &str) -> u32 {
    let text_lower = text.to_lowercase();
    let mut values: BTreeSet<i64> = BTreeSet::new();

    for pattern in PATTERNS.iter() {
        let (regex, open_range) = match pattern {
            YearsPattern::Count(re) => (re, false),
            YearsPattern::OpenRange(re) => (re, true),
        };
        for caps in regex.captures_iter(&text_lower) {
            let Some(value) = caps.get(1).and_then(|m| parse_digits(m.as_str())) else {
                continue;
            };
            values.insert(if open_range {
                REFERENCE_YEAR.saturating_sub(value)
            } else {
                value
            });
        }
    }

    let total = values.into_iter().fold(0_i64, i64::saturating_add);
    total.clamp(0, MAX_EXPERIENCE_YEARS as i64) as u32
}

static DECIMAL_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d$").unwrap());

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT.is_match(c.encode_utf8(&mut buf))
}

/// Value of any Unicode decimal digit. Decimal digits are encoded in
/// contiguous runs of ten starting at zero, so the value is the offset from
/// the start of the run.
fn digit_value(c: char) -> Option<i64> {
    if let Some(d) = c.to_digit(10) {
        return Some(i64::from(d));
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let mut start = c as u32;
    while let Some(prev) = start.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        start -= 1;
    }
    Some(i64::from((c as u32 - start) % 10))
}

/// Parses a run of decimal digits, saturating at `i64::MAX` so that an
/// oversized figure still hits the cap.
fn parse_digits(digits: &str) -> Option<i64> {
    digits.chars().try_fold(0_i64, |acc, c| {
        let d = digit_value(c)?;
        Some(acc.saturating_mul(10).saturating_add(d))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_mention_is_zero() {
        assert_eq!(extract_years("Worked on many projects."), 0);
        assert_eq!(extract_years(""), 0);
    }

    #[test]
    fn test_simple_years_of_experience() {
        assert_eq!(extract_years("5 years of experience in sales"), 5);
        assert_eq!(extract_years("4+ Years Experience required"), 4);
        assert_eq!(extract_years("1 year of experience"), 1);
    }

    #[test]
    fn test_repeated_value_is_counted_once() {
        let text = "5 years of experience in marketing. Also 5 years in management.";
        assert_eq!(extract_years(text), 5);
    }

    #[test]
    fn test_distinct_values_are_summed() {
        let text = "5 years of experience and 3 years in management";
        assert_eq!(extract_years(text), 8);
    }

    #[test]
    fn test_experience_of_n_years_form() {
        assert_eq!(extract_years("Experience of 6 years with ledgers"), 6);
    }

    #[test]
    fn test_yrs_abbreviation() {
        assert_eq!(extract_years("7 yrs of exp in retail"), 7);
    }

    #[test]
    fn test_parenthesized_form() {
        assert_eq!(extract_years("Acme Corp (3 years)"), 3);
    }

    #[test]
    fn test_open_range_uses_reference_year() {
        assert_eq!(extract_years("Acme Corp, 2018 - Present"), 7);
        assert_eq!(extract_years("Acme Corp 2020–current"), 5);
    }

    #[test]
    fn test_capped_at_fifty() {
        let text = "30 years of experience, 25 years in teaching";
        assert_eq!(extract_years(text), 50);
    }

    #[test]
    fn test_future_start_year_cannot_go_negative() {
        assert_eq!(extract_years("2030-present"), 0);
    }

    #[test]
    fn test_oversized_number_saturates_to_cap() {
        let text = "99999999999999999999999 years of experience";
        assert_eq!(extract_years(text), 50);
    }

    #[test]
    fn test_non_ascii_digits_are_read() {
        // ARABIC-INDIC DIGIT FIVE
        assert_eq!(extract_years("\u{0665} years of experience"), 5);
        // DEVANAGARI "12"
        assert_eq!(extract_years("\u{0967}\u{0968} years of experience"), 12);
    }

    #[test]
    fn test_parse_digits() {
        assert_eq!(parse_digits("2018"), Some(2018));
        assert_eq!(parse_digits("99999999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_digits("\u{0660}\u{0669}"), Some(9));
        assert_eq!(parse_digits("1a"), None);
    }
}
