//! Posting date extraction
//!
//! Relative phrases ("3 days ago", "yesterday") are resolved against the
//! caller-supplied `today`, so results never depend on the system clock.
//! Absolute dates are returned exactly as written.

use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;

use super::Candidate;
use crate::types::FieldValue;

pub const RELATIVE_DATE_CONFIDENCE: u8 = 80;
pub const ABSOLUTE_DATE_CONFIDENCE: u8 = 75;

#[derive(Debug, Clone, Copy)]
enum RelativeUnit {
    Days,
    Weeks,
    /// Approximated as 30 days
    Months,
    Yesterday,
}

static RELATIVE_PATTERNS: LazyLock<Vec<(Regex, RelativeUnit)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"(?i)(\d+)\s+days?\s+ago").unwrap(), RelativeUnit::Days),
        (Regex::new(r"(?i)(\d+)\s+weeks?\s+ago").unwrap(), RelativeUnit::Weeks),
        (Regex::new(r"(?i)(\d+)\s+months?\s+ago").unwrap(), RelativeUnit::Months),
        (Regex::new(r"(?i)\byesterday\b").unwrap(), RelativeUnit::Yesterday),
    ]
});

/// ISO, US, European
static ABSOLUTE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap(),
        Regex::new(r"\d{1,2}/\d{1,2}/\d{4}").unwrap(),
        Regex::new(r"\d{1,2}\.\d{1,2}\.\d{4}").unwrap(),
    ]
});

pub fn extract_date(text: &str, today: NaiveDate) -> Option<Candidate> {
    if let Some(date) = resolve_relative(text, today) {
        return Some(Candidate::new(
            FieldValue::Date(date.format("%Y-%m-%d").to_string()),
            RELATIVE_DATE_CONFIDENCE,
        ));
    }

    ABSOLUTE_PATTERNS.iter().find_map(|pattern| {
        let literal = pattern.find(text)?.as_str();
        Some(Candidate::new(
            FieldValue::Date(literal.to_string()),
            ABSOLUTE_DATE_CONFIDENCE,
        ))
    })
}

/// Date of the first relative phrase, patterns tried in order
pub fn resolve_relative(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    RELATIVE_PATTERNS.iter().find_map(|(pattern, unit)| {
        let caps = pattern.captures(text)?;
        let days_back = match unit {
            RelativeUnit::Yesterday => 1,
            RelativeUnit::Days => caps[1].parse::<u64>().ok()?,
            RelativeUnit::Weeks => caps[1].parse::<u64>().ok()?.checked_mul(7)?,
            RelativeUnit::Months => caps[1].parse::<u64>().ok()?.checked_mul(30)?,
        };
        today.checked_sub_days(Days::new(days_back))
    })
}
