//! Salary range extraction from free text

use std::sync::LazyLock;

use regex::Regex;

use super::Candidate;
use crate::types::{FieldValue, SalaryRange};

pub const SALARY_CONFIDENCE: u8 = 75;

/// Tried in order, first match wins
static SALARY_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        // €60,000 - €80,000 / €60.000 - €80.000
        Regex::new(r"€\s?(\d{1,3}(?:[.,]\d{3})*)\s?[-–]\s?€\s?(\d{1,3}(?:[.,]\d{3})*)").unwrap(),
        // $60,000 - $80,000
        Regex::new(r"\$\s?(\d{1,3}(?:,\d{3})*)\s?[-–]\s?\$\s?(\d{1,3}(?:,\d{3})*)").unwrap(),
        // 60k-80k EUR
        Regex::new(r"(?i)(\d{1,3})k?\s?[-–]\s?(\d{1,3})k?\s?(EUR|USD|GBP|CHF)").unwrap(),
    ]
});

/// First salary range mentioned in the text. Always reported as annual.
pub fn extract_salary(text: &str) -> Option<Candidate> {
    for pattern in SALARY_PATTERNS.iter() {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        let matched = caps.get(0)?.as_str();

        let (Some(mut min), Some(mut max)) = (parse_amount(&caps[1]), parse_amount(&caps[2])) else {
            continue;
        };

        let currency = if matched.contains('$') {
            "USD".to_string()
        } else if let Some(unit) = caps.get(3) {
            unit.as_str().to_uppercase()
        } else {
            "EUR".to_string()
        };

        if matched.to_lowercase().contains('k') {
            min *= 1000;
            max *= 1000;
        }

        let salary = SalaryRange {
            min: Some(min),
            max: Some(max),
            currency,
            period: "annual".to_string(),
            display_text: Some(matched.trim().to_string()),
        };
        return Some(Candidate::new(FieldValue::Salary(salary), SALARY_CONFIDENCE));
    }
    None
}

/// Digits only; thousands separators are dropped
fn parse_amount(raw: &str) -> Option<i64> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}
