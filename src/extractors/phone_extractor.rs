//! Phone number extraction

use std::sync::LazyLock;

use regex::Regex;

use super::Candidate;
use crate::types::FieldValue;

pub const PHONE_CONFIDENCE: u8 = 70;

/// International, US parenthesized, generic grouped digits
static PHONE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"\+[0-9]{1,3}\s?\(?[0-9]{1,4}\)?\s?[0-9]{1,4}\s?[0-9]{1,4}\s?[0-9]{1,9}").unwrap(),
        Regex::new(r"\([0-9]{3}\)\s?[0-9]{3}-[0-9]{4}").unwrap(),
        Regex::new(r"[0-9]{2,4}\s?[0-9]{2,4}\s?[0-9]{2,4}\s?[0-9]{2,4}").unwrap(),
    ]
});

/// Each pattern contributes at most its first match, which must carry 7-15 digits
pub fn extract_phone(text: &str) -> Option<Candidate> {
    PHONE_PATTERNS.iter().find_map(|pattern| {
        let phone = pattern.find(text)?.as_str().trim();
        let digits = phone.chars().filter(char::is_ascii_digit).count();
        (7..=15).contains(&digits).then(|| {
            Candidate::new(FieldValue::Phone(phone.to_string()), PHONE_CONFIDENCE)
        })
    })
}
