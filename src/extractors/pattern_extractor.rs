//! Pattern extraction over the visible page text
//!
//! Typed fields go to the dedicated salary, email, phone and date
//! extractors. Plain strings are read from the line following an alias,
//! e.g. `Location: Berlin`.

use chrono::NaiveDate;

use super::{extract_date, extract_email, extract_phone, extract_salary, Candidate};
use crate::schema::FieldType;
use crate::types::FieldValue;

pub const STRING_PATTERN_CONFIDENCE: u8 = 65;

/// Minimum length (exclusive) of a value read after an alias
const MIN_VALUE_CHARS: usize = 3;

/// Which pattern family handles a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Salary,
    Email,
    Phone,
    Date,
    AliasLine,
}

impl PatternKind {
    /// Well-known field names take precedence over the declared type
    pub fn for_field(field_name: &str, field_type: FieldType) -> Option<Self> {
        if field_name == "salary"
            || (field_type == FieldType::Object && field_name.to_lowercase().contains("salary"))
        {
            Some(PatternKind::Salary)
        } else if matches!(field_name, "contactEmail" | "email") || field_type == FieldType::Email {
            Some(PatternKind::Email)
        } else if matches!(field_name, "contactPhone" | "phone") || field_type == FieldType::Phone {
            Some(PatternKind::Phone)
        } else if field_type == FieldType::Date {
            Some(PatternKind::Date)
        } else if field_type == FieldType::String {
            Some(PatternKind::AliasLine)
        } else {
            None
        }
    }
}

pub fn extract_pattern(
    text: &str,
    field_name: &str,
    field_type: FieldType,
    aliases: &[String],
    today: NaiveDate,
) -> Option<Candidate> {
    match PatternKind::for_field(field_name, field_type)? {
        PatternKind::Salary => extract_salary(text),
        PatternKind::Email => extract_email(text),
        PatternKind::Phone => extract_phone(text),
        PatternKind::Date => extract_date(text, today),
        PatternKind::AliasLine => extract_after_alias(text, aliases).map(|value| {
            Candidate::new(FieldValue::Text(value), STRING_PATTERN_CONFIDENCE)
        }),
    }
}

/// Rest of the line after the first alias that yields a long enough value.
///
/// Aliases match case-insensitively. Whitespace and one optional `:` or `-`
/// separate the alias from its value. Only the first occurrence of each
/// alias that is followed by any text is considered.
pub fn extract_after_alias(text: &str, aliases: &[String]) -> Option<String> {
    aliases.iter().filter(|a| !a.is_empty()).find_map(|alias| {
        let value = text
            .char_indices()
            .filter_map(|(start, _)| {
                let end = start + match_prefix_ignore_case(&text[start..], alias)?;
                let line = line_after_separator(&text[end..]);
                (!line.is_empty()).then_some(line)
            })
            .next()?
            .trim();
        (value.chars().count() > MIN_VALUE_CHARS).then(|| value.to_string())
    })
}

/// Byte length of the prefix of `text` equal to `alias` ignoring case
fn match_prefix_ignore_case(text: &str, alias: &str) -> Option<usize> {
    let mut chars = text.char_indices();
    for expected in alias.chars() {
        let (_, actual) = chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
    }
    Some(chars.next().map_or(text.len(), |(i, _)| i))
}

fn line_after_separator(rest: &str) -> &str {
    let rest = rest.trim_start();
    let rest = rest.strip_prefix([':', '-']).unwrap_or(rest).trim_start();
    rest.split(['\n', '\r']).next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_dispatch() {
        assert_eq!(PatternKind::for_field("salary", FieldType::String), Some(PatternKind::Salary));
        assert_eq!(PatternKind::for_field("baseSalary", FieldType::Object), Some(PatternKind::Salary));
        assert_eq!(PatternKind::for_field("contactEmail", FieldType::String), Some(PatternKind::Email));
        assert_eq!(PatternKind::for_field("recruiterMail", FieldType::Email), Some(PatternKind::Email));
        assert_eq!(PatternKind::for_field("phone", FieldType::String), Some(PatternKind::Phone));
        assert_eq!(PatternKind::for_field("postedDate", FieldType::Date), Some(PatternKind::Date));
        assert_eq!(PatternKind::for_field("title", FieldType::String), Some(PatternKind::AliasLine));
        assert_eq!(PatternKind::for_field("skills", FieldType::Array), None);
    }

    #[test]
    fn test_alias_line() {
        let text = "Acme GmbH\nLocation: Berlin, Germany\nContract - Full-time\n";
        assert_eq!(
            extract_after_alias(text, &aliases(&["Standort", "location"])),
            Some("Berlin, Germany".into())
        );
        assert_eq!(
            extract_after_alias(text, &aliases(&["Contract"])),
            Some("Full-time".into())
        );
    }

    #[test]
    fn test_alias_with_punctuation() {
        let text = "Pay (gross): 4.500 per month";
        assert_eq!(
            extract_after_alias(text, &aliases(&["Pay (gross)"])),
            Some("4.500 per month".into())
        );
    }

    #[test]
    fn test_short_values_fall_through_to_next_alias() {
        let text = "Team: QA\nDepartment: Quality Assurance";
        assert_eq!(
            extract_after_alias(text, &aliases(&["Team", "Department"])),
            Some("Quality Assurance".into())
        );
    }

    #[test]
    fn test_extract_pattern_confidence() {
        let text = "Salary: €60.000 - €80.000 annually";
        let salary = extract_pattern(text, "salary", FieldType::Object, &aliases(&["Salary"]), today()).unwrap();
        assert_eq!(salary.confidence, 75);

        let line = extract_pattern("Position: Data Analyst", "title", FieldType::String, &aliases(&["Position"]), today())
            .unwrap();
        assert_eq!(line.value, FieldValue::Text("Data Analyst".into()));
        assert_eq!(line.confidence, STRING_PATTERN_CONFIDENCE);

        assert!(extract_pattern(text, "skills", FieldType::Array, &aliases(&["Skills"]), today()).is_none());
    }

    #[test]
    fn test_alias_case_insensitive_non_ascii() {
        let text = "STANDORT: München\nStraße - Hauptstraße 5";
        assert_eq!(extract_after_alias(text, &aliases(&["Standort"])), Some("München".into()));
        assert_eq!(extract_after_alias(text, &aliases(&["straße"])), Some("Hauptstraße 5".into()));
    }

    #[test]
    fn test_value_on_next_line() {
        // The value may start on the next line
        assert_eq!(
            extract_after_alias("Location:\n  Hamburg, Germany", &aliases(&["Location"])),
            Some("Hamburg, Germany".into())
        );
        assert_eq!(extract_after_alias("Apply by email", &aliases(&["email"])), None);
    }
}
