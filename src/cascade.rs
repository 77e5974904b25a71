//! Field extraction cascade
//!
//! Fields not seeded by structured data are resolved by trying the
//! strategies in a fixed order. The first strategy whose candidate reaches
//! the field's `min_confidence` wins, even if a later strategy might have
//! produced a more confident value.

use chrono::NaiveDate;
use scraper::Html;

use crate::extractors::{
    extract_date, extract_email, extract_labeled, extract_pattern, extract_phone, extract_salary,
    extract_section, page_text, Candidate, LabeledValue, PatternKind,
};
use crate::schema::{FieldSpec, FieldType};
use crate::types::{ExtractedField, FieldValue, Source};

pub const LABELED_CONFIDENCE: u8 = 85;
pub const SECTION_CONFIDENCE: u8 = 65;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Labeled,
    Pattern,
    Section,
}

impl Strategy {
    /// Evaluation order
    pub const ORDER: [Strategy; 3] = [Strategy::Labeled, Strategy::Pattern, Strategy::Section];

    pub fn source(self) -> Source {
        match self {
            Strategy::Labeled => Source::Labeled,
            Strategy::Pattern => Source::Pattern,
            Strategy::Section => Source::Section,
        }
    }
}

/// A parsed document plus everything the strategies share for one call
pub struct Page<'a> {
    document: &'a Html,
    text: String,
    today: NaiveDate,
}

impl<'a> Page<'a> {
    pub fn new(document: &'a Html, today: NaiveDate) -> Self {
        Self {
            document,
            text: page_text(document),
            today,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    fn run(&self, strategy: Strategy, field: &FieldSpec<'_>) -> Option<Candidate> {
        let field_type = field.config.field_type();
        match strategy {
            Strategy::Labeled => extract_labeled(self.document, &field.config.aliases, |value| {
                labeled_value(field.name, field_type, value, self.today)
            })
            .map(|value| Candidate::new(value, LABELED_CONFIDENCE)),
            Strategy::Pattern => extract_pattern(
                &self.text,
                field.name,
                field_type,
                &field.config.aliases,
                self.today,
            ),
            Strategy::Section => extract_section(self.document, field.name, field_type)
                .map(|value| Candidate::new(value, SECTION_CONFIDENCE)),
        }
    }
}

/// Resolve one field, or report it as not found
pub fn resolve_field(page: &Page<'_>, field: &FieldSpec<'_>) -> ExtractedField {
    for strategy in Strategy::ORDER {
        let Some(candidate) = page.run(strategy, field) else {
            continue;
        };
        if f64::from(candidate.confidence) >= field.config.min_confidence {
            tracing::debug!(
                field = field.name,
                ?strategy,
                confidence = candidate.confidence,
                "field resolved"
            );
            return ExtractedField::found(candidate.value, candidate.confidence, strategy.source());
        }
        tracing::debug!(
            field = field.name,
            ?strategy,
            confidence = candidate.confidence,
            min_confidence = field.config.min_confidence,
            "candidate below threshold"
        );
    }

    tracing::debug!(field = field.name, "field not found");
    ExtractedField::not_found()
}

/// Read a labeled value as the field's kind. Typed fields go through the
/// same parsers as the pattern strategy, and a value that does not parse
/// (e.g. a noreply address) is rejected.
fn labeled_value(
    field_name: &str,
    field_type: FieldType,
    value: &LabeledValue,
    today: NaiveDate,
) -> Option<FieldValue> {
    let parsed = match PatternKind::for_field(field_name, field_type) {
        Some(PatternKind::Salary) => extract_salary(&value.text),
        Some(PatternKind::Email) => extract_email(&value.text),
        Some(PatternKind::Phone) => extract_phone(&value.text),
        Some(PatternKind::Date) => extract_date(&value.text, today),
        None if field_type == FieldType::Array => {
            let items = if value.items.is_empty() {
                vec![value.text.clone()]
            } else {
                value.items.clone()
            };
            return Some(FieldValue::List(items));
        }
        Some(PatternKind::AliasLine) | None => return Some(FieldValue::Text(value.text.clone())),
    };
    parsed.map(|candidate| candidate.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn schema() -> Schema {
        Schema::from_value(&json!({
            "extraction_schema": {
                "required": {
                    "location": {"type": "string", "aliases": ["Location"], "min_confidence": 60},
                    "company": {"type": "string", "aliases": ["Company"], "min_confidence": 90},
                    "description": {"type": "string", "aliases": ["Summary"], "min_confidence": 50}
                },
                "optional": {
                    "contactEmail": {"type": "email", "aliases": ["Email"], "min_confidence": 80},
                    "skills": {"type": "array", "aliases": ["Skills"]},
                    "postedDate": {"type": "date", "aliases": ["Posted"]},
                    "salary": {"type": "object", "aliases": ["Salary"]},
                    "requirements": {"type": "array", "aliases": ["Requirements"]}
                }
            }
        }))
        .unwrap()
    }

    fn resolve(html: &str, name: &str) -> ExtractedField {
        let schema = schema();
        let document = Html::parse_document(html);
        let page = Page::new(&document, today());
        let field = schema.field(name).unwrap();
        resolve_field(&page, &field)
    }

    #[test]
    fn test_labeled_wins_over_pattern() {
        let html = r#"
        <p>Location: Hamburg</p>
        <dl><dt>Location</dt><dd>Berlin</dd></dl>
        "#;
        let field = resolve(html, "location");
        assert_eq!(field.value, FieldValue::Text("Berlin".into()));
        assert_eq!(field.source, Source::Labeled);
        assert_eq!(field.confidence, LABELED_CONFIDENCE);
    }

    #[test]
    fn test_pattern_when_no_label() {
        let field = resolve("<p>Location: Hamburg, Germany</p>", "location");
        assert_eq!(field.value, FieldValue::Text("Hamburg, Germany".into()));
        assert_eq!(field.source, Source::Pattern);
        assert_eq!(field.confidence, 65);
    }

    #[test]
    fn test_threshold_rejects_every_strategy() {
        // Labeled gives 85, pattern 65: both below 90
        let html = r#"<p>Company: Acme GmbH</p><label>Company</label><span>Acme GmbH</span>"#;
        let field = resolve(html, "company");
        assert_eq!(field, ExtractedField::not_found());
        assert_eq!(field.source, Source::None);
    }

    #[test]
    fn test_section_fallback() {
        let html = r#"<h2>About the role</h2><p>Build dashboards.</p>"#;
        let field = resolve(html, "description");
        assert_eq!(field.value, FieldValue::Text("Build dashboards.".into()));
        assert_eq!(field.source, Source::Section);
        assert_eq!(field.confidence, SECTION_CONFIDENCE);
    }

    #[test]
    fn test_email_below_threshold_not_found() {
        // Medium priority email scores 75, threshold is 80
        let field = resolve("<p>Reach anna@acme.de</p>", "contactEmail");
        assert!(!field.found);

        let field = resolve("<p>Reach jobs@acme.de</p>", "contactEmail");
        assert_eq!(field.value, FieldValue::Email("jobs@acme.de".into()));
        assert_eq!(field.confidence, 90);
    }

    #[test]
    fn test_noreply_only_not_found() {
        let field = resolve("<p>Sent by noreply@x.com</p>", "contactEmail");
        assert!(!field.found);
        assert_eq!(field.confidence, 0);
    }

    #[test]
    fn test_labeled_array_value() {
        let html = r#"<dl><dt>Skills</dt><dd>SQL, Python</dd></dl>"#;
        let field = resolve(html, "skills");
        assert_eq!(field.value, FieldValue::List(vec!["SQL, Python".into()]));
    }

    #[test]
    fn test_labeled_noreply_is_rejected() {
        let field = resolve("<p><strong>Email:</strong> noreply@x.com</p>", "contactEmail");
        assert_eq!(field, ExtractedField::not_found());

        let field = resolve("<p><strong>Email:</strong> jobs@acme.de</p>", "contactEmail");
        assert_eq!(field.value, FieldValue::Email("jobs@acme.de".into()));
        assert_eq!(field.source, Source::Labeled);
        assert_eq!(field.confidence, LABELED_CONFIDENCE);
    }

    #[test]
    fn test_labeled_relative_date_is_resolved() {
        let field = resolve("<p><strong>Posted:</strong> 3 days ago</p>", "postedDate");
        assert_eq!(field.value, FieldValue::Date("2026-10-16".into()));
        assert_eq!(field.source, Source::Labeled);
    }

    #[test]
    fn test_labeled_salary_is_structured() {
        let field = resolve("<dl><dt>Salary</dt><dd>€60.000 - €80.000 annually</dd></dl>", "salary");
        assert_eq!(field.source, Source::Labeled);
        let salary = field.value.as_salary().unwrap();
        assert_eq!((salary.min, salary.max), (Some(60000), Some(80000)));
        assert_eq!(salary.currency, "EUR");
        assert_eq!(salary.period, "annual");
    }

    #[test]
    fn test_labeled_list_collects_items() {
        let html = r#"<p><strong>Requirements</strong></p><ul><li>SQL</li><li>Python</li></ul>"#;
        let field = resolve(html, "requirements");
        assert_eq!(field.value, FieldValue::List(vec!["SQL".into(), "Python".into()]));
        assert_eq!(field.source, Source::Labeled);
    }
}
