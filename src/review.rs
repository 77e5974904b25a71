//! Post-extraction review
//!
//! Advisory checks over a finished result, reported with the fine-grained
//! report grade. Nothing here changes the result or its routing grade.

use std::fmt;

use serde::Serialize;

use crate::aggregate::FineGrade;
use crate::schema::Schema;
use crate::types::ExtractionResult;

const LOW_FIELD_CONFIDENCE: u8 = 50;
const LOW_COMPLETENESS: u8 = 60;
const LOW_AVERAGE_CONFIDENCE: u8 = 60;
const CONTACT_FIELDS: &[&str] = &["contactEmail", "contactPhone", "contactPerson"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
}

impl Issue {
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        write!(f, "[{}] {}", tag, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub report_grade: FineGrade,
    pub issues: Vec<Issue>,
}

impl Review {
    /// True when any issue is an error, i.e. manual review is advised
    pub fn needs_attention(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }
}

pub fn review(result: &ExtractionResult, schema: &Schema) -> Review {
    let mut issues = Vec::new();
    let job = &result.job;
    let summary = &result.extraction;

    for name in schema.required_fields() {
        if !job.get(name).is_some_and(|f| f.found) {
            issues.push(Issue::new(
                Severity::Error,
                format!("Missing required field: {}", name),
            ));
        }
    }

    let low: Vec<String> = job
        .iter()
        .filter(|(_, f)| f.found && f.confidence < LOW_FIELD_CONFIDENCE)
        .map(|(name, f)| format!("{} ({}%)", name, f.confidence))
        .collect();
    if !low.is_empty() {
        issues.push(Issue::new(
            Severity::Warning,
            format!("Low confidence fields: {}", low.join(", ")),
        ));
    }

    if summary.fields_requested > 0 && summary.data_completeness < LOW_COMPLETENESS {
        issues.push(Issue::new(
            Severity::Warning,
            format!(
                "Low data completeness: {}% ({}/{} fields)",
                summary.data_completeness, summary.fields_found, summary.fields_requested
            ),
        ));
    }

    if summary.average_confidence > 0 && summary.average_confidence < LOW_AVERAGE_CONFIDENCE {
        issues.push(Issue::new(
            Severity::Warning,
            format!("Low average confidence: {}%", summary.average_confidence),
        ));
    }

    let has_contact = CONTACT_FIELDS
        .iter()
        .any(|name| job.get(name).is_some_and(|f| f.found));
    if !has_contact {
        issues.push(Issue::new(
            Severity::Info,
            "No contact information found (email, phone, or person)",
        ));
    }

    Review {
        report_grade: summary.report_grade(),
        issues,
    }
}
