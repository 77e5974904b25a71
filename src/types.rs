//! Result types returned by the extraction engine

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::aggregate::{CoarseGrade, FineGrade};

/// Where a field value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Structured,
    Labeled,
    Pattern,
    Section,
    None,
}

/// Salary range with currency and period
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub currency: String,
    pub period: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
}

/// Extracted value, shaped by the field's declared type
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Email(String),
    Phone(String),
    /// `YYYY-MM-DD` for relative phrases, otherwise the literal match
    Date(String),
    Salary(SalaryRange),
    List(Vec<String>),
    Missing,
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) | FieldValue::Email(s) | FieldValue::Phone(s) | FieldValue::Date(s) => {
                Some(s)
            }
            _ => None,
        }
    }

    pub fn as_salary(&self) -> Option<&SalaryRange> {
        match self {
            FieldValue::Salary(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// One resolved (or unresolved) field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedField {
    pub value: FieldValue,
    pub confidence: u8,
    pub source: Source,
    pub found: bool,
}

impl ExtractedField {
    pub fn found(value: FieldValue, confidence: u8, source: Source) -> Self {
        Self {
            value,
            confidence,
            source,
            found: true,
        }
    }

    pub fn not_found() -> Self {
        Self {
            value: FieldValue::Missing,
            confidence: 0,
            source: Source::None,
            found: false,
        }
    }
}

/// Extracted fields in schema order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobRecord {
    fields: Vec<(String, ExtractedField)>,
}

impl JobRecord {
    pub(crate) fn push(&mut self, name: impl Into<String>, field: ExtractedField) {
        self.fields.push((name.into(), field));
    }

    pub fn get(&self, name: &str) -> Option<&ExtractedField> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtractedField)> {
        self.fields.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for JobRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, field) in &self.fields {
            map.serialize_entry(name, field)?;
        }
        map.end()
    }
}

/// Aggregate metrics over one document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionSummary {
    pub fields_requested: usize,
    pub fields_found: usize,
    pub average_confidence: u8,
    pub data_completeness: u8,
    pub structured_data_available: bool,
    pub quality_grade: CoarseGrade,
}

impl ExtractionSummary {
    /// Fine-grained grade for reports. Never used for routing.
    pub fn report_grade(&self) -> FineGrade {
        FineGrade::from_scores(self.data_completeness, self.average_confidence)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub job: JobRecord,
    pub extraction: ExtractionSummary,
}
