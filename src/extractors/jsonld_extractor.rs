//! JSON-LD JobPosting extraction
//!
//! Reads `<script type="application/ld+json">` blocks and maps Schema.org
//! JobPosting properties onto output field names. Supports a single object,
//! arrays of objects and `@graph` containers. Blocks that fail to parse are
//! skipped without affecting their siblings.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;

use crate::types::{FieldValue, SalaryRange};

static JSONLD_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

/// Fields harvested from JobPosting records, in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredJob {
    fields: Vec<(&'static str, FieldValue)>,
}

impl StructuredJob {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
    }

    /// True when at least one JobPosting property was mapped
    pub fn is_available(&self) -> bool {
        !self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Later values replace earlier ones in place
    fn set(&mut self, field: &'static str, value: FieldValue) {
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }
}

/// Harvest every JobPosting embedded in the document
pub fn extract_job_postings(document: &Html) -> StructuredJob {
    let mut job = StructuredJob::default();

    for (index, element) in document.select(&JSONLD_SELECTOR).enumerate() {
        let text = element.text().collect::<String>();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(json) => collect_job_postings(&json, &mut job),
            Err(e) => {
                tracing::debug!(block = index, error = %e, "skipping malformed JSON-LD block");
            }
        }
    }

    if job.is_available() {
        tracing::debug!(fields = job.len(), "structured JobPosting data found");
    }
    job
}

fn collect_job_postings(value: &Value, job: &mut StructuredJob) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_job_postings(item, job);
            }
        }
        Value::Object(obj) => {
            if let Some(Value::Array(graph)) = obj.get("@graph") {
                for item in graph {
                    collect_job_postings(item, job);
                }
            }
            if is_job_posting(value) {
                map_job_posting(value, job);
            }
        }
        _ => {}
    }
}

fn is_job_posting(value: &Value) -> bool {
    let is_match = |t: &str| {
        t.strip_prefix("https://schema.org/")
            .or_else(|| t.strip_prefix("http://schema.org/"))
            .unwrap_or(t)
            == "JobPosting"
    };
    match value.get("@type") {
        Some(Value::String(s)) => is_match(s),
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).any(is_match),
        _ => false,
    }
}

fn map_job_posting(data: &Value, job: &mut StructuredJob) {
    if let Some(title) = data.get("title").and_then(text_value) {
        job.set("title", FieldValue::Text(title));
    }

    if let Some(company) = data.get("hiringOrganization").and_then(|org| match org {
        Value::Object(_) => org.get("name").and_then(text_value),
        _ => text_value(org),
    }) {
        job.set("company", FieldValue::Text(company));
    }

    if let Some(location) = data.get("jobLocation").and_then(location_value) {
        job.set("location", FieldValue::Text(location));
    }

    if let Some(salary) = data.get("baseSalary").and_then(salary_value) {
        job.set("salary", FieldValue::Salary(salary));
    }

    if let Some(description) = data.get("description").and_then(text_value) {
        job.set("description", FieldValue::Text(description));
    }

    if let Some(posted) = data.get("datePosted").and_then(text_value) {
        job.set("postedDate", FieldValue::Date(posted));
    }

    match data.get("employmentType") {
        Some(Value::Array(items)) => {
            let types: Vec<String> = items.iter().filter_map(text_value).collect();
            if !types.is_empty() {
                job.set("jobType", FieldValue::List(types));
            }
        }
        Some(other) => {
            if let Some(kind) = text_value(other) {
                job.set("jobType", FieldValue::Text(kind));
            }
        }
        None => {}
    }
}

/// Non-empty string or number rendered as text
fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// "City, Country" from the first place that has an address
fn location_value(value: &Value) -> Option<String> {
    let place = match value {
        Value::Array(places) => places.iter().find(|p| p.is_object())?,
        Value::Object(_) => value,
        _ => return None,
    };

    let address = place.get("address")?;
    if let Some(text) = text_value(address) {
        return Some(text);
    }

    let part = |key: &str| -> String {
        let text = match address.get(key) {
            Some(Value::Object(obj)) => obj.get("name").and_then(text_value),
            Some(v) => text_value(v),
            None => None,
        };
        text.unwrap_or_default()
    };
    let city = part("addressLocality");
    let country = part("addressCountry");

    let joined = format!("{}, {}", city, country);
    let location = joined.trim_matches(|c: char| c == ',' || c == ' ');
    (!location.is_empty()).then(|| location.to_string())
}

fn salary_value(value: &Value) -> Option<SalaryRange> {
    let amount = value.get("value")?;
    let (min, max) = match amount {
        Value::Object(_) => {
            let single = amount.get("value").and_then(number_value);
            (
                amount.get("minValue").and_then(number_value).or(single),
                amount.get("maxValue").and_then(number_value).or(single),
            )
        }
        other => {
            let single = number_value(other);
            (single, single)
        }
    };
    if min.is_none() && max.is_none() {
        return None;
    }

    let currency = amount
        .get("currency")
        .or_else(|| value.get("currency"))
        .and_then(text_value)
        .unwrap_or_else(|| "USD".to_string());
    let period = value
        .get("unitText")
        .or_else(|| amount.get("unitText"))
        .and_then(text_value)
        .unwrap_or_else(|| "YEAR".to_string())
        .to_lowercase();

    Some(SalaryRange {
        min,
        max,
        currency,
        period,
        display_text: None,
    })
}

fn number_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f.round() as i64),
        _ => None,
    }
}
