//! Extraction entry points
//!
//! HTML + schema → structured data seeds the record → cascade fills the
//! remaining fields → aggregate summary.

use chrono::NaiveDate;
use scraper::Html;
use serde_json::{json, Value};

use crate::aggregate::summarize;
use crate::cascade::{resolve_field, Page};
use crate::error::ExtractError;
use crate::extractors::extract_job_postings;
use crate::schema::Schema;
use crate::types::{ExtractedField, ExtractionResult, JobRecord, Source};

pub const STRUCTURED_CONFIDENCE: u8 = 100;

/// Extract every schema field from `html`.
///
/// `today` anchors relative dates such as "3 days ago"; identical inputs
/// always produce identical output.
pub fn extract_job(
    html: &str,
    schema: &Schema,
    today: NaiveDate,
) -> Result<ExtractionResult, ExtractError> {
    if html.trim().is_empty() {
        return Err(ExtractError::MissingHtml);
    }
    for warning in schema.validate()? {
        tracing::debug!(%warning, "schema warning");
    }

    let document = Html::parse_document(html);
    let structured = extract_job_postings(&document);
    let page = Page::new(&document, today);

    let fields = schema.fields();
    let mut job = JobRecord::default();
    for field in &fields {
        let extracted = match structured.get(field.name) {
            Some(value) => {
                ExtractedField::found(value.clone(), STRUCTURED_CONFIDENCE, Source::Structured)
            }
            None => resolve_field(&page, field),
        };
        job.push(field.name, extracted);
    }

    let extraction = summarize(&job, fields.len(), structured.is_available());
    tracing::info!(
        fields_requested = extraction.fields_requested,
        fields_found = extraction.fields_found,
        completeness = extraction.data_completeness,
        confidence = extraction.average_confidence,
        grade = %extraction.quality_grade,
        "job extracted"
    );

    Ok(ExtractionResult { job, extraction })
}

/// [`extract_job`] anchored on the local calendar date
pub fn extract_job_now(html: &str, schema: &Schema) -> Result<ExtractionResult, ExtractError> {
    extract_job(html, schema, chrono::Local::now().date_naive())
}

/// `{"success": true, "data": ...}` or `{"success": false, "error": ...}`.
/// Failures never carry a partial job.
pub fn envelope(result: &Result<ExtractionResult, ExtractError>) -> Value {
    match result {
        Ok(data) => json!({ "success": true, "data": data }),
        Err(e) => json!({ "success": false, "error": e.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::CoarseGrade;
    use crate::types::FieldValue;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn schema() -> Schema {
        Schema::from_json_str(
            r#"{
                "extraction_schema": {
                    "required": {
                        "title": {"type": "string", "aliases": ["Job Title", "Position"], "min_confidence": 60},
                        "company": {"type": "string", "aliases": ["Company", "Employer"], "min_confidence": 60},
                        "location": {"type": "string", "aliases": ["Location", "Standort"], "min_confidence": 60}
                    },
                    "high_priority": {
                        "salary": {"type": "object", "aliases": ["Salary", "Gehalt"], "min_confidence": 60},
                        "contactEmail": {"type": "email", "aliases": ["Email", "E-Mail"], "min_confidence": 50}
                    },
                    "medium_priority": {
                        "postedDate": {"type": "date", "aliases": ["Posted"], "min_confidence": 50},
                        "contactPhone": {"type": "phone", "aliases": ["Phone", "Telefon"], "min_confidence": 50}
                    },
                    "optional": {
                        "requirements": {"type": "array", "aliases": ["Requirements"], "min_confidence": 50},
                        "benefits": {"type": "string", "aliases": ["Benefits"], "min_confidence": 50}
                    }
                },
                "extraction_settings": {"max_retries": 3}
            }"#,
        )
        .unwrap()
    }

    fn required_only() -> Schema {
        Schema::from_json_str(
            r#"{"extraction_schema": {"required": {
                "title": {"type": "string", "aliases": ["Title"]},
                "company": {"type": "string", "aliases": ["Company"]},
                "location": {"type": "string", "aliases": ["Location"]}
            }}}"#,
        )
        .unwrap()
    }

    const FULL_PAGE: &str = r#"
    <html>
    <head>
        <script type="application/ld+json">
        {"@context": "https://schema.org", "@type": "JobPosting", "title": "Senior Data Analyst",
         "hiringOrganization": {"@type": "Organization", "name": "Acme GmbH"}}
        </script>
    </head>
    <body>
        <h1>Senior Data Analyst (m/w/d)</h1>
        <dl>
            <dt>Company</dt><dd>Acme Holding</dd>
            <dt>Standort</dt><dd>Berlin, Germany</dd>
        </dl>
        <p>Salary: €60.000 - €80.000 annually</p>
        <p>Posted 3 days ago</p>
        <p>Questions? Write to noreply@acme.de or careers@acme.de, call +49 30 1234 5678.</p>
        <h2>Requirements</h2>
        <ul><li>SQL</li><li>Python</li></ul>
        <h2>Benefits</h2>
        <p>Remote work and 30 days vacation.</p>
    </body>
    </html>
    "#;

    #[test]
    fn test_full_extraction() {
        let result = extract_job(FULL_PAGE, &schema(), today()).unwrap();
        let job = &result.job;

        let title = job.get("title").unwrap();
        assert_eq!(title.value, FieldValue::Text("Senior Data Analyst".into()));
        assert_eq!(title.source, Source::Structured);

        let company = job.get("company").unwrap();
        assert_eq!(company.value, FieldValue::Text("Acme GmbH".into()));
        assert_eq!(company.confidence, 100);

        let location = job.get("location").unwrap();
        assert_eq!(location.value, FieldValue::Text("Berlin, Germany".into()));
        assert_eq!(location.source, Source::Labeled);

        let salary = job.get("salary").unwrap().value.as_salary().unwrap().clone();
        assert_eq!((salary.min, salary.max), (Some(60000), Some(80000)));
        assert_eq!(salary.currency, "EUR");
        assert_eq!(salary.period, "annual");

        assert_eq!(job.get("contactEmail").unwrap().value, FieldValue::Email("careers@acme.de".into()));
        assert_eq!(job.get("postedDate").unwrap().value, FieldValue::Date("2026-10-16".into()));
        assert_eq!(job.get("contactPhone").unwrap().value, FieldValue::Phone("+49 30 1234 5678".into()));
        assert_eq!(
            job.get("requirements").unwrap().value,
            FieldValue::List(vec!["SQL".into(), "Python".into()])
        );

        let summary = &result.extraction;
        assert_eq!(summary.fields_requested, 9);
        assert_eq!(summary.fields_found, 9);
        assert_eq!(summary.data_completeness, 100);
        assert!(summary.structured_data_available);
        assert_eq!(summary.quality_grade, CoarseGrade::A);
    }

    #[test]
    fn test_structured_only_partial() {
        let html = r#"
        <script type="application/ld+json">
        {"@type": "JobPosting", "title": "Data Analyst", "hiringOrganization": {"name": "Acme GmbH"}}
        </script>
        "#;
        let result = extract_job(html, &required_only(), today()).unwrap();

        let title = result.job.get("title").unwrap();
        assert_eq!((title.found, title.confidence), (true, 100));
        let company = result.job.get("company").unwrap();
        assert_eq!((company.found, company.confidence), (true, 100));
        let location = result.job.get("location").unwrap();
        assert!(!location.found);

        assert_eq!(result.extraction.fields_found, 2);
        assert_eq!(result.extraction.data_completeness, 67);
        assert_eq!(result.extraction.average_confidence, 100);
    }

    #[test]
    fn test_structured_beats_labeled() {
        let html = r#"
        <script type="application/ld+json">{"@type": "JobPosting", "title": "Data Engineer"}</script>
        <label>Title</label><span>Something Else Entirely</span>
        "#;
        let result = extract_job(html, &required_only(), today()).unwrap();
        let title = result.job.get("title").unwrap();
        assert_eq!(title.value, FieldValue::Text("Data Engineer".into()));
        assert_eq!(title.confidence, 100);
        assert_eq!(title.source, Source::Structured);
    }

    #[test]
    fn test_output_is_deterministic() {
        let first = serde_json::to_string(&extract_job(FULL_PAGE, &schema(), today()).unwrap()).unwrap();
        let second = serde_json::to_string(&extract_job(FULL_PAGE, &schema(), today()).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_serialized_shape() {
        let result = extract_job(FULL_PAGE, &schema(), today()).unwrap();
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["job"]["title"]["source"], "structured");
        assert_eq!(value["job"]["title"]["found"], true);
        assert_eq!(value["job"]["location"]["value"], "Berlin, Germany");
        assert_eq!(value["job"]["salary"]["value"]["displayText"], "€60.000 - €80.000");
        assert_eq!(value["job"]["requirements"]["value"], json!(["SQL", "Python"]));
        assert_eq!(value["extraction"]["fieldsRequested"], 9);
        assert_eq!(value["extraction"]["qualityGrade"], "A");
        assert_eq!(value["extraction"]["structuredDataAvailable"], true);

        let keys: Vec<&String> = value["job"].as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            [
                "title",
                "company",
                "location",
                "salary",
                "contactEmail",
                "postedDate",
                "contactPhone",
                "requirements",
                "benefits"
            ]
        );
    }

    #[test]
    fn test_not_found_serializes_null_value() {
        let result = extract_job("<p>nothing here</p>", &required_only(), today()).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value["job"]["title"],
            json!({"value": null, "confidence": 0, "source": "none", "found": false})
        );
        assert_eq!(value["extraction"]["averageConfidence"], 0);
        assert_eq!(value["extraction"]["dataCompleteness"], 0);
        assert_eq!(value["extraction"]["qualityGrade"], "D");
    }

    #[test]
    fn test_metric_invariants() {
        for html in [FULL_PAGE, "<p>Location: Hamburg</p>", "<p>empty</p>"] {
            let result = extract_job(html, &schema(), today()).unwrap();
            let summary = &result.extraction;
            let found: Vec<u32> = result
                .job
                .iter()
                .filter(|(_, f)| f.found)
                .map(|(_, f)| u32::from(f.confidence))
                .collect();

            assert!(summary.data_completeness <= 100);
            let expected = (100.0 * found.len() as f64 / summary.fields_requested as f64).round() as u8;
            assert_eq!(summary.data_completeness, expected);
            let mean = if found.is_empty() { 0 } else { found.iter().sum::<u32>() / found.len() as u32 };
            assert_eq!(u32::from(summary.average_confidence), mean);
        }
    }

    #[test]
    fn test_missing_html_is_fatal() {
        let result = extract_job("   ", &schema(), today());
        assert!(matches!(result, Err(ExtractError::MissingHtml)));

        let envelope = envelope(&result);
        assert_eq!(envelope["success"], false);
        assert_eq!(envelope["error"], "missing required input: html");
        assert!(envelope.get("data").is_none());
    }

    #[test]
    fn test_invalid_threshold_aborts() {
        let schema = Schema::from_json_str(
            r#"{"extraction_schema": {"required": {"title": {"type": "string", "aliases": ["Title"], "min_confidence": -5}}}}"#,
        )
        .unwrap();
        let result = extract_job("<p>Title: Analyst</p>", &schema, today());
        assert!(matches!(result, Err(ExtractError::Schema(_))));
    }
}
