//! Job posting extractor
//!
//! Extracts job posting fields from HTML according to a JSON schema:
//! - JSON-LD JobPosting (with @graph support)
//! - Labeled values (label/dt/strong/b followed by the value)
//! - Text patterns (salary, email, phone, dates, `Alias: value` lines)
//! - Section headings (description, requirements, benefits, ...)
//!
//! Each field carries a confidence and its source, and the whole record is
//! graded for routing. A C ABI is exposed through [`ffi`].

pub mod aggregate;
pub mod cascade;
mod engine;
pub mod error;
pub mod extractors;
pub mod ffi;
pub mod review;
pub mod schema;
pub mod types;

pub use aggregate::{CoarseGrade, FineGrade, Routing};
pub use engine::{envelope, extract_job, extract_job_now, STRUCTURED_CONFIDENCE};
pub use error::{ExtractError, SchemaError};
pub use ffi::*;
pub use review::{review, Review};
pub use schema::{FieldType, Schema, SchemaWarning, Tier};
pub use types::{ExtractedField, ExtractionResult, ExtractionSummary, FieldValue, JobRecord, SalaryRange, Source};
