//! Completeness/confidence aggregation and quality grading
//!
//! Two grading policies coexist and must stay separate:
//! - [`CoarseGrade`] (A-D) decides routing of a document (complete vs incomplete)
//! - [`FineGrade`] (A+ to F) is a weighted score used only in reports

use std::fmt;

use serde::{Serialize, Serializer};

use crate::types::{ExtractionSummary, JobRecord};

/// Routing grade derived from threshold pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CoarseGrade {
    A,
    B,
    C,
    D,
}

/// Routing decision for a graded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Routing {
    Complete,
    Incomplete,
}

impl CoarseGrade {
    pub fn from_scores(completeness: u8, confidence: u8) -> Self {
        if completeness >= 80 && confidence >= 75 {
            CoarseGrade::A
        } else if completeness >= 70 && confidence >= 65 {
            CoarseGrade::B
        } else if completeness >= 50 && confidence >= 55 {
            CoarseGrade::C
        } else {
            CoarseGrade::D
        }
    }

    pub fn routing(self) -> Routing {
        match self {
            CoarseGrade::A | CoarseGrade::B => Routing::Complete,
            CoarseGrade::C | CoarseGrade::D => Routing::Incomplete,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CoarseGrade::A => "A",
            CoarseGrade::B => "B",
            CoarseGrade::C => "C",
            CoarseGrade::D => "D",
        }
    }
}

/// Report grade banded on `completeness * 0.6 + confidence * 0.4`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FineGrade {
    APlus,
    A,
    BPlus,
    B,
    CPlus,
    C,
    D,
    F,
}

impl FineGrade {
    pub fn from_scores(completeness: u8, confidence: u8) -> Self {
        // Tenths of a point, so band edges compare exactly
        let score = u32::from(completeness) * 6 + u32::from(confidence) * 4;
        match score {
            900.. => FineGrade::APlus,
            850.. => FineGrade::A,
            800.. => FineGrade::BPlus,
            750.. => FineGrade::B,
            700.. => FineGrade::CPlus,
            600.. => FineGrade::C,
            500.. => FineGrade::D,
            _ => FineGrade::F,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FineGrade::APlus => "A+",
            FineGrade::A => "A",
            FineGrade::BPlus => "B+",
            FineGrade::B => "B",
            FineGrade::CPlus => "C+",
            FineGrade::C => "C",
            FineGrade::D => "D",
            FineGrade::F => "F",
        }
    }
}

/// `completeness * 0.6 + confidence * 0.4`
pub fn weighted_score(completeness: u8, confidence: u8) -> f64 {
    f64::from(u32::from(completeness) * 6 + u32::from(confidence) * 4) / 10.0
}

macro_rules! grade_display {
    ($($t:ty),*) => {$(
        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $t {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    )*};
}

grade_display!(CoarseGrade, FineGrade);

/// Build the summary block for a finished job record.
///
/// `fields_requested` is the schema's field count; only found fields
/// contribute to the average confidence.
pub fn summarize(
    job: &JobRecord,
    fields_requested: usize,
    structured_data_available: bool,
) -> ExtractionSummary {
    let found: Vec<u32> = job
        .iter()
        .filter(|(_, f)| f.found)
        .map(|(_, f)| u32::from(f.confidence))
        .collect();
    let fields_found = found.len();

    let average_confidence = if fields_found == 0 {
        0
    } else {
        (found.iter().sum::<u32>() / fields_found as u32) as u8
    };

    let data_completeness = if fields_requested == 0 {
        0
    } else {
        let pct = (fields_found as f64 / fields_requested as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    };

    ExtractionSummary {
        fields_requested,
        fields_found,
        average_confidence,
        data_completeness,
        structured_data_available,
        quality_grade: CoarseGrade::from_scores(data_completeness, average_confidence),
    }
}
