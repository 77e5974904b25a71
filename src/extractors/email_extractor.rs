//! Contact email extraction with priority filtering
//!
//! Addresses are grouped by how likely they are to reach a recruiter.
//! `noreply` addresses are never returned.

use std::sync::LazyLock;

use regex::Regex;

use super::Candidate;
use crate::types::FieldValue;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());

const HIGH_PRIORITY: &[&str] = &["jobs@", "careers@", "recruiting@", "hr@", "hiring@"];
const LOW_PRIORITY: &[&str] = &["info@", "contact@"];

/// Priority group of an address, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EmailPriority {
    High,
    Medium,
    Low,
}

impl EmailPriority {
    pub fn classify(email: &str) -> Self {
        let lower = email.to_lowercase();
        if HIGH_PRIORITY.iter().any(|kw| lower.contains(kw)) {
            EmailPriority::High
        } else if LOW_PRIORITY.iter().any(|kw| lower.contains(kw)) {
            EmailPriority::Low
        } else {
            EmailPriority::Medium
        }
    }

    pub fn confidence(self) -> u8 {
        match self {
            EmailPriority::High => 90,
            EmailPriority::Medium => 75,
            EmailPriority::Low => 60,
        }
    }
}

/// All email-like substrings in order of appearance
pub fn find_emails(text: &str) -> Vec<&str> {
    EMAIL_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// First address of the best priority group present in the text
pub fn extract_email(text: &str) -> Option<Candidate> {
    let (priority, email) = find_emails(text)
        .into_iter()
        .filter(|email| !email.to_lowercase().contains("noreply"))
        .map(|email| (EmailPriority::classify(email), email))
        .min_by_key(|(priority, _)| *priority)?;

    Some(Candidate::new(
        FieldValue::Email(email.to_string()),
        priority.confidence(),
    ))
}
