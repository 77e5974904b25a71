//! Section extraction for narrative fields
//!
//! Some fields are written as prose under a heading ("About the role",
//! "What we offer", ...). The content following a matching heading is
//! collected until the next heading.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::{element_text, list_items, next_element_sibling};
use crate::schema::FieldType;
use crate::types::FieldValue;

/// Narrative fields and the heading phrases that introduce them
const SECTION_HEADINGS: &[(&str, &[&str])] = &[
    (
        "description",
        &["about the role", "job description", "position overview", "what you'll do"],
    ),
    (
        "requirements",
        &["requirements", "qualifications", "what we're looking for", "you have"],
    ),
    (
        "responsibilities",
        &["responsibilities", "your tasks", "day-to-day", "duties"],
    ),
    (
        "benefits",
        &["benefits", "what we offer", "perks", "why join us"],
    ),
    (
        "companyDescription",
        &["about us", "about the company", "who we are", "our story"],
    ),
];

/// Heading selectors in search order
static HEADING_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["h1", "h2", "h3", "h4", "strong", "b"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4"];
const BOLD_TAGS: &[&str] = &["strong", "b"];

/// Heading phrases for a field, if it is a narrative field
pub fn section_headings(field_name: &str) -> Option<&'static [&'static str]> {
    SECTION_HEADINGS
        .iter()
        .find(|(name, _)| *name == field_name)
        .map(|(_, phrases)| *phrases)
}

/// Content under the first heading matching one of the field's phrases.
///
/// Array fields collect list items; other fields join paragraph and list
/// text with single spaces.
pub fn extract_section(document: &Html, field_name: &str, field_type: FieldType) -> Option<FieldValue> {
    let phrases = section_headings(field_name)?;

    for phrase in phrases {
        for selector in HEADING_SELECTORS.iter() {
            for heading in document.select(selector) {
                if !heading_text(heading).contains(phrase) {
                    continue;
                }
                if let Some(value) = content_after(heading, field_type) {
                    tracing::trace!(field = field_name, phrase = %phrase, "section match");
                    return Some(value);
                }
            }
        }
    }
    None
}

/// Lowercased heading text with typographic apostrophes straightened
fn heading_text(heading: ElementRef<'_>) -> String {
    element_text(heading).to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}

fn content_after(heading: ElementRef<'_>, field_type: FieldType) -> Option<FieldValue> {
    // A bold run inside a paragraph acts as a heading for the paragraph's siblings
    let start = if BOLD_TAGS.contains(&heading.value().name())
        && next_element_sibling(heading).is_none()
    {
        heading.parent().and_then(ElementRef::wrap).unwrap_or(heading)
    } else {
        heading
    };

    let mut paragraphs = Vec::new();
    let mut items = Vec::new();

    for sibling in start.next_siblings().filter_map(ElementRef::wrap) {
        if is_heading(sibling) {
            break;
        }
        match sibling.value().name() {
            "p" => {
                let text = element_text(sibling);
                if !text.is_empty() {
                    paragraphs.push(text);
                }
            }
            "ul" | "ol" => {
                for text in list_items(sibling) {
                    paragraphs.push(text.clone());
                    items.push(text);
                }
            }
            _ => {}
        }
    }

    match field_type {
        FieldType::Array => (!items.is_empty()).then_some(FieldValue::List(items)),
        _ => (!paragraphs.is_empty()).then(|| FieldValue::Text(paragraphs.join(" "))),
    }
}

/// h1-h4, or a paragraph consisting only of bold text
fn is_heading(element: ElementRef<'_>) -> bool {
    let name = element.value().name();
    if HEADING_TAGS.contains(&name) || BOLD_TAGS.contains(&name) {
        return true;
    }
    if name != "p" {
        return false;
    }
    let mut children = element.children().filter_map(ElementRef::wrap);
    match (children.next(), children.next()) {
        (Some(only), None) if BOLD_TAGS.contains(&only.value().name()) => {
            element_text(only) == element_text(element)
        }
        _ => false,
    }
}
