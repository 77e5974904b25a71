//! HTML extraction modules
//!
//! Each module handles one way of locating a field value:
//! - `jsonld_extractor`: Schema.org JobPosting records (authoritative seed data)
//! - `label_extractor`: values next to label-like elements
//! - `pattern_extractor`: regex over the visible page text, with typed helpers
//!   for salary, email, phone and date
//! - `section_extractor`: narrative blocks under known headings

mod date_extractor;
mod email_extractor;
mod jsonld_extractor;
mod label_extractor;
mod pattern_extractor;
mod phone_extractor;
mod salary_extractor;
mod section_extractor;

pub use date_extractor::*;
pub use email_extractor::*;
pub use jsonld_extractor::*;
pub use label_extractor::*;
pub use pattern_extractor::*;
pub use phone_extractor::*;
pub use salary_extractor::*;
pub use section_extractor::*;

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::types::FieldValue;

/// A value proposed by one strategy, before the min_confidence check
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub value: FieldValue,
    pub confidence: u8,
}

impl Candidate {
    pub fn new(value: FieldValue, confidence: u8) -> Self {
        Self { value, confidence }
    }
}

/// Elements whose text is never visible
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Elements that break the text flow into lines
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "footer",
    "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav", "ol", "p",
    "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Visible text of the whole page, one line per block element
pub fn page_text(document: &Html) -> String {
    let mut out = String::new();
    push_text(document.root_element(), &mut out);
    out
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if HIDDEN_TAGS.contains(&name) {
                continue;
            }
            let block = BLOCK_TAGS.contains(&name);
            if block {
                out.push('\n');
            }
            push_text(child_el, out);
            if block {
                out.push('\n');
            }
        }
    }
}

static LIST_ITEM_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());

/// Visible text of an element with whitespace runs collapsed.
/// Block children are separated by a space, never glued together.
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_text(element, &mut out);
    collapse_whitespace(&out)
}

/// Non-empty `li` texts below an element, in document order
pub(crate) fn list_items(element: ElementRef<'_>) -> Vec<String> {
    element
        .select(&LIST_ITEM_SELECTOR)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First following sibling that is an element
pub(crate) fn next_element_sibling<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.next_siblings().find_map(ElementRef::wrap)
}
