//! Labeled-element extraction
//!
//! Finds label-like elements (`label`, `.label`, `dt`, `strong`, `b`) whose
//! text contains one of a field's aliases and reads the value written next
//! to them.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::{collapse_whitespace, element_text, list_items, next_element_sibling};

/// Label selectors in search order
static LABEL_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    ["label", ".label", "dt", "strong", "b"]
        .iter()
        .map(|s| Selector::parse(s).unwrap())
        .collect()
});

/// Minimum length (exclusive) of a value found next to a label
const MIN_VALUE_CHARS: usize = 2;

/// Raw value written next to a label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledValue {
    pub text: String,
    /// `li` texts when the value is a list
    pub items: Vec<String>,
}

/// First value next to a label matching an alias that `parse` accepts.
///
/// Aliases are tried in order; for each alias, the label selectors are tried
/// in order and elements in document order. A value rejected by `parse`
/// moves the search on to the next label.
pub fn extract_labeled<T>(
    document: &Html,
    aliases: &[String],
    mut parse: impl FnMut(&LabeledValue) -> Option<T>,
) -> Option<T> {
    for alias in aliases {
        let needle = alias.to_lowercase();
        if needle.is_empty() {
            continue;
        }
        for selector in LABEL_SELECTORS.iter() {
            for label in document.select(selector) {
                if !element_text(label).to_lowercase().contains(&needle) {
                    continue;
                }
                let Some(value) = value_near(label) else {
                    continue;
                };
                match parse(&value) {
                    Some(parsed) => {
                        tracing::trace!(alias = %alias, "label match");
                        return Some(parsed);
                    }
                    None => tracing::trace!(alias = %alias, "label value rejected"),
                }
            }
        }
    }
    None
}

/// Value of the label's next sibling, else of its parent's next sibling element
fn value_near(label: ElementRef<'_>) -> Option<LabeledValue> {
    if let Some(value) = sibling_value(label).filter(|v| is_long_enough(&v.text)) {
        return Some(value);
    }

    let parent = label.parent().and_then(ElementRef::wrap)?;
    next_element_sibling(parent)
        .map(element_value)
        .filter(|v| is_long_enough(&v.text))
}

/// First non-blank sibling node, text or element
fn sibling_value(label: ElementRef<'_>) -> Option<LabeledValue> {
    for node in label.next_siblings() {
        let value = if let Some(text) = node.value().as_text() {
            LabeledValue {
                text: collapse_whitespace(text),
                items: Vec::new(),
            }
        } else if let Some(el) = ElementRef::wrap(node) {
            element_value(el)
        } else {
            continue;
        };

        let text = value.text.trim_start_matches([':', '-', ' ']).trim();
        if !text.is_empty() {
            return Some(LabeledValue {
                text: text.to_string(),
                items: value.items,
            });
        }
    }
    None
}

fn element_value(element: ElementRef<'_>) -> LabeledValue {
    LabeledValue {
        text: element_text(element),
        items: list_items(element),
    }
}

fn is_long_enough(value: &str) -> bool {
    value.chars().count() > MIN_VALUE_CHARS
}
