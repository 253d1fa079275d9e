//! Paragraph classification
//!
//! Turns each extracted paragraph into a tagged event for the structural
//! parser. Classification looks at the visible text only (placeholders
//! stripped); text events keep the placeholders in their payload.

use once_cell::sync::Lazy;
use regex::Regex;

use super::super::footnotes::strip_placeholders;
use super::super::models::{Event, Paragraph};

static CHAPTER_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,3}$").unwrap());

/// Classify one paragraph as a chapter marker, section heading, or text.
pub fn classify_paragraph(para: &Paragraph) -> Event {
    let visible = strip_placeholders(&para.text);
    let visible = visible.trim();

    if CHAPTER_NUMBER.is_match(visible) {
        if let Ok(number) = visible.parse::<u32>() {
            return Event::Chapter(number);
        }
    }

    if is_heading(visible) {
        return Event::Heading(visible.to_string());
    }

    Event::Text {
        text: para.text.clone(),
        indent_level: para.indent_level,
        first_line_indent: para.first_line_indent,
    }
}

/// Classify a whole paragraph sequence, in order.
pub fn paragraphs_to_events(paragraphs: &[Paragraph]) -> Vec<Event> {
    paragraphs.iter().map(classify_paragraph).collect()
}

/// A section heading has more than 2 alphabetic characters, all uppercase.
/// Digits and punctuation are ignored for the test. All-caps emphasis text
/// is deliberately classified as a heading; the editions under import only
/// use all-caps for structural labels.
fn is_heading(text: &str) -> bool {
    let mut alpha_count = 0;
    for c in text.chars().filter(|c| c.is_alphabetic()) {
        if !c.is_uppercase() {
            return false;
        }
        alpha_count += 1;
    }
    alpha_count > 2
}
