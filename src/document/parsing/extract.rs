//! Raw paragraph and footnote extraction from document XML parts
//!
//! Streams `word/document.xml` and `word/footnotes.xml` with quick-xml
//! rather than going through a DOM: the pipeline only needs paragraph text
//! in document order, inline footnote reference positions, and the
//! paragraph-level indent attributes, all of which sit one event apart in
//! the XML stream.

use anyhow::{Context, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::super::footnotes::{placeholder_for, strip_placeholders};
use super::super::models::{FootnoteMap, Paragraph};

/// Twips per left-indent step (Word's default indent increment, 0.5").
const TWIPS_PER_INDENT_STEP: f64 = 720.0;
/// `w:leftChars` is hundredths of a character; two characters per step.
const CHAR_HUNDREDTHS_PER_INDENT_STEP: f64 = 200.0;
/// Approximate character advance in twips, for first-line conversion.
const TWIPS_PER_CHAR: f64 = 240.0;
/// First-line indents smaller than this are treated as absent.
const FIRST_LINE_EPSILON: f64 = 0.01;

/// Raw `w:ind` attribute values, before unit conversion.
#[derive(Debug, Clone, Copy, Default)]
struct RawIndent {
    left: Option<i64>,
    left_chars: Option<i64>,
    first_line: Option<i64>,
    first_line_chars: Option<i64>,
    hanging: Option<i64>,
    hanging_chars: Option<i64>,
}

impl RawIndent {
    fn from_element(e: &BytesStart) -> RawIndent {
        let mut ind = RawIndent::default();
        for attr in e.attributes().flatten() {
            let value = match std::str::from_utf8(&attr.value)
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
            {
                Some(v) => v,
                None => continue,
            };
            // w:start/w:startChars are the logical-direction aliases newer
            // Word versions emit for w:left/w:leftChars.
            match attr.key.as_ref() {
                b"w:left" | b"w:start" => ind.left = Some(value),
                b"w:leftChars" | b"w:startChars" => ind.left_chars = Some(value),
                b"w:firstLine" => ind.first_line = Some(value),
                b"w:firstLineChars" => ind.first_line_chars = Some(value),
                b"w:hanging" => ind.hanging = Some(value),
                b"w:hangingChars" => ind.hanging_chars = Some(value),
                _ => {}
            }
        }
        ind
    }

    /// Left indent as a step count; both units are converted and the larger
    /// wins. Zero or absent metadata yields `None`.
    fn indent_level(&self) -> Option<u32> {
        let from_twips = self
            .left
            .map(|v| (v as f64 / TWIPS_PER_INDENT_STEP).round() as i64)
            .unwrap_or(0);
        let from_chars = self
            .left_chars
            .map(|v| (v as f64 / CHAR_HUNDREDTHS_PER_INDENT_STEP).round() as i64)
            .unwrap_or(0);
        let steps = from_twips.max(from_chars);
        (steps >= 1).then_some(steps as u32)
    }

    /// First-line indent in approximate character units, negative for a
    /// hanging indent. The character-unit attributes win over the twip
    /// attributes when present with a nonzero delta.
    fn first_line_indent(&self) -> Option<f64> {
        let from_chars = self
            .hanging_chars
            .filter(|v| *v != 0)
            .map(|v| -(v as f64) / 100.0)
            .or_else(|| {
                self.first_line_chars
                    .filter(|v| *v != 0)
                    .map(|v| v as f64 / 100.0)
            });
        let value = from_chars.or_else(|| {
            self.hanging
                .map(|v| -(v as f64) / TWIPS_PER_CHAR)
                .or_else(|| self.first_line.map(|v| v as f64 / TWIPS_PER_CHAR))
        })?;
        (value.abs() >= FIRST_LINE_EPSILON).then_some(value)
    }
}

/// Parse the document body XML into ordered paragraphs.
///
/// Footnote reference marks are replaced inline by placeholders keyed
/// `"{lang}:{id}"`. Paragraphs that are empty once placeholders are
/// stripped are dropped.
pub(crate) fn extract_paragraphs(document_xml: &str, lang: &str) -> Result<Vec<Paragraph>> {
    let mut reader = Reader::from_str(document_xml);
    reader.config_mut().trim_text(false); // preserve spacing between runs

    let mut paragraphs = Vec::new();
    let mut in_paragraph = false;
    let mut in_text_run = false;
    let mut current_text = String::new();
    let mut current_indent = RawIndent::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:p" => {
                in_paragraph = true;
                current_text.clear();
                current_indent = RawIndent::default();
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"w:p" => {
                in_paragraph = false;
                let text = current_text.trim();
                if !strip_placeholders(text).trim().is_empty() {
                    paragraphs.push(Paragraph {
                        text: text.to_string(),
                        indent_level: current_indent.indent_level(),
                        first_line_indent: current_indent.first_line_indent(),
                    });
                }
            }
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if in_paragraph && e.name().as_ref() == b"w:ind" =>
            {
                current_indent = RawIndent::from_element(&e);
            }
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if in_paragraph && e.name().as_ref() == b"w:footnoteReference" =>
            {
                if let Some(id) = attribute_value(&e, b"w:id") {
                    current_text.push_str(&placeholder_for(&format!("{lang}:{id}")));
                }
            }
            Ok(Event::Start(e)) if in_paragraph && e.name().as_ref() == b"w:t" => {
                in_text_run = true;
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"w:t" => {
                in_text_run = false;
            }
            Ok(Event::Text(e)) if in_text_run => {
                current_text.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::Empty(e)) if in_paragraph && e.name().as_ref() == b"w:br" => {
                current_text.push('\n');
            }
            Ok(Event::Empty(e)) if in_paragraph && e.name().as_ref() == b"w:tab" => {
                current_text.push(' ');
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e).context("malformed document body XML"),
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Parse the footnotes XML part into a map keyed `"{lang}:{id}"`.
///
/// Separator and continuation-separator pseudo-footnotes are excluded.
pub(crate) fn extract_footnotes(footnotes_xml: &str, lang: &str) -> Result<FootnoteMap> {
    let mut reader = Reader::from_str(footnotes_xml);
    reader.config_mut().trim_text(false);

    let mut notes = FootnoteMap::new();
    let mut current_id: Option<String> = None;
    let mut current_text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:footnote" => {
                let kind = attribute_value(&e, b"w:type").unwrap_or_default();
                if kind == "separator" || kind == "continuationSeparator" {
                    current_id = None;
                } else {
                    current_id = attribute_value(&e, b"w:id");
                    current_text.clear();
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"w:footnote" => {
                if let Some(id) = current_id.take() {
                    notes.insert(format!("{lang}:{id}"), current_text.trim().to_string());
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"w:p" && current_id.is_some() => {
                // Multi-paragraph footnote bodies flow into one line.
                current_text.push(' ');
            }
            Ok(Event::Start(e)) if current_id.is_some() && e.name().as_ref() == b"w:t" => {
                in_text_run = true;
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"w:t" => {
                in_text_run = false;
            }
            Ok(Event::Text(e)) if in_text_run => {
                current_text.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e).context("malformed footnotes XML"),
            _ => {}
        }
    }

    Ok(notes)
}

fn attribute_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}
