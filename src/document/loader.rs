//! Document loading and orchestration
//!
//! `load_document()` runs the single-language half of the pipeline: open
//! and validate the archive, extract paragraphs and footnotes, classify,
//! and parse the book structure. The whole paragraph sequence is
//! materialized before structural parsing; book-boundary detection and
//! verse-gap tolerance both need the full stream.

use anyhow::{Context, Result};
use std::path::Path;

use super::io::{ArchiveError, open_archive, read_part};
use super::models::{BookEntry, FootnoteMap};
use super::parsing::books::parse_books;
use super::parsing::classify::paragraphs_to_events;
use super::parsing::extract::{extract_footnotes, extract_paragraphs};

/// One language edition, structurally parsed.
#[derive(Debug)]
pub struct ParsedDocument {
    pub books: Vec<BookEntry>,
    /// Keyed `"{lang}:{id}"`; empty when the archive has no footnotes part.
    pub footnotes: FootnoteMap,
}

/// Parse a single-language .docx archive into books plus its footnote map.
///
/// `lang_prefix` namespaces the footnote keys (e.g. `"arm"`, `"eng"`) so the
/// two editions' maps can later be merged without collisions. A missing
/// document body is fatal; a missing footnotes part yields an empty map.
pub fn load_document(path: &Path, lang_prefix: &str) -> Result<ParsedDocument> {
    let mut archive = open_archive(path)?;

    let body = read_part(&mut archive, "word/document.xml")?.ok_or_else(|| {
        ArchiveError::MissingBodyPart {
            path: path.to_path_buf(),
        }
    })?;
    let footnotes_xml = read_part(&mut archive, "word/footnotes.xml")?;

    let paragraphs = extract_paragraphs(&body, lang_prefix)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let footnotes = match footnotes_xml {
        Some(xml) => extract_footnotes(&xml, lang_prefix)
            .with_context(|| format!("failed to parse footnotes in {}", path.display()))?,
        None => FootnoteMap::new(),
    };

    let events = paragraphs_to_events(&paragraphs);
    let books = parse_books(&events);

    Ok(ParsedDocument { books, footnotes })
}
