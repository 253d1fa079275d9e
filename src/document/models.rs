//! Core data structures for the import pipeline
//!
//! This module defines the intermediate types produced by each pipeline
//! stage (paragraphs, classified events, per-language book structures) and
//! the serde types for the merged bilingual output tree.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Footnote id -> body text, keyed `"{lang}:{id}"` so the two language
/// editions can share one map without collisions.
pub type FootnoteMap = HashMap<String, String>;

/// Chapter number -> chapter data for a single book in a single language.
pub type BookChapters = BTreeMap<u32, ChapterData>;

/// One source paragraph as extracted from the document body.
///
/// The text may embed footnote placeholders (see [`crate::document::footnotes`]);
/// indent metadata is absent rather than zero when the paragraph carries none.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    pub indent_level: Option<u32>,
    pub first_line_indent: Option<f64>,
}

/// A paragraph classified for structural parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A standalone 1-3 digit paragraph marking a chapter start.
    Chapter(u32),
    /// An all-uppercase paragraph, placeholder-stripped.
    Heading(String),
    /// Ordinary verse text, placeholders intact.
    Text {
        text: String,
        indent_level: Option<u32>,
        first_line_indent: Option<f64>,
    },
}

/// Raw verse text plus layout hints, prior to footnote anchoring.
///
/// `first_line_indent` is only set on the first verse of a source paragraph;
/// continuation verses in the same paragraph never carry it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersePayload {
    pub text: String,
    pub indent_level: Option<u32>,
    pub first_line_indent: Option<f64>,
}

/// Headings and verses for one chapter in a single language.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChapterData {
    /// `(anchor verse number, heading text)` in document order.
    pub headings: Vec<(u32, String)>,
    pub verses: BTreeMap<u32, VersePayload>,
}

/// One detected book in a single-language document.
#[derive(Debug, Clone, PartialEq)]
pub struct BookEntry {
    pub name: String,
    pub chapters: BookChapters,
}

/// A footnote resolved against the footnote map and anchored to a word.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Footnote {
    pub id: String,
    pub text: String,
    /// 1-based word index in the clean verse text.
    #[serde(rename = "anchorWord")]
    pub anchor_word: usize,
}

/// Per-language footnote lists on a merged verse. `classical` is reserved
/// for a third edition this pipeline does not produce.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VerseFootnotes {
    pub armenian: Vec<Footnote>,
    pub english: Vec<Footnote>,
    pub classical: Vec<Footnote>,
}

/// One entry in a merged chapter's content sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentItem {
    Heading {
        armenian: String,
        english: String,
        classical: String,
    },
    Verse {
        number: u32,
        armenian: String,
        english: String,
        classical: String,
        footnotes: VerseFootnotes,
        #[serde(rename = "indentLevel", skip_serializing_if = "Option::is_none")]
        indent_level: Option<u32>,
        #[serde(rename = "firstLineIndent", skip_serializing_if = "Option::is_none")]
        first_line_indent: Option<f64>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookName {
    pub english: String,
    pub armenian: String,
    pub classical: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MergedChapter {
    pub number: u32,
    pub content: Vec<ContentItem>,
}

/// The complete merged tree for one book, written as `{id}.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MergedBook {
    pub id: String,
    pub name: BookName,
    pub chapters: Vec<MergedChapter>,
}

impl MergedBook {
    /// Number of verse items across all chapters.
    pub fn verse_count(&self) -> usize {
        self.chapters
            .iter()
            .flat_map(|ch| ch.content.iter())
            .filter(|item| matches!(item, ContentItem::Verse { .. }))
            .count()
    }

    /// Number of anchored footnotes across all verses and languages.
    pub fn footnote_count(&self) -> usize {
        self.chapters
            .iter()
            .flat_map(|ch| ch.content.iter())
            .map(|item| match item {
                ContentItem::Verse { footnotes, .. } => {
                    footnotes.armenian.len() + footnotes.english.len() + footnotes.classical.len()
                }
                ContentItem::Heading { .. } => 0,
            })
            .sum()
    }
}
