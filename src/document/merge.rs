//! Bilingual merge
//!
//! Aligns two independently-parsed book structures by verse number within
//! each chapter, interleaving headings at their anchor positions, and
//! resolves footnote placeholders per language against the shared map.
//! Books are paired positionally after filtering out placeholder books with
//! no real verse content; a count mismatch truncates to the shorter list.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;

use super::footnotes::{anchor_footnotes, strip_placeholders};
use super::models::{
    BookChapters, BookEntry, BookName, ChapterData, ContentItem, FootnoteMap, MergedBook,
    MergedChapter, VerseFootnotes, VersePayload,
};

/// Minimum trimmed length of a single verse's visible text for a book to
/// count as having real content.
const MIN_CONTENT_LEN: usize = 10;

/// First-line indents below this magnitude are omitted from merged verses.
const FIRST_LINE_EPSILON: f64 = 0.01;

static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// True if at least one verse has enough visible text to be a real book and
/// not a placeholder section.
pub fn has_real_content(chapters: &BookChapters) -> bool {
    chapters.values().any(|chapter| {
        chapter
            .verses
            .values()
            .any(|verse| strip_placeholders(&verse.text).trim().chars().count() >= MIN_CONTENT_LEN)
    })
}

/// Slug for the output filename, derived from the English book name.
pub fn make_book_id(name: &str) -> String {
    let lowered = name.to_lowercase();
    let slug = NON_SLUG.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "unknown".to_string()
    } else {
        slug.to_string()
    }
}

/// Title-case a book name: every alphabetic run starts uppercase, the rest
/// lowercased ("SONG OF SONGS" -> "Song Of Songs").
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_word_start = true;
    for c in name.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Outcome of pairing the two languages' book lists.
pub struct MergeOutcome {
    pub books: Vec<MergedBook>,
    /// Surviving book counts per language, for mismatch reporting.
    pub armenian_count: usize,
    pub english_count: usize,
}

impl MergeOutcome {
    pub fn count_mismatch(&self) -> bool {
        self.armenian_count != self.english_count
    }
}

/// Filter out contentless books, pair the rest positionally, and merge.
/// When the lists disagree in length only the common prefix is merged.
pub fn merge_books(
    armenian: Vec<BookEntry>,
    english: Vec<BookEntry>,
    notes: &FootnoteMap,
) -> MergeOutcome {
    let armenian: Vec<BookEntry> = armenian
        .into_iter()
        .filter(|book| has_real_content(&book.chapters))
        .collect();
    let english: Vec<BookEntry> = english
        .into_iter()
        .filter(|book| has_real_content(&book.chapters))
        .collect();

    let armenian_count = armenian.len();
    let english_count = english.len();

    let books = armenian
        .into_iter()
        .zip(english)
        .map(|(arm, eng)| {
            let chapters = merge_chapters(&arm.chapters, &eng.chapters, notes);
            MergedBook {
                id: make_book_id(&eng.name),
                name: BookName {
                    english: title_case(&eng.name),
                    armenian: arm.name,
                    classical: String::new(),
                },
                chapters,
            }
        })
        .collect();

    MergeOutcome {
        books,
        armenian_count,
        english_count,
    }
}

/// Merge one book's chapter data from both languages.
pub fn merge_chapters(
    armenian: &BookChapters,
    english: &BookChapters,
    notes: &FootnoteMap,
) -> Vec<MergedChapter> {
    let empty = ChapterData::default();
    let chapter_numbers: BTreeSet<u32> =
        armenian.keys().chain(english.keys()).copied().collect();

    chapter_numbers
        .into_iter()
        .map(|number| {
            let arm = armenian.get(&number).unwrap_or(&empty);
            let eng = english.get(&number).unwrap_or(&empty);
            MergedChapter {
                number,
                content: merge_chapter_content(arm, eng, notes),
            }
        })
        .collect()
}

fn merge_chapter_content(
    arm: &ChapterData,
    eng: &ChapterData,
    notes: &FootnoteMap,
) -> Vec<ContentItem> {
    let arm_headings: BTreeMap<u32, &str> = arm
        .headings
        .iter()
        .map(|(pos, text)| (*pos, text.as_str()))
        .collect();
    let eng_headings: BTreeMap<u32, &str> = eng
        .headings
        .iter()
        .map(|(pos, text)| (*pos, text.as_str()))
        .collect();
    let heading_positions: BTreeSet<u32> = arm_headings
        .keys()
        .chain(eng_headings.keys())
        .copied()
        .collect();
    let verse_numbers: BTreeSet<u32> =
        arm.verses.keys().chain(eng.verses.keys()).copied().collect();

    let heading_at = |pos: u32| ContentItem::Heading {
        armenian: arm_headings.get(&pos).unwrap_or(&"").to_string(),
        english: eng_headings.get(&pos).unwrap_or(&"").to_string(),
        classical: String::new(),
    };

    let mut content = Vec::new();
    let mut pending = heading_positions.into_iter().peekable();

    for number in verse_numbers {
        while let Some(&pos) = pending.peek() {
            if pos > number {
                break;
            }
            content.push(heading_at(pos));
            pending.next();
        }
        content.push(merge_verse(
            number,
            arm.verses.get(&number),
            eng.verses.get(&number),
            notes,
        ));
    }

    // Headings anchored past the last verse flush at the end.
    for pos in pending {
        content.push(heading_at(pos));
    }

    content
}

fn merge_verse(
    number: u32,
    arm: Option<&VersePayload>,
    eng: Option<&VersePayload>,
    notes: &FootnoteMap,
) -> ContentItem {
    let default = VersePayload::default();
    let arm = arm.unwrap_or(&default);
    let eng = eng.unwrap_or(&default);

    let (arm_text, arm_notes) = anchor_footnotes(&arm.text, notes);
    let (eng_text, eng_notes) = anchor_footnotes(&eng.text, notes);

    // Armenian wins when both sides carry layout metadata.
    let indent_level = arm.indent_level.or(eng.indent_level);
    let first_line_indent = arm
        .first_line_indent
        .or(eng.first_line_indent)
        .filter(|v| v.abs() >= FIRST_LINE_EPSILON);

    ContentItem::Verse {
        number,
        armenian: arm_text,
        english: eng_text,
        classical: String::new(),
        footnotes: VerseFootnotes {
            armenian: arm_notes,
            english: eng_notes,
            classical: Vec::new(),
        },
        indent_level,
        first_line_indent,
    }
}
