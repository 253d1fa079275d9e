//! verseweave: bilingual scripture .docx import
//!
//! This library parses two parallel-language Word documents into a single
//! verse-addressable, footnote-annotated JSON tree per book. The heavy
//! lifting is heuristic: recovering book/chapter/verse structure from flat
//! paragraph streams with no machine-readable markup, then aligning the two
//! editions verse by verse.

pub mod document;

// Re-export commonly used types
pub use document::{
    BookEntry, ContentItem, Footnote, FootnoteMap, MergeOutcome, MergedBook, ParsedDocument,
    load_document, merge_books, write_book_json,
};
