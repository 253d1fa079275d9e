//! Document parsing and data structures module
//!
//! This module turns bilingual scripture .docx archives into a merged,
//! verse-aligned document tree: extraction, classification, structural
//! parsing, footnote anchoring, and the cross-language merge.

pub mod footnotes;
pub(crate) mod io;
pub mod loader;
pub mod merge;
pub mod models;
pub(crate) mod parsing;

pub use io::{ArchiveError, write_book_json};
pub use loader::{ParsedDocument, load_document};
pub use merge::{MergeOutcome, merge_books};
pub use models::*;
