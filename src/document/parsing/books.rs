//! Multi-book structural parsing
//!
//! Consumes the classified event stream and reconstructs books, chapters,
//! headings, and verses. A book boundary is a heading immediately followed
//! by a chapter marker whose number restarts (is not above the highest
//! chapter seen so far); editions under import open every book with an
//! all-caps title followed by "1". Relying on the numeric restart rather
//! than heading formatting alone handles books whose first heading is a
//! generic section title.

use super::super::models::{BookChapters, BookEntry, Event, VersePayload};
use super::verses::split_verses;

/// Per-book parser state, reset at every detected book boundary.
#[derive(Debug, Default)]
struct BookState {
    name: String,
    chapters: BookChapters,
    current_chapter: Option<u32>,
    max_chapter: u32,
    last_verse: u32,
}

impl BookState {
    /// Commit the in-progress book if it has a name or any chapters, and
    /// reset all per-book state.
    fn commit_into(&mut self, books: &mut Vec<BookEntry>) {
        if !self.name.is_empty() || !self.chapters.is_empty() {
            books.push(BookEntry {
                name: std::mem::take(&mut self.name),
                chapters: std::mem::take(&mut self.chapters),
            });
        }
        self.current_chapter = None;
        self.max_chapter = 0;
        self.last_verse = 0;
    }
}

/// Parse the full event sequence into a list of books.
pub fn parse_books(events: &[Event]) -> Vec<BookEntry> {
    let mut books = Vec::new();
    let mut state = BookState::default();

    for (i, event) in events.iter().enumerate() {
        match event {
            Event::Heading(text) => {
                let starts_book = match events.get(i + 1) {
                    Some(Event::Chapter(next)) => {
                        state.name.is_empty() || *next <= state.max_chapter
                    }
                    _ => false,
                };
                if starts_book {
                    state.commit_into(&mut books);
                    state.name = text.clone();
                } else if let Some(chapter) = state.current_chapter {
                    // In-chapter section heading, anchored just past the
                    // last verse so it lands before the next one.
                    let entry = state.chapters.entry(chapter).or_default();
                    entry.headings.push((state.last_verse + 1, text.clone()));
                }
                // A heading before any chapter that opens no book is dropped.
            }
            Event::Chapter(number) => {
                state.current_chapter = Some(*number);
                state.max_chapter = state.max_chapter.max(*number);
                state.chapters.entry(*number).or_default();
                state.last_verse = 0;
            }
            Event::Text {
                text,
                indent_level,
                first_line_indent,
            } => {
                let Some(chapter) = state.current_chapter else {
                    continue; // text before any chapter marker
                };
                let entry = state.chapters.entry(chapter).or_default();
                for (idx, (number, verse_text)) in split_verses(text).into_iter().enumerate() {
                    entry.verses.insert(
                        number,
                        VersePayload {
                            text: verse_text,
                            indent_level: *indent_level,
                            // only the paragraph's first verse carries it
                            first_line_indent: if idx == 0 { *first_line_indent } else { None },
                        },
                    );
                    state.last_verse = number;
                }
            }
        }
    }

    state.commit_into(&mut books);
    books
}
