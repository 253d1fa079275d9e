//! Verse tokenization
//!
//! Splits a text paragraph into `(verse number, verse text)` pairs on runs
//! of 1-3 digits followed by whitespace. Digit matches are only trusted
//! when they continue the running verse count (small forward gaps allowed);
//! anything else is a quantity embedded in prose and is merged back into
//! the preceding verse.

use once_cell::sync::Lazy;
use regex::Regex;

/// Largest forward jump a candidate verse number may make past the expected
/// number before it is treated as a false positive.
const MAX_VERSE_GAP: u32 = 5;

static VERSE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,3})\s+").unwrap());

/// Split one paragraph into verses. Text before the first verse number is
/// discarded; footnote placeholders pass through untouched.
pub fn split_verses(text: &str) -> Vec<(u32, String)> {
    let text = text.trim();

    // (digits as matched, start of the following text segment)
    let matches: Vec<(&str, usize, usize)> = VERSE_NUMBER
        .captures_iter(text)
        .map(|caps| {
            let whole = caps.get(0).unwrap();
            let digits = caps.get(1).unwrap();
            (digits.as_str(), whole.start(), whole.end())
        })
        .collect();

    let mut verses: Vec<(u32, String)> = Vec::new();
    let mut expected: Option<u32> = None;

    for (i, &(digits, _, body_start)) in matches.iter().enumerate() {
        let body_end = matches
            .get(i + 1)
            .map(|&(_, next_start, _)| next_start)
            .unwrap_or(text.len());
        let body = text[body_start..body_end].trim();

        let number: u32 = match digits.parse() {
            Ok(n) => n,
            Err(_) => continue, // 1-3 digits always fit in u32
        };

        let accepted = match expected {
            None => true,
            Some(exp) => number >= exp && number <= exp + MAX_VERSE_GAP,
        };

        if accepted {
            verses.push((number, body.to_string()));
            expected = Some(number + 1);
        } else if let Some((_, prev_body)) = verses.last_mut() {
            // False positive: fold the digits and their text back into the
            // previous verse, one space between fragments.
            if !prev_body.is_empty() {
                prev_body.push(' ');
            }
            prev_body.push_str(digits);
            if !body.is_empty() {
                prev_body.push(' ');
                prev_body.push_str(body);
            }
        } else {
            // Nothing to merge into; keep the data and reseed the counter.
            verses.push((number, body.to_string()));
            expected = Some(number + 1);
        }
    }

    verses
}
