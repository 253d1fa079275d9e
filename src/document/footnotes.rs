//! Footnote placeholders and word anchoring
//!
//! During extraction every footnote reference mark is replaced in-place by
//! an inert placeholder carrying its language-namespaced id. The delimiters
//! are private-use-area characters: they never occur in prose, they are not
//! regex metacharacters, and the digits of the id never touch whitespace, so
//! the verse tokenizer cannot mistake them for verse numbers. This is the
//! same trick the surrounding passes rely on: placeholders survive
//! classification and verse splitting untouched, then get resolved here.

use once_cell::sync::Lazy;
use regex::Regex;

use super::models::{Footnote, FootnoteMap};

/// Opens a footnote placeholder. U+E000, private use area.
pub const PLACEHOLDER_OPEN: char = '\u{e000}';
/// Closes a footnote placeholder. U+E001, private use area.
pub const PLACEHOLDER_CLOSE: char = '\u{e001}';

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new("\u{e000}([^\u{e001}]*)\u{e001}").unwrap());

/// Build the inline placeholder for a namespaced footnote key (`"eng:4"`).
pub fn placeholder_for(key: &str) -> String {
    format!("{PLACEHOLDER_OPEN}{key}{PLACEHOLDER_CLOSE}")
}

/// Remove every footnote placeholder, leaving the visible text only.
pub fn strip_placeholders(text: &str) -> String {
    PLACEHOLDER.replace_all(text, "").into_owned()
}

/// Resolve a verse's placeholders against the footnote map.
///
/// Returns the clean verse text (placeholders removed, whitespace runs
/// collapsed to single spaces, ends trimmed) together with the footnotes
/// anchored to 1-based word positions. A placeholder whose key is missing
/// from the map, or whose mapped body is empty, is dropped silently.
pub fn anchor_footnotes(raw: &str, notes: &FootnoteMap) -> (String, Vec<Footnote>) {
    let mut clean = String::with_capacity(raw.len());
    // (byte offset into `clean` where the mark sat, key, body)
    let mut marks: Vec<(usize, String, String)> = Vec::new();

    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(raw) {
        let m = caps.get(0).unwrap();
        clean.push_str(&raw[last..m.start()]);
        let key = &caps[1];
        if let Some(body) = notes.get(key) {
            let body = body.trim();
            if !body.is_empty() {
                marks.push((clean.len(), key.to_string(), body.to_string()));
            }
        }
        last = m.end();
    }
    clean.push_str(&raw[last..]);

    let footnotes = marks
        .into_iter()
        .map(|(offset, id, text)| {
            // Words strictly before the mark; split_whitespace ignores the
            // leading whitespace the final trim removes.
            let words_before = clean[..offset].split_whitespace().count();
            Footnote {
                id,
                text,
                anchor_word: words_before.max(1),
            }
        })
        .collect();

    let normalized = clean.split_whitespace().collect::<Vec<_>>().join(" ");
    (normalized, footnotes)
}
