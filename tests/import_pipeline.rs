//! End-to-end pipeline tests over synthesized .docx archives.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use verseweave::document::{
    ContentItem, FootnoteMap, load_document, merge_books, write_book_json,
};
use zip::write::SimpleFileOptions;

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn para(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
}

fn document_xml(paragraphs: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}"><w:body>{}</w:body></w:document>"#,
        paragraphs.concat()
    )
}

fn footnotes_xml(notes: &[(u32, &str)]) -> String {
    let bodies: String = notes
        .iter()
        .map(|(id, text)| {
            format!(
                r#"<w:footnote w:id="{id}"><w:p><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p></w:footnote>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:footnotes xmlns:w="{W_NS}">
<w:footnote w:type="separator" w:id="-1"><w:p><w:r><w:separator/></w:r></w:p></w:footnote>
<w:footnote w:type="continuationSeparator" w:id="0"><w:p><w:r><w:continuationSeparator/></w:r></w:p></w:footnote>
{bodies}</w:footnotes>"#
    )
}

fn write_docx(dir: &Path, name: &str, parts: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for (part_name, content) in parts {
        writer
            .start_file(*part_name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
    path
}

/// English edition: Genesis (two chapters, one footnote, one section
/// heading), Exodus, and a placeholder appendix that the content filter
/// must drop.
fn english_docx(dir: &Path) -> PathBuf {
    let body = document_xml(&[
        para("GENESIS"),
        para("1"),
        // footnote reference embedded mid-verse
        r#"<w:p><w:r><w:t xml:space="preserve">1 In the beginning</w:t></w:r><w:r><w:footnoteReference w:id="1"/></w:r><w:r><w:t xml:space="preserve"> God created 2 and the earth was without form</w:t></w:r></w:p>"#.to_string(),
        para("THE FIRST DAY"),
        para("3 and God said let there be light"),
        para("2"),
        para("1 thus the heavens and the earth were finished"),
        para("EXODUS"),
        para("1"),
        para("1 these are the names of the sons"),
        para("APPENDIX"),
        para("1"),
        para("1 short"),
    ]);
    let notes = footnotes_xml(&[(1, "Or: by wisdom")]);
    write_docx(
        dir,
        "english.docx",
        &[
            ("word/document.xml", body.as_str()),
            ("word/footnotes.xml", notes.as_str()),
        ],
    )
}

/// Armenian edition: same two books, a footnote reference but *no*
/// footnotes part (the reference must be dropped silently).
fn armenian_docx(dir: &Path) -> PathBuf {
    let body = document_xml(&[
        para("ԾՆՆԴՈՑ"),
        para("1"),
        r#"<w:p><w:r><w:t xml:space="preserve">1 Ի սկզբանէ</w:t></w:r><w:r><w:footnoteReference w:id="2"/></w:r><w:r><w:t xml:space="preserve"> ստեղծեց Աստուած 2 եւ երկիրն էր անձեւ եւ ունայն</w:t></w:r></w:p>"#.to_string(),
        para("ԱՌԱՋԻՆ ՕՐԸ"),
        para("3 եւ ասաց Աստուած լոյս լիցի"),
        para("2"),
        para("1 եւ կատարեցան երկինք եւ երկիր"),
        para("ԵԼՔ"),
        para("1"),
        para("1 այս են անուանք որդւոցն Իսրայելի"),
    ]);
    write_docx(dir, "armenian.docx", &[("word/document.xml", body.as_str())])
}

fn run_pipeline(dir: &Path, output: &Path) -> Vec<verseweave::document::MergedBook> {
    let arm = load_document(&armenian_docx(dir), "arm").unwrap();
    let eng = load_document(&english_docx(dir), "eng").unwrap();

    let mut notes: FootnoteMap = arm.footnotes;
    notes.extend(eng.footnotes);

    let outcome = merge_books(arm.books, eng.books, &notes);
    for book in &outcome.books {
        write_book_json(output, book).unwrap();
    }
    outcome.books
}

#[test]
fn test_two_books_detected_and_merged() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("data");
    let books = run_pipeline(dir.path(), &output);

    assert_eq!(books.len(), 2);
    assert_eq!(books[0].id, "genesis");
    assert_eq!(books[0].name.english, "Genesis");
    assert_eq!(books[0].name.armenian, "ԾՆՆԴՈՑ");
    assert_eq!(books[0].name.classical, "");
    assert_eq!(books[1].id, "exodus");

    let chapter_numbers: Vec<u32> = books[0].chapters.iter().map(|ch| ch.number).collect();
    assert_eq!(chapter_numbers, vec![1, 2]);
}

#[test]
fn test_heading_interleaved_before_anchor_verse() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("data");
    let books = run_pipeline(dir.path(), &output);

    let content = &books[0].chapters[0].content;
    assert!(matches!(content[0], ContentItem::Verse { number: 1, .. }));
    assert!(matches!(content[1], ContentItem::Verse { number: 2, .. }));
    match &content[2] {
        ContentItem::Heading {
            armenian, english, ..
        } => {
            assert_eq!(english, "THE FIRST DAY");
            assert_eq!(armenian, "ԱՌԱՋԻՆ ՕՐԸ");
        }
        other => panic!("expected heading, got {other:?}"),
    }
    assert!(matches!(content[3], ContentItem::Verse { number: 3, .. }));
}

#[test]
fn test_footnote_round_trip_and_missing_map_entry() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("data");
    let books = run_pipeline(dir.path(), &output);

    match &books[0].chapters[0].content[0] {
        ContentItem::Verse {
            armenian,
            english,
            footnotes,
            ..
        } => {
            // placeholder removed, whitespace collapsed
            assert_eq!(english, "In the beginning God created");
            assert_eq!(footnotes.english.len(), 1);
            assert_eq!(footnotes.english[0].id, "eng:1");
            assert_eq!(footnotes.english[0].text, "Or: by wisdom");
            assert_eq!(footnotes.english[0].anchor_word, 3);

            // the Armenian archive has no footnotes part: the reference
            // resolves to nothing and is dropped, text stays clean
            assert_eq!(armenian, "Ի սկզբանէ ստեղծեց Աստուած");
            assert!(footnotes.armenian.is_empty());
            assert!(footnotes.classical.is_empty());
        }
        other => panic!("expected verse, got {other:?}"),
    }
}

#[test]
fn test_verse_numbers_strictly_increasing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("data");
    let books = run_pipeline(dir.path(), &output);

    for book in &books {
        for chapter in &book.chapters {
            let numbers: Vec<u32> = chapter
                .content
                .iter()
                .filter_map(|item| match item {
                    ContentItem::Verse { number, .. } => Some(*number),
                    ContentItem::Heading { .. } => None,
                })
                .collect();
            for pair in numbers.windows(2) {
                assert!(pair[0] < pair[1], "verse order violated in {}", book.id);
            }
        }
    }
}

#[test]
fn test_anchor_words_within_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("data");
    let books = run_pipeline(dir.path(), &output);

    for book in &books {
        for chapter in &book.chapters {
            for item in &chapter.content {
                let ContentItem::Verse {
                    armenian,
                    english,
                    footnotes,
                    ..
                } = item
                else {
                    continue;
                };
                for (text, notes) in [
                    (armenian, &footnotes.armenian),
                    (english, &footnotes.english),
                ] {
                    let word_count = text.split_whitespace().count();
                    for note in notes {
                        assert!(note.anchor_word >= 1);
                        assert!(note.anchor_word <= word_count + 1);
                    }
                }
            }
        }
    }
}

#[test]
fn test_content_filter_drops_placeholder_book() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("data");
    let books = run_pipeline(dir.path(), &output);

    assert!(books.iter().all(|book| book.id != "appendix"));
    assert!(output.join("genesis.json").exists());
    assert!(output.join("exodus.json").exists());
    assert!(!output.join("appendix.json").exists());
}

#[test]
fn test_idempotent_output() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    run_pipeline(dir.path(), &first);
    run_pipeline(dir.path(), &second);

    for name in ["genesis.json", "exodus.json"] {
        let a = std::fs::read(first.join(name)).unwrap();
        let b = std::fs::read(second.join(name)).unwrap();
        assert_eq!(a, b, "{name} differs between runs");
    }
}

#[test]
fn test_output_json_schema() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("data");
    run_pipeline(dir.path(), &output);

    let raw = std::fs::read_to_string(output.join("genesis.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value["id"], "genesis");
    assert_eq!(value["name"]["english"], "Genesis");
    assert_eq!(value["name"]["classical"], "");
    assert_eq!(value["chapters"][0]["number"], 1);

    let first = &value["chapters"][0]["content"][0];
    assert_eq!(first["kind"], "verse");
    assert_eq!(first["number"], 1);
    assert_eq!(first["footnotes"]["english"][0]["anchorWord"], 3);
    // absent metadata is omitted, not null
    assert!(first.get("indentLevel").is_none());
    assert!(first.get("firstLineIndent").is_none());

    let heading = &value["chapters"][0]["content"][2];
    assert_eq!(heading["kind"], "heading");
    assert_eq!(heading["english"], "THE FIRST DAY");
}

#[test]
fn test_book_count_mismatch_truncates() {
    let dir = tempfile::tempdir().unwrap();

    let arm_body = document_xml(&[
        para("ԾՆՆԴՈՑ"),
        para("1"),
        para("1 բաւական երկար հատուած մը"),
    ]);
    let eng_body = document_xml(&[
        para("GENESIS"),
        para("1"),
        para("1 a long enough first verse"),
        para("EXODUS"),
        para("1"),
        para("1 a long enough second verse"),
    ]);
    let arm_path = write_docx(dir.path(), "arm.docx", &[("word/document.xml", arm_body.as_str())]);
    let eng_path = write_docx(dir.path(), "eng.docx", &[("word/document.xml", eng_body.as_str())]);

    let arm = load_document(&arm_path, "arm").unwrap();
    let eng = load_document(&eng_path, "eng").unwrap();
    let outcome = merge_books(arm.books, eng.books, &FootnoteMap::new());

    assert!(outcome.count_mismatch());
    assert_eq!(outcome.armenian_count, 1);
    assert_eq!(outcome.english_count, 2);
    assert_eq!(outcome.books.len(), 1);
    assert_eq!(outcome.books[0].id, "genesis");
}

#[test]
fn test_missing_body_part_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let notes = footnotes_xml(&[]);
    let path = write_docx(
        dir.path(),
        "broken.docx",
        &[("word/footnotes.xml", notes.as_str())],
    );

    let err = load_document(&path, "eng").unwrap_err();
    assert!(err.to_string().contains("word/document.xml"));
}

#[test]
fn test_wrong_extension_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("document.txt");
    std::fs::write(&path, "plain text").unwrap();

    assert!(load_document(&path, "eng").is_err());
}
