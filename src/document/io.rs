//! Archive I/O and output writing
//!
//! Validates and reads the .docx zip container and writes the merged book
//! trees as pretty-printed JSON files.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use zip::ZipArchive;

use super::models::MergedBook;

/// Structured failures for the archive layer. Anything else (corrupt zip,
/// filesystem errors) propagates as-is.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("{}: expected a .docx archive, found extension {extension:?}", path.display())]
    NotDocx { path: PathBuf, extension: String },

    #[error("{}: missing word/document.xml; not a Word document or corrupted", path.display())]
    MissingBodyPart { path: PathBuf },
}

/// Check the extension and open the archive for reading.
pub(crate) fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_string();
    if extension != "docx" {
        return Err(ArchiveError::NotDocx {
            path: path.to_path_buf(),
            extension,
        }
        .into());
    }

    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    ZipArchive::new(file).with_context(|| format!("{}: not a valid zip archive", path.display()))
}

/// Read a named XML part from the archive. `None` when the part is absent.
pub(crate) fn read_part(archive: &mut ZipArchive<File>, name: &str) -> Result<Option<String>> {
    let mut part = match archive.by_name(name) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e).with_context(|| format!("failed to read {name}")),
    };
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .with_context(|| format!("failed to read {name}"))?;
    Ok(Some(xml))
}

/// Write one merged book as `{id}.json` under the output directory.
pub fn write_book_json(output_dir: &Path, book: &MergedBook) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let path = output_dir.join(format!("{}.json", book.id));
    let mut json = serde_json::to_string_pretty(book)?;
    json.push('\n');
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::models::{BookName, MergedChapter};
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn scratch_docx(dir: &Path, name: &str, parts: &[(&str, &str)]) -> PathBuf {
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

    #[test]
    fn test_rejects_wrong_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("document.xlsx");
        std::fs::write(&path, b"not a docx").unwrap();

        let err = open_archive(&path).unwrap_err();
        assert!(err.to_string().contains("expected a .docx archive"));
    }

    #[test]
    fn test_missing_part_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = scratch_docx(dir.path(), "empty.docx", &[("word/document.xml", "<w:document/>")]);

        let mut archive = open_archive(&path).unwrap();
        assert!(read_part(&mut archive, "word/footnotes.xml").unwrap().is_none());
        assert!(read_part(&mut archive, "word/document.xml").unwrap().is_some());
    }

    #[test]
    fn test_write_book_json_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let book = MergedBook {
            id: "genesis".to_string(),
            name: BookName {
                english: "Genesis".to_string(),
                armenian: "ԾՆՆԴՈՑ".to_string(),
                classical: String::new(),
            },
            chapters: vec![MergedChapter {
                number: 1,
                content: Vec::new(),
            }],
        };

        let path = write_book_json(dir.path(), &book).unwrap();
        assert_eq!(path.file_name().unwrap(), "genesis.json");

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: MergedBook = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, book);
    }
}
