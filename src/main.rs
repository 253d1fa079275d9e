//! Command-line entry point for the bilingual import.
//!
//! One invocation is a full, idempotent rebuild: both editions are parsed
//! from scratch and every merged book is rewritten. Relative input/output
//! paths resolve against the executable's own directory so the tool can sit
//! next to its source documents.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::{Path, PathBuf};

use verseweave::document::{load_document, merge_books, write_book_json};

const DEFAULT_ARMENIAN: &str = "Krapar Asdvadzashouche Ashkharaparov.docx";
const DEFAULT_ENGLISH: &str = "The Classical Armenian Bible in English.docx";
const DEFAULT_OUTPUT: &str = "data";

#[derive(Parser)]
#[command(
    name = "verseweave",
    version,
    about = "Import two parallel-language scripture .docx files into per-book JSON"
)]
struct Cli {
    /// Armenian edition (.docx)
    #[arg(long, default_value = DEFAULT_ARMENIAN)]
    armenian: PathBuf,

    /// English edition (.docx)
    #[arg(long, default_value = DEFAULT_ENGLISH)]
    english: PathBuf,

    /// Output directory for the merged book JSON files
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let base = tool_dir()?;
    let armenian = resolve(&base, &cli.armenian);
    let english = resolve(&base, &cli.english);
    let output = resolve(&base, &cli.output);

    for path in [&armenian, &english] {
        if !path.exists() {
            bail!("input document not found: {}", path.display());
        }
    }

    println!("Parsing Armenian document...");
    let arm = load_document(&armenian, "arm")?;
    println!("  {} sections (before filtering)", arm.books.len());

    println!("Parsing English document...");
    let eng = load_document(&english, "eng")?;
    println!("  {} sections (before filtering)", eng.books.len());

    // The per-language prefixes keep the merged key space collision-free.
    let mut notes = arm.footnotes;
    notes.extend(eng.footnotes);

    println!("Merging and writing JSON files...");
    let outcome = merge_books(arm.books, eng.books, &notes);
    if outcome.count_mismatch() {
        eprintln!(
            "warning: book count mismatch: Armenian={}, English={}; merging first {}",
            outcome.armenian_count,
            outcome.english_count,
            outcome.books.len()
        );
    }

    for book in &outcome.books {
        let path = write_book_json(&output, book)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!(
            "  {} -> {} ({} chapters, {} verses, {} footnotes)",
            book.name.english,
            file_name,
            book.chapters.len(),
            book.verse_count(),
            book.footnote_count()
        );
    }

    println!(
        "Done: {} books written to {}",
        outcome.books.len(),
        output.display()
    );
    Ok(())
}

/// Directory the running executable lives in.
fn tool_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("failed to locate the running executable")?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
