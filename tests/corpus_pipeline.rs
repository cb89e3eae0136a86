//! Corpus file → parsed books → summary store, end to end.

use std::io::Write;

use libris::corpus::load_corpus;
use libris::summaries::{SummaryStore, NOT_FOUND_TEXT};

const CORPUS: &str = "\
# Book Summaries

## Title: 1984
George Orwell's dystopian novel of total surveillance.
Winston Smith begins a doomed rebellion.

## Title: The Hobbit
Bilbo Baggins is recruited by Gandalf and a company of dwarves.

## Title: Dune
Paul Atreides navigates intrigue on the desert planet Arrakis.
";

fn write_corpus(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let path = dir.path().join("book_summaries.md");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(CORPUS.as_bytes()).unwrap();
    path
}

#[test]
fn load_parse_and_lookup_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = write_corpus(&dir);

    let books = load_corpus(&path).unwrap();
    assert_eq!(books.len(), 3);
    assert_eq!(books[0].title, "1984");
    assert_eq!(books[2].title, "Dune");

    let store = SummaryStore::from_books(&books);
    assert_eq!(store.len(), 3);

    // Exact match, trimmed key, and multi-line summary intact.
    let summary = store.get(" 1984 ").unwrap();
    assert!(summary.contains("total surveillance"));
    assert!(summary.contains("doomed rebellion"));

    // Near-miss stays a miss.
    assert_eq!(store.get("1984x"), None);
    assert_eq!(store.tool_result(Some("1984x")), NOT_FOUND_TEXT);
}

#[test]
fn missing_corpus_file_is_a_diagnostic_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("nope.md");
    let err = load_corpus(&missing).unwrap_err();
    assert!(format!("{err}").contains("corpus file not readable"));
}
