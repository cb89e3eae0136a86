//! Markdown corpus parsing.
//!
//! The corpus is a single markdown file where each book is a block starting
//! with `## Title: <exact title>` followed by the summary text. The title
//! line is the authoritative lookup key for the whole system, so it is kept
//! verbatim apart from surrounding-whitespace trimming.

use std::collections::HashSet;
use std::path::Path;

use regex::Regex;

use crate::error::CorpusError;

/// A catalogued book: exact title plus its full summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub summary: String,
}

/// Parse the corpus markdown into books.
///
/// Blocks without a title or without summary text are skipped; duplicate
/// titles are an error because titles are unique exact-match keys.
pub fn parse_corpus(md: &str) -> Result<Vec<Book>, CorpusError> {
    // Split on heading lines; the regex crate anchors ^ per line with (?m).
    let splitter = Regex::new(r"(?m)^## Title:[ \t]*").expect("static regex");

    let mut books = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for block in splitter.split(md) {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }
        let mut lines = block.lines();
        let title = match lines.next() {
            Some(line) => line.trim().to_string(),
            None => continue,
        };
        if title.is_empty() {
            continue;
        }
        let summary = lines.collect::<Vec<_>>().join("\n").trim().to_string();
        if summary.is_empty() {
            continue;
        }
        if !seen.insert(title.clone()) {
            return Err(CorpusError::DuplicateTitle { title });
        }
        books.push(Book { title, summary });
    }

    if books.is_empty() {
        return Err(CorpusError::Empty);
    }
    Ok(books)
}

/// Read and parse a corpus file.
pub fn load_corpus(path: &Path) -> Result<Vec<Book>, CorpusError> {
    let md = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_corpus(&md)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Book Summaries

## Title: 1984
A dystopia of total surveillance.
Winston rebels, briefly.

## Title: The Hobbit
Bilbo goes there and back again.
";

    #[test]
    fn parses_titles_and_summaries() {
        let books = parse_corpus(SAMPLE).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "1984");
        assert!(books[0].summary.contains("surveillance"));
        assert!(books[0].summary.contains("rebels"));
        assert_eq!(books[1].title, "The Hobbit");
    }

    #[test]
    fn preamble_before_first_heading_is_ignored() {
        let books = parse_corpus(SAMPLE).unwrap();
        assert!(!books.iter().any(|b| b.title.contains("Book Summaries")));
    }

    #[test]
    fn title_whitespace_is_trimmed() {
        let books = parse_corpus("## Title:   Dune   \nSpice and sand.\n").unwrap();
        assert_eq!(books[0].title, "Dune");
    }

    #[test]
    fn block_without_summary_is_skipped() {
        let err = parse_corpus("## Title: Orphan\n").unwrap_err();
        assert!(matches!(err, CorpusError::Empty));
    }

    #[test]
    fn duplicate_title_is_rejected() {
        let md = "## Title: 1984\nfirst\n\n## Title: 1984\nsecond\n";
        let err = parse_corpus(md).unwrap_err();
        assert!(matches!(err, CorpusError::DuplicateTitle { title } if title == "1984"));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(parse_corpus(""), Err(CorpusError::Empty)));
    }
}
