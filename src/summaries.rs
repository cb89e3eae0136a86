//! Exact-title summary store backing the lookup tool.
//!
//! The store is the authoritative title → full-summary map. Lookups trim
//! surrounding whitespace and nothing else: no case folding, no fuzzy
//! matching. The LLM-facing entry point ([`SummaryStore::tool_result`])
//! always returns text, never an error, because its output is fed back into
//! a conversation as a plain tool-result message.

use std::collections::HashMap;

use crate::corpus::Book;

/// Sentinel returned to the model when a title has no exact match.
pub const NOT_FOUND_TEXT: &str = "No detailed summary found for that exact title.";

/// Sentinel returned when the tool arguments did not carry a usable title.
pub const INVALID_TITLE_TEXT: &str = "Invalid title. Please provide a string.";

/// Read-only exact-match map from canonical book title to full summary.
#[derive(Debug, Clone)]
pub struct SummaryStore {
    summaries: HashMap<String, String>,
}

impl SummaryStore {
    /// Build the store from parsed corpus books.
    pub fn from_books(books: &[Book]) -> Self {
        let summaries = books
            .iter()
            .map(|b| (b.title.clone(), b.summary.clone()))
            .collect();
        Self { summaries }
    }

    /// Exact-match lookup. The key is trimmed of surrounding whitespace,
    /// then must match byte-for-byte.
    pub fn get(&self, title: &str) -> Option<&str> {
        self.summaries.get(title.trim()).map(String::as_str)
    }

    /// LLM-facing lookup: always text. `None` title means the tool arguments
    /// were malformed (missing or non-string `title`).
    pub fn tool_result(&self, title: Option<&str>) -> String {
        match title {
            None => INVALID_TITLE_TEXT.to_string(),
            Some(t) => self
                .get(t)
                .map(str::to_string)
                .unwrap_or_else(|| NOT_FOUND_TEXT.to_string()),
        }
    }

    /// All titles, in corpus insertion-independent order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.summaries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SummaryStore {
        SummaryStore::from_books(&[
            Book {
                title: "1984".into(),
                summary: "Dystopia of surveillance.".into(),
            },
            Book {
                title: "The Hobbit".into(),
                summary: "There and back again.".into(),
            },
        ])
    }

    #[test]
    fn exact_match_returns_stored_text() {
        let s = store();
        assert_eq!(s.get("1984"), Some("Dystopia of surveillance."));
    }

    #[test]
    fn lookup_is_idempotent() {
        let s = store();
        assert_eq!(s.get("1984"), s.get("1984"));
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let s = store();
        assert_eq!(s.get(" 1984 "), s.get("1984"));
        assert_eq!(s.get("\t1984\n"), s.get("1984"));
    }

    #[test]
    fn near_miss_is_not_found() {
        let s = store();
        assert_eq!(s.get("1984x"), None);
        assert_eq!(s.get("the hobbit"), None); // no case folding
        assert_eq!(s.get("Hobbit"), None); // no substring match
    }

    #[test]
    fn tool_result_is_always_text() {
        let s = store();
        assert_eq!(s.tool_result(Some("1984")), "Dystopia of surveillance.");
        assert_eq!(s.tool_result(Some("No Such Book")), NOT_FOUND_TEXT);
        assert_eq!(s.tool_result(None), INVALID_TITLE_TEXT);
    }
}
