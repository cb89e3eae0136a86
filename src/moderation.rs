//! Content-safety pre-check.
//!
//! A pure, local word-boundary check that short-circuits abusive queries
//! before any paid upstream call. Deliberately simple: lowercase the text,
//! split on non-alphanumeric characters, and test each word against the
//! list. No network, no leetspeak normalization.

/// Built-in deny list. Kept short; the gate is a cost/abuse short-circuit,
/// not a content-policy engine.
const DEFAULT_WORDS: &[&str] = &[
    "fuck", "fucking", "shit", "bitch", "asshole", "bastard", "dick", "cunt", "wanker", "prick",
];

/// Profanity gate applied to raw user text before retrieval.
#[derive(Debug, Clone)]
pub struct ModerationGate {
    words: Vec<String>,
}

impl ModerationGate {
    /// Gate with the built-in word list.
    pub fn new() -> Self {
        Self::with_words(DEFAULT_WORDS.iter().map(|w| w.to_string()))
    }

    /// Gate with a custom word list (lowercased on entry).
    pub fn with_words(words: impl IntoIterator<Item = String>) -> Self {
        Self {
            words: words.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// True when any word in `text` matches the deny list.
    pub fn contains_profanity(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .any(|w| self.words.iter().any(|bad| bad == w))
    }
}

impl Default for ModerationGate {
    fn default() -> Self {
        Self::new()
    }
}
