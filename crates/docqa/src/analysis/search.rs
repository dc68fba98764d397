//! Literal, case-insensitive text search

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};

/// One occurrence of a search term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// Character offset of the first matched character
    pub start: usize,
    /// Character offset one past the last matched character
    pub end: usize,
    /// Matched text as it appears in the corpus
    pub text: String,
}

/// Find every non-overlapping occurrence of `term` in `corpus`, ignoring case.
///
/// The term is matched literally. Offsets count characters, not bytes.
pub fn literal_search(term: &str, corpus: &str) -> Vec<SearchMatch> {
    if term.is_empty() {
        return Vec::new();
    }

    let re = match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!("Search term could not be compiled: {}", e);
            return Vec::new();
        }
    };

    let mut matches = Vec::new();
    let mut byte_cursor = 0;
    let mut char_cursor = 0;

    for m in re.find_iter(corpus) {
        char_cursor += corpus[byte_cursor..m.start()].chars().count();
        let len = m.as_str().chars().count();
        matches.push(SearchMatch {
            start: char_cursor,
            end: char_cursor + len,
            text: m.as_str().to_string(),
        });
        char_cursor += len;
        byte_cursor = m.end();
    }

    matches
}
