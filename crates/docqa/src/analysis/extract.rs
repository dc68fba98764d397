//! Candidate extraction from the corpus

use std::collections::HashSet;

use super::category::Category;
use super::patterns::PatternTable;

/// Extract candidates for a category using the built-in pattern table
pub fn extract(category: Category, corpus: &str) -> Vec<String> {
    extract_with(PatternTable::builtin(), category, corpus)
}

/// Extract candidates for a category using a custom pattern table.
///
/// Patterns run in table order and each contributes all of its non-overlapping
/// matches in corpus order. Fragments are trimmed and dropped when they are one
/// character or shorter. The result is deduplicated keeping first occurrences.
pub fn extract_with(table: &PatternTable, category: Category, corpus: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    for pattern in table.patterns(category) {
        for caps in pattern.regex.captures_iter(corpus) {
            let fragment = caps
                .get(pattern.capture_group)
                .map(|m| m.as_str().trim())
                .unwrap_or("");
            if fragment.chars().count() > 1 {
                candidates.push(fragment.to_string());
            }
        }
    }

    let mut seen = HashSet::new();
    candidates.retain(|c| seen.insert(c.clone()));

    tracing::debug!("Extracted {} {} candidates", candidates.len(), category);
    candidates
}
