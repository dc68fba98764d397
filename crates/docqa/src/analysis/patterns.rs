//! Extraction pattern tables
//!
//! Each category owns an ordered list of regular expressions. Patterns are compiled
//! case-insensitive and hold at most one capture group: when present, group 1 is
//! the extracted fragment, otherwise the whole match is.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use super::category::Category;

/// Built-in pattern sources, in priority order per category.
///
/// Name captures use `[A-Za-z \t]` rather than `[A-Za-z\s]` so that a capture
/// stops at the end of its line instead of swallowing the next field label.
pub const DEFAULT_PATTERNS: &[(Category, &[&str])] = &[
    (
        Category::Who,
        &[
            r"name\s*:?\s*([A-Za-z \t]+)",
            r"student\s*name\s*:?\s*([A-Za-z \t]+)",
            r"customer\s*name\s*:?\s*([A-Za-z \t]+)",
            r"([A-Z][a-z]+\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)",
            r"by\s*:?\s*([A-Za-z \t]+)",
            r"from\s*:?\s*([A-Za-z \t]+)",
        ],
    ),
    (
        Category::What,
        &[
            r"category\s*:?\s*([^:\n]+)",
            r"purpose\s*:?\s*([^:\n]+)",
            r"payment\s*purpose\s*:?\s*([^:\n]+)",
            r"reason\s*:?\s*([^:\n]+)",
            r"type\s*:?\s*([^:\n]+)",
            r"description\s*:?\s*([^:\n]+)",
        ],
    ),
    (
        Category::Amount,
        &[
            r"amount\s*:?\s*[₹$]?(\d+(?:,\d{3})*(?:\.\d{2})?)",
            r"₹\s*(\d+(?:,\d{3})*(?:\.\d{2})?)",
            r"\$\s*(\d+(?:,\d{3})*(?:\.\d{2})?)",
            r"fee\s*:?\s*[₹$]?(\d+(?:,\d{3})*(?:\.\d{2})?)",
            r"charge\s*:?\s*[₹$]?(\d+(?:,\d{3})*(?:\.\d{2})?)",
        ],
    ),
    (
        Category::Reference,
        &[
            r"reference\s*number\s*:?\s*([A-Z0-9]+)",
            r"transaction\s*id\s*:?\s*([A-Z0-9]+)",
            r"receipt\s*number\s*:?\s*([A-Z0-9]+)",
            r"student\s*id\s*:?\s*([A-Z0-9]+)",
            r"id\s*:?\s*([A-Z0-9]+)",
        ],
    ),
    (
        Category::When,
        &[
            r"date\s*:?\s*([^:\n]+)",
            r"time\s*:?\s*([^:\n]+)",
            r"(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
            r"(\d{4}[/-]\d{1,2}[/-]\d{1,2})",
        ],
    ),
];

static BUILTIN: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::compile(DEFAULT_PATTERNS).expect("built-in extraction patterns must compile")
});

/// A single compiled extraction pattern
#[derive(Debug, Clone)]
pub struct ExtractionPattern {
    /// Capture group holding the fragment (0 = whole match)
    pub capture_group: usize,
    /// Compiled, case-insensitive expression
    pub regex: Regex,
}

impl ExtractionPattern {
    /// Compile a pattern source
    pub fn compile(source: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(source).case_insensitive(true).build()?;
        // captures_len counts the implicit whole-match group
        let capture_group = if regex.captures_len() > 1 { 1 } else { 0 };
        Ok(Self {
            capture_group,
            regex,
        })
    }
}

/// Ordered extraction patterns for every category
#[derive(Debug, Clone, Default)]
pub struct PatternTable {
    entries: Vec<(Category, Vec<ExtractionPattern>)>,
}

impl PatternTable {
    /// Compile a table from pattern sources
    pub fn compile(sources: &[(Category, &[&str])]) -> Result<Self, regex::Error> {
        let mut entries = Vec::with_capacity(sources.len());
        for (category, patterns) in sources {
            let compiled = patterns
                .iter()
                .map(|p| ExtractionPattern::compile(p))
                .collect::<Result<Vec<_>, _>>()?;
            entries.push((*category, compiled));
        }
        Ok(Self { entries })
    }

    /// The built-in table
    pub fn builtin() -> &'static PatternTable {
        &BUILTIN
    }

    /// Patterns for a category, in priority order. Empty for `Unknown`.
    pub fn patterns(&self, category: Category) -> &[ExtractionPattern] {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, p)| p.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of patterns
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, p)| p.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_compiles() {
        let table = PatternTable::compile(DEFAULT_PATTERNS).unwrap();
        assert_eq!(table.len(), 26);
        for category in Category::CLASSIFIED {
            assert!(!table.patterns(category).is_empty(), "{} has no patterns", category);
        }
        assert!(table.patterns(Category::Unknown).is_empty());
    }

    #[test]
    fn test_every_pattern_has_one_group() {
        for pattern in PatternTable::builtin().patterns(Category::Amount) {
            assert_eq!(pattern.capture_group, 1);
            assert!(pattern.regex.captures_len() <= 2);
        }
    }

    #[test]
    fn test_groupless_pattern_uses_whole_match() {
        let pattern = ExtractionPattern::compile(r"\d+").unwrap();
        assert_eq!(pattern.capture_group, 0);
    }

    #[test]
    fn test_case_insensitive() {
        let pattern = ExtractionPattern::compile(r"reference\s*number\s*:?\s*([A-Z0-9]+)").unwrap();
        let caps = pattern.regex.captures("REFERENCE NUMBER: ab12").unwrap();
        assert_eq!(&caps[1], "ab12");
    }

    #[test]
    fn test_name_capture_stops_at_line_end() {
        let pattern = &PatternTable::builtin().patterns(Category::Who)[0];
        let caps = pattern.regex.captures("Name: John Smith\nAmount: 500").unwrap();
        assert_eq!(&caps[1], "John Smith");
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let broken: &[&str] = &[r"name("];
        assert!(PatternTable::compile(&[(Category::Who, broken)]).is_err());
    }
}
