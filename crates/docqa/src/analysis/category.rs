//! Question categories and keyword-based classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic category of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Person or name lookup
    Who,
    /// Subject, purpose or type of the document
    What,
    /// Money amounts, fees and prices
    Amount,
    /// Reference, receipt or transaction identifiers
    Reference,
    /// Dates and times
    When,
    /// No keyword matched
    Unknown,
}

/// Override keywords that force [`Category::Amount`]
pub const AMOUNT_OVERRIDES: &[&str] = &["much", "amount", "money", "cost", "fee", "price"];

/// Override keywords that force [`Category::Reference`]
pub const REFERENCE_OVERRIDES: &[&str] = &["reference", "id", "number", "transaction"];

impl Category {
    /// Categories in the order the base pass tries them. Earlier entries win ties.
    pub const CLASSIFIED: [Category; 5] = [
        Category::Who,
        Category::What,
        Category::Amount,
        Category::Reference,
        Category::When,
    ];

    /// Trigger keywords for the base pass
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Who => &["who", "name", "person", "individual", "student", "customer", "user"],
            Self::What => &["what", "which", "type", "category", "purpose", "reason", "for"],
            Self::Amount => &["amount", "money", "cost", "price", "fee", "charge", "payment"],
            Self::Reference => &["reference", "number", "id", "transaction", "receipt"],
            Self::When => &["when", "date", "time", "day"],
            Self::Unknown => &[],
        }
    }

    /// Lowercase name used in logs and responses
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Who => "who",
            Self::What => "what",
            Self::Amount => "amount",
            Self::Reference => "reference",
            Self::When => "when",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a question into a [`Category`].
///
/// The base pass returns the first category in [`Category::CLASSIFIED`] order whose
/// keyword list is mentioned. The override pass then runs unconditionally: an amount
/// keyword forces `Amount`, and afterwards a reference keyword forces `Reference`, so
/// `Reference` wins when both are present.
///
/// A keyword is mentioned when a word of the lowercased question starts with it.
/// Words are runs of alphanumeric characters, so `fees` mentions `fee` while
/// `paid` does not mention `id`.
pub fn classify(question: &str) -> Category {
    let lowered = question.to_lowercase();
    let words = words(&lowered);

    let mut category = Category::CLASSIFIED
        .iter()
        .copied()
        .find(|c| mentions_any(&words, c.keywords()))
        .unwrap_or(Category::Unknown);

    // Sequential overrides; the later one wins on conflict.
    if mentions_any(&words, AMOUNT_OVERRIDES) {
        category = Category::Amount;
    }
    if mentions_any(&words, REFERENCE_OVERRIDES) {
        category = Category::Reference;
    }

    tracing::debug!("Classified question as {}", category);
    category
}

fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect()
}

fn mentions_any(words: &[&str], keywords: &[&str]) -> bool {
    keywords
        .iter()
        .any(|keyword| words.iter().any(|word| word.starts_with(keyword)))
}
