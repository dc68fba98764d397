//! Rule-based question answering over extracted document text
//!
//! A question is classified into a [`Category`] by keyword matching, the
//! category's regex table pulls candidate fragments out of the corpus, and the
//! synthesizer turns them into an answer, falling back to line matching when
//! nothing was extracted. Everything here is pure and synchronous.

pub mod category;
pub mod corpus;
pub mod extract;
pub mod patterns;
pub mod search;
pub mod synthesize;

pub use category::{classify, Category};
pub use corpus::aggregate;
pub use extract::{extract, extract_with};
pub use patterns::{ExtractionPattern, PatternTable};
pub use search::{literal_search, SearchMatch};
pub use synthesize::synthesize;

/// Result of analysing a question against a corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub category: Category,
    pub candidates: Vec<String>,
    pub answer: String,
}

/// Classify, extract and synthesize with the built-in pattern table
pub fn analyze(question: &str, corpus: &str) -> Analysis {
    analyze_with(PatternTable::builtin(), question, corpus)
}

/// Classify, extract and synthesize with a custom pattern table
pub fn analyze_with(table: &PatternTable, question: &str, corpus: &str) -> Analysis {
    let category = classify(question);
    let candidates = extract_with(table, category, corpus);
    let answer = synthesize(category, &candidates, question, corpus);

    Analysis {
        category,
        candidates,
        answer,
    }
}

/// Answer a question about the corpus
pub fn analyze_document_content(question: &str, corpus: &str) -> String {
    analyze(question, corpus).answer
}
