//! Answer rendering and fallback strategies

use super::category::Category;

/// Returned when neither candidates nor fallbacks produce an answer
pub const TERMINAL_FALLBACK: &str = "I found information in the document, but I'm not sure how to answer your specific question. Could you try rephrasing it?";

/// Field labels that mark a line as worth summarising
const SUMMARY_FIELDS: &[&str] = &["name", "amount", "purpose", "category", "reference"];

/// Render an answer from extracted candidates, falling back to line matching
/// when there are none or the category is `Unknown`.
pub fn synthesize(category: Category, candidates: &[String], question: &str, corpus: &str) -> String {
    if let Some(answer) = render_candidates(category, candidates) {
        return answer;
    }

    keyword_line_fallback(question, corpus)
        .or_else(|| field_summary_fallback(corpus))
        .unwrap_or_else(|| TERMINAL_FALLBACK.to_string())
}

fn render_candidates(category: Category, candidates: &[String]) -> Option<String> {
    let first = candidates.first()?;

    let answer = match category {
        Category::Who => format!("Based on the document, the person mentioned is: {}", first),
        Category::What => format!("This document is about: {}", first),
        Category::Amount => match candidates.iter().find(|c| is_plain_number(c)) {
            Some(amount) => format!("The amount mentioned is: ₹{}", amount),
            None => format!("The amounts mentioned are: {}", join_first(candidates, 3, ", ")),
        },
        Category::Reference => format!(
            "The reference/ID numbers are: {}",
            join_first(candidates, 3, ", ")
        ),
        Category::When => format!("The date/time mentioned is: {}", first),
        Category::Unknown => return None,
    };

    Some(answer)
}

/// True when the value is all ASCII digits once `,` and `.` are removed
fn is_plain_number(value: &str) -> bool {
    let mut digits = value.chars().filter(|c| *c != ',' && *c != '.').peekable();
    digits.peek().is_some() && digits.all(|c| c.is_ascii_digit())
}

fn join_first<S: AsRef<str>>(items: &[S], n: usize, sep: &str) -> String {
    items
        .iter()
        .take(n)
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(sep)
}

fn corpus_lines(corpus: &str) -> impl Iterator<Item = &str> {
    corpus.split('\n').map(str::trim).filter(|l| !l.is_empty())
}

/// Lines sharing a word (longer than 2 characters) with the question
fn keyword_line_fallback(question: &str, corpus: &str) -> Option<String> {
    let lowered = question.to_lowercase();
    let terms: Vec<&str> = lowered
        .split_whitespace()
        .filter(|w| w.chars().count() > 2)
        .collect();

    if terms.is_empty() {
        return None;
    }

    let lines: Vec<&str> = corpus_lines(corpus)
        .filter(|line| {
            let line = line.to_lowercase();
            terms.iter().any(|t| line.contains(t))
        })
        .take(2)
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(format!("Based on the document: {}", lines.join(". ")))
    }
}

/// `label: value` lines for the common receipt fields
fn field_summary_fallback(corpus: &str) -> Option<String> {
    let lines: Vec<&str> = corpus_lines(corpus)
        .filter(|line| {
            let lowered = line.to_lowercase();
            line.contains(':') && SUMMARY_FIELDS.iter().any(|f| lowered.contains(f))
        })
        .take(3)
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(format!("Here's what I found in the document: {}", lines.join(". ")))
    }
}
