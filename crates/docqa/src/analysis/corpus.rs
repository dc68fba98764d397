//! Corpus aggregation

/// Separator placed between the texts of consecutive documents
pub const DOCUMENT_SEPARATOR: &str = " ";

/// Join per-document texts, in upload order, into one search corpus
pub fn aggregate<I, S>(texts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut corpus = String::new();
    for (i, text) in texts.into_iter().enumerate() {
        if i > 0 {
            corpus.push_str(DOCUMENT_SEPARATOR);
        }
        corpus.push_str(text.as_ref());
    }
    corpus
}
