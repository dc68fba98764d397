//! Upload filename handling

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Reduce a client-supplied filename to a safe basename.
///
/// Path components are dropped, whitespace becomes `_`, and anything outside
/// ASCII letters, digits, `.`, `_` and `-` is removed. Leading dots and
/// underscores are stripped so the result is never hidden or relative.
pub fn secure_filename(filename: &str) -> String {
    let basename = filename
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or("");

    let cleaned: String = basename
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// Name under which an upload is stored: `{YYYYmmdd_HHMMSS}_{id}_{safe name}`.
///
/// All sessions share one upload directory, so `id` must be unique per stored file.
/// Falls back to `upload` when sanitising leaves nothing.
pub fn stored_filename(safe_name: &str, at: DateTime<Utc>, id: Uuid) -> String {
    let name = if safe_name.is_empty() { "upload" } else { safe_name };
    format!("{}_{}_{}", at.format("%Y%m%d_%H%M%S"), id.simple(), name)
}
