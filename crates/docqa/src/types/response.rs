//! Response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::{Category, SearchMatch};
use crate::session::SessionDocument;

/// Per-file result of an upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    pub filename: String,
    pub filepath: String,
    pub text: String,
    pub word_count: usize,
    pub char_count: usize,
}

impl From<&SessionDocument> for UploadResult {
    fn from(doc: &SessionDocument) -> Self {
        Self {
            filename: doc.filename.clone(),
            filepath: doc.stored_path.display().to_string(),
            text: doc.text.clone(),
            word_count: doc.word_count,
            char_count: doc.char_count,
        }
    }
}

/// Response from an upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub session_id: Uuid,
    pub results: Vec<UploadResult>,
    pub total_files: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Answer to a question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub success: bool,
    pub answer: String,
    pub question: String,
    /// Category the question was classified as
    pub category: Category,
}

/// Literal search hits
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    pub matches: Vec<SearchMatch>,
    pub count: usize,
}

impl SearchResponse {
    pub fn new(matches: Vec<SearchMatch>) -> Self {
        let count = matches.len();
        Self { matches, count }
    }
}

/// Session id handed to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
    pub session_id: Uuid,
}

/// Plain acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Summary of an uploaded document (without its text)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub filename: String,
    pub word_count: usize,
    pub char_count: usize,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&SessionDocument> for DocumentSummary {
    fn from(doc: &SessionDocument) -> Self {
        Self {
            filename: doc.filename.clone(),
            word_count: doc.word_count,
            char_count: doc.char_count,
            uploaded_at: doc.uploaded_at,
        }
    }
}

/// Response for listing documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentSummary>,
    pub total_count: usize,
}
