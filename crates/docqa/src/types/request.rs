//! Request bodies

use serde::{Deserialize, Serialize};

/// Question about the session's documents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: String,
}

/// Literal search over the session's documents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub search_term: String,
}

/// Remove one uploaded document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteFileRequest {
    #[serde(default)]
    pub filename: Option<String>,
}
