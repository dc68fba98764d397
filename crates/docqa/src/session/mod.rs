//! Per-session document registry
//!
//! A session holds the documents uploaded by one client, in upload order. The
//! corpus handed to the analysis engine is rebuilt from them on every query.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::analysis;

/// A processed upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDocument {
    /// Sanitised filename as shown to the user
    pub filename: String,
    /// Where the image is stored on disk
    pub stored_path: PathBuf,
    /// OCR output
    pub text: String,
    pub word_count: usize,
    pub char_count: usize,
    pub uploaded_at: DateTime<Utc>,
}

impl SessionDocument {
    pub fn new(filename: String, stored_path: PathBuf, text: String) -> Self {
        Self {
            filename,
            stored_path,
            word_count: text.split_whitespace().count(),
            char_count: text.chars().count(),
            text,
            uploaded_at: Utc::now(),
        }
    }
}

/// Documents belonging to one client
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub documents: Vec<SessionDocument>,
}

impl Session {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            documents: Vec::new(),
        }
    }

    /// Search corpus for this session's documents
    pub fn corpus(&self) -> String {
        analysis::aggregate(self.documents.iter().map(|d| d.text.as_str()))
    }
}

/// Concurrent map of live sessions
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start an empty session
    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(id, Session::new(id));
        tracing::info!("Created session {}", id);
        id
    }

    /// Reuse a known session id or start a new session
    pub fn resolve(&self, id: Option<Uuid>) -> Uuid {
        match id {
            Some(id) if self.sessions.contains_key(&id) => id,
            _ => self.create(),
        }
    }

    /// Corpus of a session, or `None` when it has no documents
    pub fn corpus(&self, id: &Uuid) -> Option<String> {
        self.sessions
            .get(id)
            .filter(|s| !s.documents.is_empty())
            .map(|s| s.corpus())
    }

    /// Documents of a session, empty when unknown
    pub fn documents(&self, id: &Uuid) -> Vec<SessionDocument> {
        self.sessions
            .get(id)
            .map(|s| s.documents.clone())
            .unwrap_or_default()
    }

    /// Swap in a new document list, returning the previous one
    pub fn replace_documents(&self, id: Uuid, documents: Vec<SessionDocument>) -> Vec<SessionDocument> {
        let mut session = self.sessions.entry(id).or_insert_with(|| Session::new(id));
        std::mem::replace(&mut session.documents, documents)
    }

    /// Remove the first document with this filename
    pub fn remove_document(&self, id: &Uuid, filename: &str) -> Option<SessionDocument> {
        let mut session = self.sessions.get_mut(id)?;
        let index = session.documents.iter().position(|d| d.filename == filename)?;
        Some(session.documents.remove(index))
    }

    /// Drop a session entirely
    pub fn remove(&self, id: &Uuid) -> Option<Session> {
        self.sessions.remove(id).map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Delete stored upload files, logging any that could not be removed
pub async fn remove_stored_files(documents: &[SessionDocument]) {
    for doc in documents {
        remove_stored_file(&doc.stored_path).await;
    }
}

/// Delete one stored file, ignoring files that are already gone
pub async fn remove_stored_file(path: &std::path::Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!("Removed {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
    }
}
