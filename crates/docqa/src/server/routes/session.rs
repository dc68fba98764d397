//! Session management endpoints

use axum::{extract::State, http::HeaderMap, response::IntoResponse, Json};

use crate::error::{Error, Result};
use crate::server::routes::{session_id, with_session_header};
use crate::server::state::AppState;
use crate::session::{remove_stored_file, remove_stored_files};
use crate::types::{
    DeleteFileRequest, DocumentListResponse, DocumentSummary, SessionResponse, SuccessResponse,
};

/// POST /api/session - Start a fresh session, discarding the caller's previous one
pub async fn new_session(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(old) = session_id(&headers).and_then(|id| state.sessions().remove(&id)) {
        remove_stored_files(&old.documents).await;
        tracing::info!("Reset session {}", old.id);
    }

    let id = state.sessions().create();
    with_session_header(
        id,
        SessionResponse {
            success: true,
            session_id: id,
        },
    )
}

/// GET /api/documents - List the session's documents
pub async fn list_documents(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<DocumentListResponse> {
    let documents: Vec<DocumentSummary> = session_id(&headers)
        .map(|id| state.sessions().documents(&id))
        .unwrap_or_default()
        .iter()
        .map(DocumentSummary::from)
        .collect();

    let total_count = documents.len();
    Json(DocumentListResponse {
        documents,
        total_count,
    })
}

/// POST /api/delete_file - Remove one document and its stored image
pub async fn delete_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DeleteFileRequest>,
) -> Result<Json<SuccessResponse>> {
    let filename = request
        .filename
        .filter(|f| !f.is_empty())
        .ok_or_else(|| Error::bad_request("No filename provided"))?;

    let removed = session_id(&headers).and_then(|id| state.sessions().remove_document(&id, &filename));
    match removed {
        Some(doc) => {
            remove_stored_file(&doc.stored_path).await;
            tracing::info!("Deleted document '{}'", doc.filename);
        }
        None => tracing::debug!("delete_file: '{}' not in session", filename),
    }

    Ok(Json(SuccessResponse::ok()))
}

/// POST /api/clear_session - Delete all stored images and drop the session
pub async fn clear_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<SuccessResponse> {
    if let Some(session) = session_id(&headers).and_then(|id| state.sessions().remove(&id)) {
        remove_stored_files(&session.documents).await;
        tracing::info!(
            "Cleared session {} ({} documents)",
            session.id,
            session.documents.len()
        );
    }

    Json(SuccessResponse::ok())
}
