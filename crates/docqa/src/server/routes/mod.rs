//! API routes for the document Q&A server

pub mod ask;
pub mod search;
pub mod session;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderMap,
    response::AppendHeaders,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::server::state::AppState;

/// Header carrying the client's session id
pub const SESSION_HEADER: &str = "x-session-id";

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Session lifecycle
        .route("/session", post(session::new_session))
        .route("/clear_session", post(session::clear_session))
        .route("/documents", get(session::list_documents))
        .route("/delete_file", post(session::delete_file))
        // Upload - with larger body limit for images
        .route(
            "/upload",
            post(upload::upload_files).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Questions and search
        .route("/ask", post(ask::ask_question))
        .route("/search", post(search::search_text))
        // Info
        .route("/info", get(info))
}

/// Session id sent by the client, if present and well-formed
pub fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
}

/// Attach the session id header to a JSON body
pub fn with_session_header<T>(
    id: Uuid,
    body: T,
) -> (AppendHeaders<[(&'static str, String); 1]>, Json<T>) {
    (AppendHeaders([(SESSION_HEADER, id.to_string())]), Json(body))
}

/// API info endpoint
async fn info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "docqa",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Document image OCR with rule-based question answering",
        "session_header": SESSION_HEADER,
        "endpoints": {
            "POST /api/session": "Start an empty session",
            "POST /api/upload": "Upload images (multipart field 'files') and extract text",
            "POST /api/ask": "Ask a question about the uploaded documents",
            "POST /api/search": "Literal case-insensitive search",
            "GET /api/documents": "List the session's documents",
            "POST /api/delete_file": "Remove one document by filename",
            "POST /api/clear_session": "Remove all documents and end the session"
        },
        "categories": ["who", "what", "amount", "reference", "when"]
    }))
}
