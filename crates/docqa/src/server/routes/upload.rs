//! Image upload endpoint

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    response::IntoResponse,
};
use chrono::Utc;
use std::path::PathBuf;
use std::time::Instant;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::ingestion::{extract_text, secure_filename, stored_filename};
use crate::server::routes::{session_id, with_session_header};
use crate::server::state::AppState;
use crate::session::{remove_stored_file, remove_stored_files, SessionDocument};
use crate::types::{UploadResponse, UploadResult};

/// Multipart field carrying the images
const FILES_FIELD: &str = "files";

/// POST /api/upload - Store images, OCR them, and make them the session's documents.
///
/// A new upload replaces whatever the session held before. Processing stops at the
/// first failing file; files stored by the failed request are removed again, as is
/// a session the request had to create.
pub async fn upload_files(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let start = Instant::now();
    let requested = session_id(&headers);
    let id = state.sessions().resolve(requested);
    let created = requested != Some(id);

    let previous = state.sessions().replace_documents(id, Vec::new());
    if !previous.is_empty() {
        tracing::info!(
            "Session {}: discarding {} previous documents",
            id,
            previous.len()
        );
        remove_stored_files(&previous).await;
    }

    let mut stored = Vec::new();
    let documents = match process_files(&state, &mut multipart, &mut stored).await {
        Ok(documents) => documents,
        Err(e) => {
            for path in &stored {
                remove_stored_file(path).await;
            }
            // No client holds the id of a session created by this request
            if created {
                state.sessions().remove(&id);
                tracing::debug!("Dropped session {} after failed upload", id);
            }
            return Err(e);
        }
    };

    let results: Vec<UploadResult> = documents.iter().map(UploadResult::from).collect();
    let total_files = results.len();
    state.sessions().replace_documents(id, documents);

    let processing_time_ms = start.elapsed().as_millis() as u64;
    tracing::info!(
        "Session {}: processed {} files in {}ms",
        id,
        total_files,
        processing_time_ms
    );

    Ok(with_session_header(
        id,
        UploadResponse {
            success: true,
            session_id: id,
            results,
            total_files,
            processing_time_ms,
        },
    ))
}

/// Read every `files` field, store it, and OCR it. Stored paths are pushed to
/// `stored` as they are written so the caller can clean up on failure.
async fn process_files(
    state: &AppState,
    multipart: &mut Multipart,
    stored: &mut Vec<PathBuf>,
) -> Result<Vec<SessionDocument>> {
    let config = state.config();
    let mut documents = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::bad_request(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some(FILES_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        if filename.is_empty() {
            continue;
        }
        if !config.upload.is_allowed(&filename) {
            return Err(Error::InvalidFileType(filename));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::bad_request(format!("Failed to read file '{}': {}", filename, e)))?;

        let safe_name = secure_filename(&filename);
        let path = config
            .upload
            .upload_dir
            .join(stored_filename(&safe_name, Utc::now(), Uuid::new_v4()));

        tracing::info!("Processing file: {} ({} bytes)", safe_name, data.len());
        tokio::fs::write(&path, &data).await?;
        stored.push(path.clone());

        let text = ocr_file(state, path.clone(), &safe_name).await?;
        documents.push(SessionDocument::new(safe_name, path, text));
    }

    if documents.is_empty() {
        return Err(Error::bad_request("No files selected"));
    }

    Ok(documents)
}

/// Run the OCR attempts on a blocking thread
async fn ocr_file(state: &AppState, path: PathBuf, filename: &str) -> Result<String> {
    let engine = state.ocr_engine();
    let attempts = state.ocr_attempts().to_vec();
    let min_chars = state.config().ocr.min_text_chars;
    let name = filename.to_string();

    let outcome = tokio::task::spawn_blocking(move || {
        extract_text(engine.as_ref(), &path, &attempts, min_chars, &name)
    })
    .await
    .map_err(|e| Error::internal(format!("OCR task failed: {}", e)))??;

    outcome
        .text
        .ok_or_else(|| Error::NoTextExtracted(filename.to_string()))
}
