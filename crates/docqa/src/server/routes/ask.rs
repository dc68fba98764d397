//! Question answering endpoint

use axum::{extract::State, http::HeaderMap, Json};
use std::time::Instant;

use crate::analysis;
use crate::error::{Error, Result};
use crate::server::routes::session_id;
use crate::server::state::AppState;
use crate::types::{AskRequest, AskResponse};

/// POST /api/ask - Answer a question about the session's documents
pub async fn ask_question(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();
    let question = request.question.trim().to_string();

    if question.is_empty() {
        return Err(Error::bad_request("Please enter a question"));
    }

    let corpus = session_id(&headers)
        .and_then(|id| state.sessions().corpus(&id))
        .ok_or_else(|| Error::bad_request("Please upload and process documents first"))?;

    tracing::info!("Question: \"{}\"", question);

    let analysis = analysis::analyze(&question, &corpus);

    tracing::info!(
        "Answered as {} from {} candidates in {}ms",
        analysis.category,
        analysis.candidates.len(),
        start.elapsed().as_millis()
    );

    Ok(Json(AskResponse {
        success: true,
        answer: analysis.answer,
        question,
        category: analysis.category,
    }))
}
