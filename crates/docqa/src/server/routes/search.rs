//! Literal text search endpoint

use axum::{extract::State, http::HeaderMap, Json};

use crate::analysis::literal_search;
use crate::server::routes::session_id;
use crate::server::state::AppState;
use crate::types::{SearchRequest, SearchResponse};

/// POST /api/search - Find every occurrence of a term in the session's documents
pub async fn search_text(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SearchRequest>,
) -> Json<SearchResponse> {
    let term = request.search_term.trim();
    if term.is_empty() {
        return Json(SearchResponse::default());
    }

    let Some(corpus) = session_id(&headers).and_then(|id| state.sessions().corpus(&id)) else {
        return Json(SearchResponse::default());
    };

    let response = SearchResponse::new(literal_search(term, &corpus));
    tracing::info!("Search \"{}\": {} matches", term, response.count);
    Json(response)
}
