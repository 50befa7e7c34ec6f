//! Query endpoint: canned answers or document-grounded synthesis

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::time::Instant;

use super::QUERY_FAILED;
use crate::error::{ApiError, Error, Result};
use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResponse};

/// POST /query - Answer a question
pub async fn handle_query(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> std::result::Result<Json<QueryResponse>, ApiError> {
    let Json(request) = payload
        .map_err(|e| Error::InvalidRequest(e.body_text()).into_api(QUERY_FAILED))?;

    answer_query(&state, &request)
        .await
        .map(Json)
        .map_err(|e| e.into_api(QUERY_FAILED))
}

async fn answer_query(state: &AppState, request: &QueryRequest) -> Result<QueryResponse> {
    let start = Instant::now();
    let question = request.question()?;

    tracing::info!("Query: \"{}\"", question);

    if let Some(answer) = state.classifier().canned_answer(question) {
        tracing::info!("Answered from canned responses");
        return Ok(QueryResponse::new(answer));
    }

    // Held for the whole request; a concurrent rebuild publishes a new snapshot
    let cache = state.cache().snapshot();
    if cache.is_empty() {
        return Err(Error::CacheNotInitialized);
    }

    let selected = cache.select(request.files());
    if selected.is_empty() {
        return Err(Error::NoMatchingDocuments(request.files().to_vec()));
    }

    let answer = state.synthesizer().synthesize(&selected, question).await?;

    tracing::info!(
        "Query completed in {}ms over {} documents",
        start.elapsed().as_millis(),
        selected.len()
    );

    Ok(QueryResponse::new(answer))
}
