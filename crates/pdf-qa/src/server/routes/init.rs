//! Cache reinitialization endpoint

use axum::{extract::State, Json};

use super::INIT_FAILED;
use crate::error::ApiError;
use crate::server::state::AppState;
use crate::types::InitResponse;

/// POST /init - Rebuild the text cache from the document folder
pub async fn init_contexts(
    State(state): State<AppState>,
) -> std::result::Result<Json<InitResponse>, ApiError> {
    tracing::info!("Reinitializing text cache from {}", state.cache().folder().display());

    let status = state
        .cache()
        .reinitialize()
        .await
        .map_err(|e| e.into_api(INIT_FAILED))?;

    Ok(Json(InitResponse {
        message: status.message().to_string(),
        documents: status.documents(),
    }))
}
