//! API routes for the question-answering server

pub mod init;
pub mod query;

use axum::{routing::post, Router};

use crate::server::state::AppState;

/// Message returned when `/init` fails internally
pub const INIT_FAILED: &str = "An error occurred during PDF context initialization";

/// Message returned when `/query` fails internally
pub const QUERY_FAILED: &str = "An error occurred during query";

/// Build the API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/init", post(init::init_contexts))
        .route("/query", post(query::handle_query))
}

/// API info endpoint
pub async fn info() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "name": "pdf-qa",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Answers questions from a local PDF corpus",
        "endpoints": {
            "POST /init": "Re-extract every PDF in the document folder",
            "POST /query": "Ask a question ({question, files?})",
            "GET /health": "Liveness check"
        }
    }))
}
