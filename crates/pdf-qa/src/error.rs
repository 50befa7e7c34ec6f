//! Error types for the question-answering service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File parsing error
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Gemini/LLM error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Query without a usable question
    #[error("Missing \"question\" parameter")]
    MissingQuestion,

    /// Malformed request body
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Query arrived while the text cache is empty
    #[error("PDF contexts not initialized. Call /init first.")]
    CacheNotInitialized,

    /// None of the requested files are cached
    #[error("None of the requested files are available: {}", .0.join(", "))]
    NoMatchingDocuments(Vec<String>),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Errors caused by the caller, reported back verbatim with a 400
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::MissingQuestion
                | Error::InvalidRequest(_)
                | Error::CacheNotInitialized
                | Error::NoMatchingDocuments(_)
        )
    }

    /// Attach the message shown to callers when this error is internal
    pub fn into_api(self, public_message: &'static str) -> ApiError {
        ApiError {
            error: self,
            public_message,
        }
    }
}

/// An error on its way out of an HTTP handler.
///
/// Client errors keep their specific message. Anything else is logged in
/// full and replaced by `public_message`.
#[derive(Debug)]
pub struct ApiError {
    error: Error,
    public_message: &'static str,
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        error.into_api("An internal error occurred")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = if self.error.is_client_error() {
            tracing::warn!("Rejected request: {}", self.error);
            (StatusCode::BAD_REQUEST, self.error.to_string())
        } else {
            tracing::error!(error = ?self.error, "{}", self.public_message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                self.public_message.to_string(),
            )
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(Error::MissingQuestion.is_client_error());
        assert!(Error::CacheNotInitialized.is_client_error());
        assert!(Error::NoMatchingDocuments(vec!["a.pdf".into()]).is_client_error());
        assert!(!Error::llm("quota exceeded").is_client_error());
        assert!(!Error::internal("boom").is_client_error());
    }

    #[test]
    fn test_internal_error_is_not_leaked() {
        let response = Error::llm("secret upstream detail")
            .into_api("An error occurred during query")
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_client_error_status() {
        let response = ApiError::from(Error::MissingQuestion).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
