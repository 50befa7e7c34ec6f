//! Response bodies

use serde::{Deserialize, Serialize};

/// Body of a successful `POST /query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
}

impl QueryResponse {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

/// Body of a successful `POST /init`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitResponse {
    /// Human-readable outcome
    pub message: String,
    /// Number of documents now cached
    pub documents: usize,
}
