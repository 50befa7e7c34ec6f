//! Query request types

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Body of `POST /query`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer (required)
    #[serde(default)]
    pub question: Option<String>,

    /// Restrict the query to these filenames (all documents when absent or empty)
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

impl QueryRequest {
    /// The trimmed question; blank counts as missing
    pub fn question(&self) -> Result<&str> {
        self.question
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or(Error::MissingQuestion)
    }

    /// Requested filenames, empty meaning "all"
    pub fn files(&self) -> &[String] {
        self.files.as_deref().unwrap_or_default()
    }
}
