//! pdf-qa: answers questions from a local PDF corpus
//!
//! Text is extracted once from every PDF in a folder and cached on disk.
//! Each question is sent to Gemini once per document, and the per-document
//! answers are merged by a final Gemini call into a single reply. Small talk
//! is answered from a canned table without any model call.

pub mod classifier;
pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod server;
pub mod storage;
pub mod types;

pub use classifier::QuestionClassifier;
pub use config::QaConfig;
pub use error::{Error, Result};
pub use generation::AnswerSynthesizer;
pub use ingestion::DocumentExtractor;
pub use storage::{ReinitStatus, TextCacheStore};
pub use types::{
    document::{DocumentText, TextCache},
    query::QueryRequest,
    response::{InitResponse, QueryResponse},
};
