//! Core types for the question-answering service

pub mod document;
pub mod query;
pub mod response;

pub use document::{DocumentText, TextCache};
pub use query::QueryRequest;
pub use response::{InitResponse, QueryResponse};
