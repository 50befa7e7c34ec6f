//! Provider abstraction for the generative model
//!
//! The synthesizer talks to an [`LlmProvider`]; [`GeminiClient`] is the
//! production implementation.

pub mod gemini;
pub mod llm;

pub use gemini::GeminiClient;
pub use llm::LlmProvider;
