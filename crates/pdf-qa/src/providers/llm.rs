//! LLM provider trait for one-shot generation

use async_trait::async_trait;

use crate::error::Result;

/// Trait for prompt-in, text-out generation.
///
/// Every call is an independent session: implementations must not carry
/// history from one call to the next.
///
/// Implementations:
/// - `GeminiClient`: Google Generative Language API
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a response for a single prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
