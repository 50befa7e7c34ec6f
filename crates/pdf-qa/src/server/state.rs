//! Application state for the question-answering server

use std::sync::Arc;

use crate::classifier::QuestionClassifier;
use crate::config::QaConfig;
use crate::error::Result;
use crate::generation::AnswerSynthesizer;
use crate::providers::{GeminiClient, LlmProvider};
use crate::storage::TextCacheStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: QaConfig,
    /// Extracted text cache (owned here, never global)
    cache: TextCacheStore,
    /// Canned-answer classifier
    classifier: QuestionClassifier,
    /// Per-document answering and consolidation
    synthesizer: AnswerSynthesizer,
}

impl AppState {
    /// Create application state: API key check, Gemini client, cache load-or-create
    pub async fn new(config: QaConfig) -> Result<Self> {
        tracing::info!("Initializing application state...");

        // Fail before any extraction work when the key is missing
        let llm: Arc<dyn LlmProvider> = Arc::new(GeminiClient::from_env(&config.llm)?);
        tracing::info!("Gemini client initialized (model: {})", config.llm.model);

        let cache = TextCacheStore::open(&config.documents).await?;
        tracing::info!(
            "Text cache ready with {} documents from {}",
            cache.snapshot().len(),
            cache.folder().display()
        );

        Self::from_parts(config, cache, llm)
    }

    /// Assemble state from an already opened cache and a provider
    pub fn from_parts(
        config: QaConfig,
        cache: TextCacheStore,
        llm: Arc<dyn LlmProvider>,
    ) -> Result<Self> {
        let classifier = QuestionClassifier::new(&config.classifier)?;
        let synthesizer = AnswerSynthesizer::new(llm, config.llm.parallel_requests);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                cache,
                classifier,
                synthesizer,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &QaConfig {
        &self.inner.config
    }

    /// Get the text cache store
    pub fn cache(&self) -> &TextCacheStore {
        &self.inner.cache
    }

    /// Get the question classifier
    pub fn classifier(&self) -> &QuestionClassifier {
        &self.inner.classifier
    }

    /// Get the answer synthesizer
    pub fn synthesizer(&self) -> &AnswerSynthesizer {
        &self.inner.synthesizer
    }
}
