//! Two-stage answer synthesis: fan out over documents, then merge

use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;

use super::prompt::PromptBuilder;
use crate::error::Result;
use crate::providers::LlmProvider;
use crate::types::DocumentText;

/// Queries the model once per document and once more to consolidate.
///
/// Stateless between requests; every model call is a fresh session.
#[derive(Clone)]
pub struct AnswerSynthesizer {
    llm: Arc<dyn LlmProvider>,
    parallel_requests: usize,
}

impl AnswerSynthesizer {
    /// Create a synthesizer issuing at most `parallel_requests` document calls at once
    pub fn new(llm: Arc<dyn LlmProvider>, parallel_requests: usize) -> Self {
        Self {
            llm,
            parallel_requests: parallel_requests.max(1),
        }
    }

    /// Answer `question` from a single document's text
    pub async fn answer_one(&self, document_text: &str, question: &str) -> Result<String> {
        let prompt = PromptBuilder::document_prompt(document_text, question);
        self.llm.generate(&prompt).await
    }

    /// Merge per-document answers into one consolidated answer
    pub async fn combine<S: AsRef<str> + Sync>(
        &self,
        answers: &[S],
        question: &str,
    ) -> Result<String> {
        let prompt = PromptBuilder::combine_prompt(answers, question);
        self.llm.generate(&prompt).await
    }

    /// Full synthesis over `documents`.
    ///
    /// Answers keep document order. The first failing call fails the whole
    /// synthesis; no partial answer is produced.
    pub async fn synthesize(&self, documents: &[&DocumentText], question: &str) -> Result<String> {
        tracing::info!(
            "Querying {} ({}) over {} documents",
            self.llm.name(),
            self.llm.model(),
            documents.len()
        );

        let calls: Vec<_> = documents
            .iter()
            .map(|doc| async move {
                self.answer_one(&doc.text, question).await.map_err(|e| {
                    tracing::warn!("Answer for {} failed: {}", doc.filename, e);
                    e
                })
            })
            .collect();

        let answers: Vec<String> = stream::iter(calls)
            .buffered(self.parallel_requests)
            .try_collect()
            .await?;

        self.combine(&answers, question).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::testing::RecordingLlm;

    fn docs() -> Vec<DocumentText> {
        vec![
            DocumentText::extracted("a.pdf", "Alpha content"),
            DocumentText::extracted("b.pdf", "Beta content"),
            DocumentText::extracted("c.pdf", "Gamma content"),
        ]
    }

    #[tokio::test]
    async fn test_fan_out_then_combine() {
        let llm = Arc::new(RecordingLlm::new());
        let synthesizer = AnswerSynthesizer::new(llm.clone(), 1);
        let docs = docs();
        let selected: Vec<&DocumentText> = docs.iter().collect();

        let answer = synthesizer.synthesize(&selected, "What is inside?").await.unwrap();

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 4);
        assert!(prompts[0].contains("Alpha content"));
        assert!(prompts[1].contains("Beta content"));
        assert!(prompts[2].contains("Gamma content"));
        assert!(prompts[3].contains("Answer from PDF 3:"));
        assert_eq!(answer, llm.reply_for(&prompts[3]));
    }

    #[tokio::test]
    async fn test_parallel_fan_out_keeps_order() {
        let llm = Arc::new(RecordingLlm::new());
        let synthesizer = AnswerSynthesizer::new(llm.clone(), 3);
        let docs = docs();
        let selected: Vec<&DocumentText> = docs.iter().collect();

        synthesizer.synthesize(&selected, "q").await.unwrap();

        let prompts = llm.prompts();
        let combine = prompts.last().unwrap();
        let alpha = combine.find("Alpha content").unwrap();
        let gamma = combine.find("Gamma content").unwrap();
        assert!(alpha < gamma);
        assert_eq!(llm.combine_calls(), 1);
    }

    #[tokio::test]
    async fn test_synthesis_runs_on_spawned_task() {
        let llm = Arc::new(RecordingLlm::new());
        let synthesizer = AnswerSynthesizer::new(llm.clone(), 2);

        let handle = tokio::spawn(async move {
            let docs = docs();
            let selected: Vec<&DocumentText> = docs.iter().collect();
            synthesizer.synthesize(&selected, "q").await
        });

        assert_eq!(handle.await.unwrap().unwrap(), "Consolidated answer");
        assert_eq!(llm.document_calls(), 3);
    }

    #[tokio::test]
    async fn test_single_failure_fails_everything() {
        let llm = Arc::new(RecordingLlm::failing_on("Beta content"));
        let synthesizer = AnswerSynthesizer::new(llm.clone(), 1);
        let docs = docs();
        let selected: Vec<&DocumentText> = docs.iter().collect();

        let result = synthesizer.synthesize(&selected, "q").await;
        assert!(result.is_err());
        assert_eq!(llm.combine_calls(), 0);
    }

    #[tokio::test]
    async fn test_single_document_still_combined() {
        let llm = Arc::new(RecordingLlm::new());
        let synthesizer = AnswerSynthesizer::new(llm.clone(), 0);
        let docs = docs();

        synthesizer.synthesize(&[&docs[0]], "q").await.unwrap();
        assert_eq!(llm.document_calls(), 1);
        assert_eq!(llm.combine_calls(), 1);
    }
}
