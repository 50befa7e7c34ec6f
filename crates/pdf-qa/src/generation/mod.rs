//! Answer generation: per-document answers merged into one

pub mod prompt;
pub mod synthesizer;

pub use prompt::PromptBuilder;
pub use synthesizer::AnswerSynthesizer;
