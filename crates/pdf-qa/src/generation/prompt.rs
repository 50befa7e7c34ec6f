//! Prompt templates for per-document answers and their consolidation

/// Prompt builder for the two synthesis stages
pub struct PromptBuilder;

impl PromptBuilder {
    /// Prompt asking for an answer grounded in one document's full text
    pub fn document_prompt(document_text: &str, question: &str) -> String {
        format!(
            "Below is content extracted from a PDF document:\n\n\
             {document_text}\n\n\
             User question: {question}\n\n\
             Please provide an answer based solely on the above content."
        )
    }

    /// Prompt merging numbered per-document answers into one reply
    pub fn combine_prompt<S: AsRef<str>>(answers: &[S], question: &str) -> String {
        let mut prompt = String::from("Below are answers derived from multiple PDF documents:\n");

        for (i, answer) in answers.iter().enumerate() {
            prompt.push_str(&format!(
                "\n---\nAnswer from PDF {}:\n{}\n",
                i + 1,
                answer.as_ref()
            ));
        }

        prompt.push_str(&format!(
            "\n---\nUser question: {question}\n\n\
             Based on the above responses, please synthesize and provide a final, \
             consolidated answer. Answer as a private assistant and do not mention \
             that the answer was derived from separate documents or responses."
        ));

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_prompt_contains_text_and_question() {
        let prompt = PromptBuilder::document_prompt("Helmets are mandatory.", "What gear?");
        assert!(prompt.contains("Helmets are mandatory."));
        assert!(prompt.contains("User question: What gear?"));
        assert!(prompt.ends_with("based solely on the above content."));
    }

    #[test]
    fn test_combine_prompt_labels_by_position() {
        let prompt = PromptBuilder::combine_prompt(&["first", "second"], "Why?");
        let first = prompt.find("Answer from PDF 1:\nfirst").unwrap();
        let second = prompt.find("Answer from PDF 2:\nsecond").unwrap();
        assert!(first < second);
        assert!(prompt.contains("User question: Why?"));
        assert!(prompt.contains("do not mention"));
    }
}
