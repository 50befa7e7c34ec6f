//! Configuration for the PDF question-answering service

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Document folder and cache configuration
    pub documents: DocumentsConfig,
    /// Gemini/LLM configuration
    pub llm: LlmConfig,
    /// Canned responses and abbreviation expansion
    pub classifier: ClassifierConfig,
}

impl QaConfig {
    /// Load configuration from a TOML file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config: {}", e)))
    }

    /// Apply `PDF_QA_*` environment overrides on top of the loaded values
    pub fn apply_env_overrides(mut self) -> Result<Self> {
        if let Some(folder) = env_var("PDF_QA_FOLDER") {
            self.documents.folder = PathBuf::from(folder);
        }
        if let Some(cache_file) = env_var("PDF_QA_CACHE_FILE") {
            self.documents.cache_path = PathBuf::from(cache_file);
        }
        if let Some(host) = env_var("PDF_QA_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_var("PDF_QA_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| Error::Config(format!("Invalid PDF_QA_PORT '{}': {}", port, e)))?;
        }
        Ok(self)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Directory served for `GET /` and other unmatched paths
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
            static_dir: Some(PathBuf::from("static")),
        }
    }
}

/// Where documents live and where their extracted text is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentsConfig {
    /// Folder scanned (non-recursively) for documents
    pub folder: PathBuf,
    /// JSON file holding the extracted text cache
    pub cache_path: PathBuf,
    /// File extensions picked up by the scan, compared case-insensitively
    pub extensions: Vec<String>,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            folder: PathBuf::from("pdf"),
            cache_path: PathBuf::from("pdf_contexts.json"),
            extensions: vec!["pdf".to_string()],
        }
    }
}

/// LLM (Gemini) configuration
///
/// Generation parameters are fixed at startup and applied to every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Generative Language API base URL
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling bound
    pub top_p: f32,
    /// Top-k sampling bound
    pub top_k: u32,
    /// Maximum tokens per response
    pub max_output_tokens: u32,
    /// Response MIME type requested from the model
    pub response_mime_type: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Documents queried concurrently per request (1 = one after another)
    pub parallel_requests: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash-exp".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            temperature: 1.0,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
            response_mime_type: "text/plain".to_string(),
            timeout_secs: 120,
            parallel_requests: 1,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(Error::Config(format!(
                "{} environment variable not set",
                self.api_key_env
            ))),
        }
    }
}

/// Canned small-talk answers and domain abbreviations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Abbreviation -> expansion, applied as whole words after normalization
    pub abbreviations: BTreeMap<String, String>,
    /// Phrase -> fixed answer, matched exactly after normalization
    pub canned_responses: BTreeMap<String, String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        let abbreviations = [("bsl", "bokaro steel plant"), ("bsp", "bokaro steel plant")];
        let canned_responses = [
            ("hello", "Hello! How can I assist you today?"),
            ("hi", "Hi there! How can I help you?"),
            ("how are you", "I'm just a program, but I'm here to help you!"),
            (
                "what's your name",
                "I'm GitHub Copilot, your programming assistant.",
            ),
            ("what day is it", "Today is a great day to code!"),
            ("thank you", "You're welcome!"),
            ("thanks", "You're welcome!"),
            ("hey", "Hey there!"),
        ];

        Self {
            abbreviations: abbreviations
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            canned_responses: canned_responses
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = QaConfig::from_toml(
            r#"
            [server]
            port = 8088

            [documents]
            folder = "/srv/pdfs"

            [llm]
            temperature = 0.2
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.documents.folder, PathBuf::from("/srv/pdfs"));
        assert_eq!(config.documents.cache_path, PathBuf::from("pdf_contexts.json"));
        assert_eq!(config.llm.temperature, 0.2);
        assert_eq!(config.llm.top_k, 40);
        assert_eq!(config.llm.max_output_tokens, 8192);
        assert_eq!(config.classifier.canned_responses.len(), 8);
    }

    #[test]
    fn test_default_canned_answers() {
        let canned = ClassifierConfig::default().canned_responses;
        assert_eq!(canned["hi"], "Hi there! How can I help you?");
        assert_eq!(
            canned["what's your name"],
            "I'm GitHub Copilot, your programming assistant."
        );
        assert_eq!(canned["what day is it"], "Today is a great day to code!");
        assert_eq!(canned["hey"], "Hey there!");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = QaConfig::from_toml("[server]\nport = \"not a port\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_api_key_fails() {
        let llm = LlmConfig {
            api_key_env: "PDF_QA_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..LlmConfig::default()
        };
        let err = llm.api_key().unwrap_err();
        assert!(err.to_string().contains("PDF_QA_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_api_key_from_env() {
        std::env::set_var("PDF_QA_TEST_KEY_SET", "  secret-key ");
        let llm = LlmConfig {
            api_key_env: "PDF_QA_TEST_KEY_SET".to_string(),
            ..LlmConfig::default()
        };
        assert_eq!(llm.api_key().unwrap(), "secret-key");
    }
}
