//! Extracted document text and the cache that holds it

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Version of the persisted cache layout
pub const CACHE_FORMAT_VERSION: u32 = 1;

/// Prefix of the text stored for a file that could not be read
pub const PLACEHOLDER_PREFIX: &str = "Error reading PDF: ";

/// Text extracted from one source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentText {
    /// Basename of the source file, unique within a cache
    pub filename: String,
    /// Extracted content, or a placeholder when extraction failed
    pub text: String,
    /// Extraction failure detail
    #[serde(default)]
    pub error: Option<String>,
}

impl DocumentText {
    /// Entry for a successfully extracted file
    pub fn extracted(filename: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            text: text.into(),
            error: None,
        }
    }

    /// Entry for a file whose extraction failed
    pub fn failed(filename: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            filename: filename.into(),
            text: format!("{}{}", PLACEHOLDER_PREFIX, message),
            error: Some(message),
        }
    }

    /// Whether `text` is an error placeholder
    pub fn is_placeholder(&self) -> bool {
        self.error.is_some()
    }
}

/// Mapping from filename to extracted text.
///
/// Instances are immutable once published; a rebuild produces a new cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextCache {
    /// Layout version
    pub version: u32,
    /// When the cache was built
    pub created_at: DateTime<Utc>,
    /// Entries keyed by filename
    pub documents: BTreeMap<String, DocumentText>,
}

impl Default for TextCache {
    fn default() -> Self {
        Self {
            version: CACHE_FORMAT_VERSION,
            created_at: Utc::now(),
            documents: BTreeMap::new(),
        }
    }
}

impl TextCache {
    /// Build a cache from extracted entries
    pub fn from_entries(entries: impl IntoIterator<Item = DocumentText>) -> Self {
        Self {
            documents: entries
                .into_iter()
                .map(|entry| (entry.filename.clone(), entry))
                .collect(),
            ..Self::default()
        }
    }

    /// Number of cached documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Look up one document
    pub fn get(&self, filename: &str) -> Option<&DocumentText> {
        self.documents.get(filename)
    }

    /// Number of entries holding an error placeholder
    pub fn failed_count(&self) -> usize {
        self.documents.values().filter(|d| d.is_placeholder()).count()
    }

    /// Documents targeted by a query, in cache order.
    ///
    /// An empty `requested` list selects every document. Requested names
    /// that are not cached are ignored.
    pub fn select(&self, requested: &[String]) -> Vec<&DocumentText> {
        if requested.is_empty() {
            return self.documents.values().collect();
        }
        self.documents
            .values()
            .filter(|doc| requested.iter().any(|name| name == &doc.filename))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> TextCache {
        TextCache::from_entries([
            DocumentText::extracted("b.pdf", "beta"),
            DocumentText::extracted("a.pdf", "alpha"),
            DocumentText::failed("c.pdf", "invalid file header"),
        ])
    }

    #[test]
    fn test_select_all_when_unspecified() {
        let cache = cache();
        let names: Vec<_> = cache.select(&[]).iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf", "c.pdf"]);
    }

    #[test]
    fn test_select_restricts_to_requested() {
        let cache = cache();
        let requested = vec!["c.pdf".to_string(), "a.pdf".to_string(), "missing.pdf".to_string()];
        let names: Vec<_> = cache
            .select(&requested)
            .iter()
            .map(|d| d.filename.as_str())
            .collect();
        assert_eq!(names, vec!["a.pdf", "c.pdf"]);
    }

    #[test]
    fn test_failed_entry_holds_placeholder() {
        let cache = cache();
        let failed = cache.get("c.pdf").unwrap();
        assert!(failed.is_placeholder());
        assert_eq!(failed.text, "Error reading PDF: invalid file header");
        assert_eq!(cache.failed_count(), 1);
    }

    #[test]
    fn test_json_layout() {
        let json = serde_json::to_value(cache()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["documents"]["a.pdf"]["text"], "alpha");
        assert!(json["documents"]["a.pdf"]["error"].is_null());
        assert_eq!(json["documents"]["c.pdf"]["error"], "invalid file header");
    }
}
