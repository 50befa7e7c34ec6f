//! Folder scanning and per-file text extraction

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::parser::PdfParser;
use crate::error::{Error, Result};
use crate::types::{DocumentText, TextCache};

/// Turns a folder of documents into a [`TextCache`]
#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    extensions: Vec<String>,
}

impl DocumentExtractor {
    /// Create an extractor accepting the given extensions (with or without a leading dot)
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// List eligible files directly inside `folder`, sorted by name.
    ///
    /// A folder that does not exist holds no files.
    pub fn scan(&self, folder: &Path) -> Result<Vec<PathBuf>> {
        if !folder.exists() {
            tracing::warn!("Document folder {} does not exist", folder.display());
            return Ok(Vec::new());
        }
        if !folder.is_dir() {
            return Err(Error::Config(format!(
                "Document folder {} is not a directory",
                folder.display()
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(folder)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            match entry {
                Ok(entry) if entry.path().is_file() && self.accepts(entry.path()) => {
                    files.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping unreadable entry: {}", e),
            }
        }

        Ok(files)
    }

    /// Extract one file. Failures become a placeholder entry.
    pub fn extract_file(&self, path: &Path) -> DocumentText {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        tracing::info!("Processing file: {}", path.display());

        match PdfParser::parse_file(path) {
            Ok(text) => DocumentText::extracted(filename, text),
            Err(e) => {
                tracing::error!("Error reading {}: {}", path.display(), e);
                let detail = match e {
                    Error::FileParse { message, .. } => message,
                    other => other.to_string(),
                };
                DocumentText::failed(filename, detail)
            }
        }
    }

    /// Extract every file; one bad file never stops the others
    pub fn extract(&self, files: &[PathBuf]) -> TextCache {
        let cache = TextCache::from_entries(files.iter().map(|path| self.extract_file(path)));

        tracing::info!(
            "Extracted {} documents ({} failed)",
            cache.len(),
            cache.failed_count()
        );

        cache
    }

    /// Scan `folder` and extract everything found
    pub fn extract_folder(&self, folder: &Path) -> Result<TextCache> {
        let files = self.scan(folder)?;
        Ok(self.extract(&files))
    }
}
