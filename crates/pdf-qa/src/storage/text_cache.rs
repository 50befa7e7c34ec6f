//! Text cache store: load-or-create at startup, full rebuild on request

use parking_lot::RwLock;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

use crate::config::DocumentsConfig;
use crate::error::{Error, Result};
use crate::ingestion::DocumentExtractor;
use crate::types::document::CACHE_FORMAT_VERSION;
use crate::types::TextCache;

/// Outcome of a rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReinitStatus {
    /// Documents were found and extracted
    Initialized { documents: usize, failed: usize },
    /// The folder held no eligible files; the cache is now empty
    NoFiles,
}

impl ReinitStatus {
    /// Message returned to callers of `/init`
    pub fn message(&self) -> &'static str {
        match self {
            ReinitStatus::Initialized { .. } => {
                "PDF contexts initialized/re-initialized successfully"
            }
            ReinitStatus::NoFiles => "No PDF files found in the specified folder",
        }
    }

    /// Number of documents now cached
    pub fn documents(&self) -> usize {
        match self {
            ReinitStatus::Initialized { documents, .. } => *documents,
            ReinitStatus::NoFiles => 0,
        }
    }
}

/// Owns the in-memory cache snapshot and its persisted copy.
///
/// Readers take an `Arc` snapshot and keep it for as long as they need it;
/// a rebuild publishes a fully built replacement in one pointer swap.
pub struct TextCacheStore {
    folder: PathBuf,
    cache_path: PathBuf,
    extractor: DocumentExtractor,
    current: RwLock<Arc<TextCache>>,
    /// Serializes rebuilds so two `/init` calls never interleave file writes
    rebuild_lock: tokio::sync::Mutex<()>,
}

impl TextCacheStore {
    /// Create a store with an empty cache, without touching disk
    pub fn new(config: &DocumentsConfig) -> Self {
        Self {
            folder: config.folder.clone(),
            cache_path: config.cache_path.clone(),
            extractor: DocumentExtractor::new(&config.extensions),
            current: RwLock::new(Arc::new(TextCache::default())),
            rebuild_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Create a store and load the persisted cache, extracting the folder if there is none
    pub async fn open(config: &DocumentsConfig) -> Result<Self> {
        let store = Self::new(config);

        let folder = store.folder.clone();
        let cache_path = store.cache_path.clone();
        let extractor = store.extractor.clone();
        let cache = tokio::task::spawn_blocking(move || {
            load_or_create(&folder, &cache_path, &extractor)
        })
        .await
        .map_err(|e| Error::internal(format!("Cache loading task failed: {}", e)))??;

        *store.current.write() = Arc::new(cache);
        Ok(store)
    }

    /// Current cache snapshot
    pub fn snapshot(&self) -> Arc<TextCache> {
        self.current.read().clone()
    }

    /// Folder scanned for documents
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Rescan the folder, re-extract every file, persist, then publish.
    ///
    /// The previous cache stays visible to readers until the new one is
    /// complete and written to disk.
    pub async fn reinitialize(&self) -> Result<ReinitStatus> {
        let _guard = self.rebuild_lock.lock().await;

        let folder = self.folder.clone();
        let cache_path = self.cache_path.clone();
        let extractor = self.extractor.clone();
        let cache = tokio::task::spawn_blocking(move || -> Result<TextCache> {
            let cache = extractor.extract_folder(&folder)?;
            persist_cache(&cache_path, &cache)?;
            Ok(cache)
        })
        .await
        .map_err(|e| Error::internal(format!("Extraction task failed: {}", e)))??;

        let status = if cache.is_empty() {
            ReinitStatus::NoFiles
        } else {
            ReinitStatus::Initialized {
                documents: cache.len(),
                failed: cache.failed_count(),
            }
        };

        *self.current.write() = Arc::new(cache);
        tracing::info!("Text cache reinitialized: {:?}", status);

        Ok(status)
    }
}

fn load_or_create(
    folder: &Path,
    cache_path: &Path,
    extractor: &DocumentExtractor,
) -> Result<TextCache> {
    match read_cache(cache_path) {
        Ok(Some(cache)) => {
            tracing::info!(
                "Loaded {} documents from {}",
                cache.len(),
                cache_path.display()
            );
            return Ok(cache);
        }
        Ok(None) => {
            tracing::info!(
                "No text cache at {}, extracting documents from {}",
                cache_path.display(),
                folder.display()
            );
        }
        Err(e) => {
            tracing::warn!(
                "Could not load text cache {}: {}, rebuilding",
                cache_path.display(),
                e
            );
        }
    }

    let cache = extractor.extract_folder(folder)?;
    persist_cache(cache_path, &cache)?;
    Ok(cache)
}

/// Read a persisted cache. `Ok(None)` when the file does not exist.
pub fn read_cache(path: &Path) -> Result<Option<TextCache>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let cache: TextCache = serde_json::from_str(&content)?;
    if cache.version != CACHE_FORMAT_VERSION {
        return Err(Error::internal(format!(
            "Unsupported text cache version {}",
            cache.version
        )));
    }

    Ok(Some(cache))
}

/// Write the cache through a temporary file renamed over `path`
pub fn persist_cache(path: &Path, cache: &TextCache) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&serde_json::to_vec_pretty(cache)?)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Persisted {} documents to {}", cache.len(), path.display());
    Ok(())
}
