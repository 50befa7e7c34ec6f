//! Storage module for the extracted-text cache
//!
//! The cache is persisted as a JSON file next to the service and rebuilt
//! from the document folder on demand.

mod text_cache;

pub use text_cache::{persist_cache, read_cache, ReinitStatus, TextCacheStore};
