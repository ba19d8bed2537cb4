use crate::{error::StorageError, store::MappingStore};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe in-memory mapping store: long URL -> short URL.
///
/// Backed by a DashMap so reads are concurrent and lock-free for most cases.
/// Nothing survives a restart; used with `STORAGE_BACKEND=memory` and as the
/// fake store in tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MappingStore for MemoryStore {
    async fn lookup(&self, long_url: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .inner
            .get(long_url)
            .map(|v| v.clone())
            .filter(|short_url| !short_url.is_empty()))
    }

    async fn save(&self, long_url: &str, short_url: &str) -> Result<(), StorageError> {
        self.inner.insert(long_url.to_owned(), short_url.to_owned());
        Ok(())
    }
}
