mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StorageError;
use async_trait::async_trait;

/// Persisted long URL -> short URL association.
///
/// Keys are unique; `save` on an existing key overwrites it. Implementations
/// never report an empty short URL.
#[async_trait]
pub trait MappingStore: Send + Sync + 'static {
    /// Return the short URL stored for `long_url`, if any.
    async fn lookup(&self, long_url: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite the mapping for `long_url`.
    async fn save(&self, long_url: &str, short_url: &str) -> Result<(), StorageError>;
}
