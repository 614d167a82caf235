use async_trait::async_trait;
use std::collections::HashMap;

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

pub(crate) struct InMemoryCacheStore {
    pub(super) entry: HashMap<String, CacheData>,
}

pub(crate) struct RedisCacheStore {
    pub(super) client: ::redis::Client,
}

/// Key-value substrate for pending ceremony challenges.
///
/// Entries are namespaced by a prefix (the challenge kind) and keyed by the
/// ceremony subject. `put_with_ttl` replaces any pending entry for the same
/// key; `take` reads and deletes in one step so an entry can be consumed
/// exactly once even under concurrent callers.
#[async_trait]
pub(crate) trait CacheStore: Send + Sync + 'static {
    /// Initialize the store. This is called when the store is created.
    async fn init(&self) -> Result<(), StorageError>;

    /// Store an entry, replacing any existing entry under the same key.
    async fn put_with_ttl(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: usize,
    ) -> Result<(), StorageError>;

    /// Get an entry without consuming it. Expired entries read as absent.
    #[allow(dead_code)] // Used in tests
    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError>;

    /// Read and delete an entry in one step. A second call for the same key
    /// before a new `put_with_ttl` returns `None`.
    async fn take(&mut self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError>;

    /// Remove an entry. Removing an absent entry is not an error.
    #[allow(dead_code)] // Used in tests
    async fn remove(&mut self, prefix: &str, key: &str) -> Result<(), StorageError>;
}
