use async_trait::async_trait;
use memo::domain::response::PutResponse;
use memo::ports::{CachePartition, CacheStorage};
use memo::{CacheKey, StoredEntry};
use moka::Expiry;
use moka::future::Cache;
use shared::Result;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::info;

/// Expires every entry after the `max-age` it was stored with.
/// Entries without the directive never expire on their own.
struct MaxAgeExpiry;

impl Expiry<String, StoredEntry> for MaxAgeExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        value.max_age()
    }

    // An overwrite restarts the clock with the new entry's max-age
    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        value.max_age()
    }
}

/// One named partition backed by its own Moka cache
pub struct MokaPartition {
    cache: Cache<String, StoredEntry>,
}

impl MokaPartition {
    pub fn new(name: &str, max_entries: Option<u64>) -> Self {
        let mut builder = Cache::builder().name(name).expire_after(MaxAgeExpiry);

        if let Some(capacity) = max_entries {
            builder = builder.max_capacity(capacity);
        }

        Self {
            cache: builder.build(),
        }
    }

    /// Approximate number of live entries; run pending maintenance first for an exact figure
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    pub async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }
}

#[async_trait]
impl CachePartition for MokaPartition {
    async fn lookup(&self, key: &CacheKey) -> Result<Option<StoredEntry>> {
        // Expired entries are never returned by Moka
        Ok(self.cache.get(key.as_str()).await)
    }

    async fn put(&self, key: CacheKey, entry: StoredEntry) -> Result<PutResponse> {
        let existed = self.cache.contains_key(key.as_str());
        self.cache.insert(key.into_string(), entry).await;

        if existed {
            Ok(PutResponse::new(false, "Successfully replaced"))
        } else {
            Ok(PutResponse::new(true, "Successfully inserted"))
        }
    }
}

impl Debug for MokaPartition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaPartition")
            .field("name", &self.cache.name())
            .field("entry_count", &self.cache.entry_count())
            .field("weighted_size", &self.cache.weighted_size())
            .finish()
    }
}

/// In-memory cache store handing out Moka partitions by name
#[derive(Clone, Default)]
pub struct MokaCacheStorage {
    // Maps partition name -> partition
    partitions: Arc<RwLock<HashMap<String, Arc<MokaPartition>>>>,
    max_entries: Option<u64>,
}

impl MokaCacheStorage {
    /// Create a store whose partitions are unbounded
    pub fn new_unbounded() -> Self {
        Self::new(None)
    }

    /// Create a store whose partitions each hold at most `max_entries`
    pub fn new_bounded(max_entries: u64) -> Self {
        Self::new(Some(max_entries))
    }

    pub fn new(max_entries: Option<u64>) -> Self {
        Self {
            partitions: Arc::new(RwLock::new(HashMap::new())),
            max_entries,
        }
    }

    /// Get or create the concrete partition called `name`
    pub async fn partition(&self, name: &str) -> Arc<MokaPartition> {
        if let Some(partition) = self.partitions.read().await.get(name) {
            return partition.clone();
        }

        let mut partitions = self.partitions.write().await;
        partitions
            .entry(name.to_string())
            .or_insert_with(|| {
                info!(partition = name, max_entries = ?self.max_entries, "Opening cache partition");
                Arc::new(MokaPartition::new(name, self.max_entries))
            })
            .clone()
    }

    pub async fn partition_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.partitions.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl CacheStorage for MokaCacheStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn CachePartition>> {
        let partition: Arc<dyn CachePartition> = self.partition(name).await;
        Ok(partition)
    }
}

impl Debug for MokaCacheStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCacheStorage")
            .field("partitions", &"<RwLock<HashMap>>")
            .field("max_entries", &self.max_entries)
            .finish()
    }
}
