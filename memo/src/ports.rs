#![deny(clippy::all)]

use crate::domain::response::PutResponse;
use crate::domain::{CacheKey, StoredEntry};
use async_trait::async_trait;
use shared::Result;
use std::sync::Arc;

// Ports are the pluggable extension points for the underlying key/value store

/// Port for opening named cache partitions
#[async_trait]
pub trait CacheStorage: Send + Sync + 'static {
    /// Open the partition called `name`, creating it on first use. Safe to call on every request.
    async fn open(&self, name: &str) -> Result<Arc<dyn CachePartition>>;
}

/// Port for entry operations within one partition
#[async_trait]
pub trait CachePartition: Send + Sync + 'static {
    /// Return the live entry stored under `key`, if any
    async fn lookup(&self, key: &CacheKey) -> Result<Option<StoredEntry>>;

    /// Store `entry` under `key`, replacing any previous entry
    async fn put(&self, key: CacheKey, entry: StoredEntry) -> Result<PutResponse>;
}
