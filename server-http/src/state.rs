use crate::counter::CounterNamespace;
use memo::{CacheStorage, Memoize, MemoizeOptions};
use shared::config::Config;
use std::sync::Arc;
use storage_engine::MokaCacheStorage;

/// Server state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    pub memo: Memoize,
    pub counters: CounterNamespace,
}

impl AppState {
    pub fn new(storage: Arc<dyn CacheStorage>, options: MemoizeOptions) -> Self {
        Self {
            memo: Memoize::new(storage, options),
            counters: CounterNamespace::new(),
        }
    }

    /// In-memory Moka store configured from the environment-derived config
    pub fn from_config(config: &Config) -> Self {
        tracing::info!(
            cache = %config.cache_name,
            ttl_secs = config.ttl.0,
            max_entries = ?config.max_entries,
            debug = config.debug,
            "Initializing memoization over in-memory store"
        );

        let storage = Arc::new(MokaCacheStorage::new(config.max_entries));
        Self::new(storage, MemoizeOptions::from_config(config))
    }
}
