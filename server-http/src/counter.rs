use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A single named counter that lives as long as the server
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// Owner name the counter's memoized methods are keyed under
    pub const OWNER: &'static str = "Counter";

    /// Add one and return the new value
    pub fn increment(&self) -> u64 {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Hands out one counter per name, creating it on first use
#[derive(Clone, Debug, Default)]
pub struct CounterNamespace {
    counters: Arc<RwLock<HashMap<String, Arc<Counter>>>>,
}

impl CounterNamespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, name: &str) -> Arc<Counter> {
        if let Some(counter) = self.counters.read().await.get(name) {
            return counter.clone();
        }

        self.counters
            .write()
            .await
            .entry(name.to_string())
            .or_default()
            .clone()
    }
}
