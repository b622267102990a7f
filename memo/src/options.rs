use crate::key::{KeyGenerator, UrlKeyGenerator};
use shared::TtlSecs;
use shared::config::Config;
use std::sync::Arc;

/// What to do after the cache layer fails for a call
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Return the value the miss path already computed; invoke the function
    /// only if it has not run yet. The function runs at most once per call.
    #[default]
    ReuseComputed,
    /// Always invoke the function again. Only safe for idempotent functions.
    Reinvoke,
}

#[derive(Clone)]
pub struct MemoizeOptions {
    pub cache_name: String,
    pub ttl: TtlSecs,
    pub key_generator: Arc<dyn KeyGenerator>,
    pub debug: bool,
    pub fallback: FallbackPolicy,
}

impl MemoizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_cache_name(config.cache_name.clone())
            .with_ttl(config.ttl)
            .with_debug(config.debug)
    }

    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = name.into();
        self
    }

    pub fn with_ttl(mut self, ttl: TtlSecs) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_key_generator(mut self, generator: impl KeyGenerator) -> Self {
        self.key_generator = Arc::new(generator);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }
}

impl Default for MemoizeOptions {
    fn default() -> Self {
        Self {
            cache_name: Config::DEFAULT_CACHE_NAME.to_string(),
            ttl: TtlSecs::DEFAULT,
            key_generator: Arc::new(UrlKeyGenerator::new()),
            debug: false,
            fallback: FallbackPolicy::default(),
        }
    }
}

impl std::fmt::Debug for MemoizeOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoizeOptions")
            .field("cache_name", &self.cache_name)
            .field("ttl", &self.ttl)
            .field("key_generator", &"<dyn KeyGenerator>")
            .field("debug", &self.debug)
            .field("fallback", &self.fallback)
            .finish()
    }
}
