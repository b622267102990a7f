use crate::domain::{CacheKey, StoredEntry};
use crate::key::{ArgumentList, Invocation};
use crate::options::{FallbackPolicy, MemoizeOptions};
use crate::ports::CacheStorage;
use crate::stats::{AtomicStats, MemoStats};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error};

/// Read-through memoization of async functions over an injected cache store.
///
/// Clones share the store handle and the statistics counters.
#[derive(Clone)]
pub struct Memoize {
    storage: Arc<dyn CacheStorage>,
    options: MemoizeOptions,
    stats: Arc<AtomicStats>,
}

/// A cache-layer error plus whatever the miss path had computed before it hit
struct CacheFailure<T> {
    error: shared::Error,
    computed: Option<T>,
}

impl<T> From<shared::Error> for CacheFailure<T> {
    fn from(error: shared::Error) -> Self {
        Self {
            error,
            computed: None,
        }
    }
}

impl Memoize {
    pub fn new(storage: Arc<dyn CacheStorage>, options: MemoizeOptions) -> Self {
        Self {
            storage,
            options,
            stats: Arc::new(AtomicStats::default()),
        }
    }

    pub fn stats(&self) -> MemoStats {
        self.stats.snapshot()
    }

    /// Wrap `f` so that [`Memoized::call`] caches its results under `owner` and `method`
    pub fn wrap<F>(&self, owner: impl Into<String>, method: impl Into<String>, f: F) -> Memoized<F> {
        Memoized {
            memo: self.clone(),
            owner: owner.into(),
            method: method.into(),
            f,
        }
    }

    /// Run `f` through the cache.
    ///
    /// On a hit the stored value is returned and `f` is not invoked. On a miss
    /// `f` runs once and its result is stored for the configured ttl. Errors
    /// from `f` itself are returned unchanged and never cached. Cache-layer
    /// errors are logged and resolved by the configured [`FallbackPolicy`].
    pub async fn call<A, T, E, F, Fut>(&self, owner: &str, method: &str, args: &A, f: F) -> Result<T, E>
    where
        A: ArgumentList + ?Sized,
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let key = match Invocation::new(owner, method, args, self.options.ttl)
            .and_then(|invocation| self.options.key_generator.generate(&invocation))
        {
            Ok(key) => key,
            Err(error) => return self.bypass(None, CacheFailure::from(error), &f).await,
        };

        match self.read_through(&key, &f).await {
            Ok(result) => result,
            Err(failure) => self.bypass(Some(&key), failure, &f).await,
        }
    }

    async fn read_through<T, E, F, Fut>(
        &self,
        key: &CacheKey,
        f: &F,
    ) -> Result<Result<T, E>, CacheFailure<T>>
    where
        T: Serialize + DeserializeOwned,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let cache_name = self.options.cache_name.as_str();
        let partition = self.storage.open(cache_name).await?;

        if let Some(entry) = partition.lookup(key).await? {
            let value = entry.decode::<T>()?;
            AtomicStats::incr(&self.stats.hits);
            if self.options.debug {
                debug!(cache = cache_name, key = %key, "HIT");
            }
            return Ok(Ok(value));
        }

        AtomicStats::incr(&self.stats.misses);
        if self.options.debug {
            debug!(cache = cache_name, key = %key, "MISS");
        }

        let value = match f().await {
            Ok(value) => value,
            Err(e) => return Ok(Err(e)),
        };

        let entry = match StoredEntry::json(&value, self.options.ttl) {
            Ok(entry) => entry,
            Err(error) => {
                return Err(CacheFailure {
                    error,
                    computed: Some(value),
                });
            }
        };

        if let Err(error) = partition.put(key.clone(), entry).await {
            return Err(CacheFailure {
                error,
                computed: Some(value),
            });
        }

        AtomicStats::incr(&self.stats.stores);
        if self.options.debug {
            debug!(cache = cache_name, key = %key, ttl = self.options.ttl.0, "STORED");
        }

        Ok(Ok(value))
    }

    async fn bypass<T, E, F, Fut>(
        &self,
        key: Option<&CacheKey>,
        failure: CacheFailure<T>,
        f: &F,
    ) -> Result<T, E>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        AtomicStats::incr(&self.stats.errors);
        let key = key.map_or("<underivable>", CacheKey::as_str);
        error!(
            cache = %self.options.cache_name,
            key,
            error = %failure.error,
            "cache layer failed, bypassing cache"
        );

        match (self.options.fallback, failure.computed) {
            (FallbackPolicy::ReuseComputed, Some(value)) => Ok(value),
            _ => {
                AtomicStats::incr(&self.stats.bypassed);
                f().await
            }
        }
    }
}

impl std::fmt::Debug for Memoize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memoize")
            .field("options", &self.options)
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}

/// A function wrapped by [`Memoize::wrap`]
pub struct Memoized<F> {
    memo: Memoize,
    owner: String,
    method: String,
    f: F,
}

impl<F> Memoized<F> {
    /// Same arguments and result as the wrapped function, with caching layered on top
    pub async fn call<A, T, E, Fut>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Fut,
        A: ArgumentList + Clone,
        T: Serialize + DeserializeOwned,
        Fut: Future<Output = Result<T, E>>,
    {
        self.memo
            .call(&self.owner, &self.method, &args, || (self.f)(args.clone()))
            .await
    }
}
