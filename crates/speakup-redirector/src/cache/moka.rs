use moka::future::Cache;
use speakup_core::repository::Result;
use speakup_core::{ArticleRecord, Language};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Default number of legacy-path lookups kept in memory.
pub const DEFAULT_CAPACITY: u64 = 10_000;
/// Default lifetime of a cached lookup.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

type Key = (Language, String);

/// An in-memory cache of legacy-path lookups using Moka.
///
/// Misses are cached as well as hits: most article paths are current ones
/// that never match a legacy path, and caching the miss keeps them off the
/// database. The TTL bounds how long an edited article keeps its old answer.
#[derive(Debug, Clone)]
pub struct LegacyPathCache {
    // Option<ArticleRecord> so "not found" is cached under single-flight too
    cache: Cache<Key, Option<ArticleRecord>>,
}

impl LegacyPathCache {
    /// Creates a cache with the default capacity and TTL.
    pub fn new() -> Self {
        Self::from_config(CacheConfig::default())
    }

    /// Creates a cache with a custom maximum capacity and TTL.
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self::from_config(CacheConfig::builder().max_capacity(max_capacity).ttl(ttl).build())
    }

    pub fn from_config(config: CacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .build();
        Self { cache }
    }

    /// Returns the cached answer for `path`, if one is held.
    ///
    /// The outer `Option` is presence in the cache, the inner one the answer.
    pub async fn get(&self, path: &str, language: Language) -> Option<Option<ArticleRecord>> {
        let found = self.cache.get(&(language, path.to_string())).await;
        match found {
            Some(_) => debug!(path, %language, "legacy path cache hit"),
            None => trace!(path, %language, "legacy path cache miss"),
        }
        found
    }

    pub async fn insert(&self, path: &str, language: Language, record: Option<ArticleRecord>) {
        self.cache.insert((language, path.to_string()), record).await;
    }

    pub async fn invalidate(&self, path: &str, language: Language) {
        trace!(path, %language, "invalidating legacy path cache entry");
        self.cache.invalidate(&(language, path.to_string())).await;
    }

    /// Returns the cached answer, computing it with `fetch` on a miss.
    ///
    /// Concurrent callers for the same key share a single fetch. Errors are
    /// returned to every waiter and are not cached.
    pub async fn get_or_compute<F, Fut>(
        &self,
        path: &str,
        language: Language,
        fetch: F,
    ) -> Result<Option<ArticleRecord>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<ArticleRecord>>>,
    {
        self.cache
            .try_get_with((language, path.to_string()), async {
                trace!(path, %language, "cache miss, performing single-flight fetch");
                fetch().await
            })
            .await
            .map_err(|e| e.as_ref().clone())
    }
}

impl Default for LegacyPathCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for creating a [`LegacyPathCache`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default = DEFAULT_CAPACITY)]
    pub max_capacity: u64,
    /// Time-to-live for cache entries.
    #[builder(default = DEFAULT_TTL)]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
