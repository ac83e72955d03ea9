use async_trait::async_trait;
use speakup_core::repository::Result;
use speakup_core::{ArticleRecord, ContentRepository, Language};
use tracing::trace;

use crate::cache::LegacyPathCache;

/// A read-only content repository decorator that adds caching.
///
/// Composes any [`ContentRepository`] with a [`LegacyPathCache`]. Lookups
/// check the cache first and fall back to the inner repository; answers
/// from the inner repository, including "not found", are cached.
#[derive(Debug, Clone)]
pub struct CachedRepository<R> {
    inner: R,
    cache: LegacyPathCache,
}

impl<R: ContentRepository> CachedRepository<R> {
    /// Creates a new cached repository decorator.
    ///
    /// # Example
    ///
    /// ```rust
    /// use speakup_redirector::{CachedRepository, LegacyPathCache};
    /// use speakup_storage::InMemoryRepository;
    ///
    /// let cached = CachedRepository::new(InMemoryRepository::new(), LegacyPathCache::new());
    /// ```
    pub fn new(inner: R, cache: LegacyPathCache) -> Self {
        Self { inner, cache }
    }

    /// Returns a reference to the inner repository.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Returns a reference to the cache.
    pub fn cache(&self) -> &LegacyPathCache {
        &self.cache
    }

    /// Drops the cached answer for a legacy path in every language.
    ///
    /// Call after an article's legacy paths change so the next lookup reads
    /// fresh data.
    pub async fn invalidate(&self, path: &str) {
        for language in Language::ALL {
            self.cache.invalidate(path, language).await;
        }
    }
}

#[async_trait]
impl<R: ContentRepository> ContentRepository for CachedRepository<R> {
    async fn find_by_legacy_path(
        &self,
        path: &str,
        language: Language,
    ) -> Result<Option<ArticleRecord>> {
        trace!(path, %language, "fetching legacy path with cache");

        // concurrent lookups of the same key coalesce into one fetch
        self.cache
            .get_or_compute(path, language, || {
                self.inner.find_by_legacy_path(path, language)
            })
            .await
    }
}
