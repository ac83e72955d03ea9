use std::sync::Arc;
use std::time::Duration;

use speakup_core::path::normalize;
use speakup_core::{
    ArticleRecord, ContentRepository, Language, RedirectKind, ResolvedRedirect, StorageError,
    NEWS_PREFIX,
};
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

/// Default upper bound on the content-store reads of one lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(500);

/// Settings for [`ArticleRedirector`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct ArticleLookupConfig {
    /// Section whose paths are checked against recorded legacy paths.
    #[builder(default = NEWS_PREFIX.to_string(), setter(into))]
    pub prefix: String,
    /// Deadline shared by all repository reads of one lookup; a slow store
    /// degrades to "no match".
    #[builder(default = DEFAULT_LOOKUP_TIMEOUT)]
    pub timeout: Duration,
}

impl Default for ArticleLookupConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Resolves legacy article URLs to the article's canonical path.
#[derive(Debug)]
pub struct ArticleRedirector<R> {
    repository: Arc<R>,
    config: ArticleLookupConfig,
}

impl<R> Clone for ArticleRedirector<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            config: self.config.clone(),
        }
    }
}

impl<R: ContentRepository> ArticleRedirector<R> {
    pub fn new(repository: R, config: ArticleLookupConfig) -> Self {
        Self::from_shared(Arc::new(repository), config)
    }

    pub fn from_shared(repository: Arc<R>, config: ArticleLookupConfig) -> Self {
        Self { repository, config }
    }

    /// Returns `true` when `path` lies under the watched section.
    pub fn watches(&self, path: &str) -> bool {
        path.starts_with(&self.config.prefix) && path != self.config.prefix
    }

    /// Finds an article whose recorded legacy path matches `path`.
    ///
    /// The raw path is tried before its normalized form, and for each form
    /// the default language before the others. The first match wins. Returns
    /// `None` when nothing matches, when the article's canonical path already
    /// equals `path`, or when the store fails. All reads together share one
    /// deadline of [`ArticleLookupConfig::timeout`].
    pub async fn lookup_article_redirect(&self, path: &str) -> Option<ResolvedRedirect> {
        if !self.watches(path) {
            return None;
        }

        match tokio::time::timeout(self.config.timeout, self.search(path)).await {
            Ok(Ok(Some(record))) => self.redirect_for(path, &record),
            Ok(Ok(None)) => {
                trace!(path, "no article owns this legacy path");
                None
            }
            Ok(Err(error)) => {
                warn!(path, %error, "article lookup failed, passing request through");
                None
            }
            Err(_) => {
                warn!(
                    path,
                    timeout_ms = self.config.timeout.as_millis() as u64,
                    "article lookup timed out, passing request through"
                );
                None
            }
        }
    }

    async fn search(&self, path: &str) -> Result<Option<ArticleRecord>, StorageError> {
        let normalized = normalize(path);
        let candidates = if normalized == path {
            vec![path]
        } else {
            vec![path, normalized]
        };

        for candidate in candidates {
            for language in Language::ALL {
                let found = self
                    .repository
                    .find_by_legacy_path(candidate, language)
                    .await?;
                if found.is_some() {
                    return Ok(found);
                }
            }
        }
        Ok(None)
    }

    fn redirect_for(&self, path: &str, record: &ArticleRecord) -> Option<ResolvedRedirect> {
        let target = record.canonical_path();
        if target == path {
            debug!(path, slug = %record.slug_uk, "legacy path is already canonical");
            return None;
        }

        debug!(path, to = %target, slug = %record.slug_uk, "resolved legacy article path");
        Some(ResolvedRedirect::permanent(target, RedirectKind::Article))
    }
}
