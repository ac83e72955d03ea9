use std::sync::Arc;

use crate::article::ArticleRedirector;
use crate::redirector::Redirector;
use crate::table::RedirectTable;
use async_trait::async_trait;
use speakup_core::{ContentRepository, RedirectKind, ResolvedRedirect};
use tracing::{debug, trace};

/// Service resolving legacy paths to their current location.
///
/// The static table is consulted first; paths under the article section then
/// fall back to the legacy paths recorded on articles.
#[derive(Debug)]
pub struct LegacyRedirectService<R> {
    table: Arc<RedirectTable>,
    articles: ArticleRedirector<R>,
}

impl<R> Clone for LegacyRedirectService<R> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            articles: self.articles.clone(),
        }
    }
}

impl<R: ContentRepository> LegacyRedirectService<R> {
    pub fn new(table: Arc<RedirectTable>, articles: ArticleRedirector<R>) -> Self {
        Self { table, articles }
    }

    pub fn table(&self) -> &RedirectTable {
        &self.table
    }

    /// Resolves `path` against the static table, then the article lookup.
    pub async fn resolve(&self, path: &str) -> Option<ResolvedRedirect> {
        Redirector::resolve(self, path).await
    }
}

#[async_trait]
impl<R: ContentRepository> Redirector for LegacyRedirectService<R> {
    async fn resolve(&self, path: &str) -> Option<ResolvedRedirect> {
        trace!(path, "resolving legacy path");

        if let Some(target) = self.table.lookup_static(path) {
            debug!(path, to = target, "static redirect");
            return Some(ResolvedRedirect::permanent(target, RedirectKind::Static));
        }

        self.articles.lookup_article_redirect(path).await
    }
}
