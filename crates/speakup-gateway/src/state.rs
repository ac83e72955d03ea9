use std::sync::Arc;

use speakup_core::ContentRepository;
use speakup_redirector::{
    ArticleRedirector, CachedRepository, LegacyPathCache, LegacyRedirectService, RedirectTable,
    Redirector,
};
use tracing::info;

use crate::config::EdgeConfig;
use crate::error::Result;
use crate::hosts::HostPolicy;
use crate::pipeline::Pipeline;
use crate::redirect_log::RedirectLogger;

#[derive(Debug, Clone)]
pub struct AppState {
    pipeline: Arc<Pipeline>,
    hosts: Arc<HostPolicy>,
    redirect_log: RedirectLogger,
}

impl AppState {
    pub fn new(pipeline: Pipeline, hosts: Arc<HostPolicy>, redirect_log: RedirectLogger) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            hosts,
            redirect_log,
        }
    }

    /// Assembles the standard pipeline over the built-in redirect table.
    pub async fn build<R: ContentRepository>(config: EdgeConfig, repository: R) -> Result<Self> {
        Self::with_table(config, RedirectTable::builtin()?, repository).await
    }

    pub async fn with_table<R: ContentRepository>(
        config: EdgeConfig,
        table: RedirectTable,
        repository: R,
    ) -> Result<Self> {
        let table = Arc::new(table);
        let redirector: Arc<dyn Redirector> = match &config.cache {
            Some(cache) => {
                let cache = LegacyPathCache::from_config(cache.clone());
                let cached = CachedRepository::new(repository, cache);
                Arc::new(LegacyRedirectService::new(
                    table,
                    ArticleRedirector::new(cached, config.article_lookup.clone()),
                ))
            }
            None => Arc::new(LegacyRedirectService::new(
                table,
                ArticleRedirector::new(repository, config.article_lookup.clone()),
            )),
        };

        let hosts = Arc::new(HostPolicy::from_entries(&config.allowed_hosts));
        let redirect_log = match &config.redirect_log {
            Some(log) => RedirectLogger::spawn(log).await?,
            None => RedirectLogger::disabled(),
        };

        let pipeline = Pipeline::standard(&config, hosts.clone(), redirector);
        info!(
            stages = ?pipeline.stage_names(),
            allow_all_hosts = hosts.allows_all(),
            cache = config.cache.is_some(),
            redirect_log = redirect_log.is_enabled(),
            "edge pipeline ready"
        );

        Ok(Self::new(pipeline, hosts, redirect_log))
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn hosts(&self) -> &HostPolicy {
        &self.hosts
    }

    pub fn redirect_log(&self) -> &RedirectLogger {
        &self.redirect_log
    }
}
