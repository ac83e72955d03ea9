use std::path::PathBuf;

use speakup_redirector::{ArticleLookupConfig, CacheConfig};
use typed_builder::TypedBuilder;

use crate::blocked::BlockedPaths;
use crate::classify::ProbeRules;

pub const DEFAULT_HEALTH_PATH: &str = "/health";
/// Events buffered between the request path and the log writer.
pub const DEFAULT_LOG_CAPACITY: usize = 1024;

/// Runtime configuration of the edge layer.
#[derive(Debug, Clone, TypedBuilder)]
pub struct EdgeConfig {
    /// Allowed hostnames. Empty, or containing `*`, allows every host.
    #[builder(default)]
    pub allowed_hosts: Vec<String>,
    #[builder(default)]
    pub probe: ProbeRules,
    #[builder(default)]
    pub blocked: BlockedPaths,
    #[builder(default = DEFAULT_HEALTH_PATH.to_string(), setter(into))]
    pub health_path: String,
    #[builder(default)]
    pub article_lookup: ArticleLookupConfig,
    /// Cache in front of the content repository; `None` disables it.
    #[builder(default = Some(CacheConfig::default()))]
    pub cache: Option<CacheConfig>,
    /// Redirect event log; `None` disables it.
    #[builder(default)]
    pub redirect_log: Option<RedirectLogConfig>,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct RedirectLogConfig {
    /// JSON-lines file the events are appended to.
    #[builder(setter(into))]
    pub path: PathBuf,
    #[builder(default = DEFAULT_LOG_CAPACITY)]
    pub capacity: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_allow_all_hosts_and_cache_lookups() {
        let config = EdgeConfig::default();
        assert!(config.allowed_hosts.is_empty());
        assert_eq!(config.health_path, "/health");
        assert!(config.cache.is_some());
        assert!(config.redirect_log.is_none());
    }

    #[test]
    fn redirect_log_defaults_capacity() {
        let log = RedirectLogConfig::builder().path("/tmp/redirects.jsonl").build();
        assert_eq!(log.capacity, DEFAULT_LOG_CAPACITY);
    }
}
