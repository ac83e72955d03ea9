use clap::{Parser, ValueEnum};
use speakup_gateway::blocked::BlockedPaths;
use speakup_gateway::classify::ProbeRules;
use speakup_gateway::config::DEFAULT_HEALTH_PATH;
use speakup_gateway::{EdgeConfig, RedirectLogConfig};
use speakup_redirector::{ArticleLookupConfig, CacheConfig};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const LISTEN_ADDR_ENV: &str = "SPEAKUP_EDGE_LISTEN_ADDR";
pub const ALLOWED_HOSTS_ENV: &str = "SPEAKUP_EDGE_ALLOWED_HOSTS";
pub const STORAGE_BACKEND_ENV: &str = "SPEAKUP_EDGE_STORAGE_BACKEND";
pub const DATABASE_URL_ENV: &str = "SPEAKUP_EDGE_DATABASE_URL";
pub const RUN_MIGRATIONS_ENV: &str = "SPEAKUP_EDGE_RUN_MIGRATIONS";
pub const LOOKUP_TIMEOUT_MS_ENV: &str = "SPEAKUP_EDGE_LOOKUP_TIMEOUT_MS";
pub const CACHE_CAPACITY_ENV: &str = "SPEAKUP_EDGE_CACHE_CAPACITY";
pub const CACHE_TTL_SECS_ENV: &str = "SPEAKUP_EDGE_CACHE_TTL_SECS";
pub const PROBE_AGENTS_ENV: &str = "SPEAKUP_EDGE_PROBE_AGENT_PREFIXES";
pub const CLIENT_AGENTS_ENV: &str = "SPEAKUP_EDGE_CLIENT_AGENT_PREFIXES";
pub const INTERNAL_NETWORKS_ENV: &str = "SPEAKUP_EDGE_INTERNAL_NETWORK_PREFIXES";
pub const HEALTH_PATH_ENV: &str = "SPEAKUP_EDGE_HEALTH_PATH";
pub const REDIRECT_LOG_ENV: &str = "SPEAKUP_EDGE_REDIRECT_LOG";
pub const REDIRECT_LOG_PATH_ENV: &str = "SPEAKUP_EDGE_REDIRECT_LOG_PATH";
pub const LOG_FORMAT_ENV: &str = "SPEAKUP_EDGE_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_LOOKUP_TIMEOUT_MS: u64 = 500;
pub const DEFAULT_CACHE_CAPACITY: u64 = 10_000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_REDIRECT_LOG_PATH: &str = "logs/redirects.jsonl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "postgres")]
    Postgres,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "speakup-edge")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Comma-separated hostnames; empty or `*` allows every host.
    #[arg(long, env = ALLOWED_HOSTS_ENV, value_delimiter = ',')]
    pub allowed_hosts: Vec<String>,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = DATABASE_URL_ENV, required_if_eq("storage", "postgres"))]
    pub database_url: Option<String>,

    /// Create the `news_articles` table if it is missing.
    #[arg(long, env = RUN_MIGRATIONS_ENV)]
    pub run_migrations: bool,

    #[arg(long, env = LOOKUP_TIMEOUT_MS_ENV, default_value_t = DEFAULT_LOOKUP_TIMEOUT_MS)]
    pub lookup_timeout_ms: u64,

    /// Maximum cached legacy-path lookups; 0 disables the cache.
    #[arg(long, env = CACHE_CAPACITY_ENV, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: u64,

    #[arg(long, env = CACHE_TTL_SECS_ENV, default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl_secs: u64,

    /// Overrides the built-in health-checker user-agent prefixes.
    #[arg(long, env = PROBE_AGENTS_ENV, value_delimiter = ',')]
    pub probe_agent_prefixes: Vec<String>,

    /// Overrides the built-in HTTP client library prefixes.
    #[arg(long, env = CLIENT_AGENTS_ENV, value_delimiter = ',')]
    pub client_agent_prefixes: Vec<String>,

    /// Overrides the built-in internal network address prefixes.
    #[arg(long, env = INTERNAL_NETWORKS_ENV, value_delimiter = ',')]
    pub internal_network_prefixes: Vec<String>,

    #[arg(long, env = HEALTH_PATH_ENV, default_value = DEFAULT_HEALTH_PATH)]
    pub health_path: String,

    /// Record every served redirect as a JSON line.
    #[arg(long, env = REDIRECT_LOG_ENV)]
    pub redirect_log: bool,

    #[arg(long, env = REDIRECT_LOG_PATH_ENV, default_value = DEFAULT_REDIRECT_LOG_PATH)]
    pub redirect_log_path: PathBuf,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl CLI {
    pub fn edge_config(&self) -> EdgeConfig {
        let defaults = ProbeRules::default();
        let probe = ProbeRules::builder()
            .probe_agent_prefixes(or_default(
                &self.probe_agent_prefixes,
                defaults.probe_agent_prefixes,
            ))
            .client_agent_prefixes(or_default(
                &self.client_agent_prefixes,
                defaults.client_agent_prefixes,
            ))
            .internal_network_prefixes(or_default(
                &self.internal_network_prefixes,
                defaults.internal_network_prefixes,
            ))
            .build();

        let cache = (self.cache_capacity > 0).then(|| {
            CacheConfig::builder()
                .max_capacity(self.cache_capacity)
                .ttl(Duration::from_secs(self.cache_ttl_secs))
                .build()
        });

        let redirect_log = self.redirect_log.then(|| {
            RedirectLogConfig::builder()
                .path(self.redirect_log_path.clone())
                .build()
        });

        EdgeConfig::builder()
            .allowed_hosts(self.allowed_hosts.clone())
            .probe(probe)
            .blocked(BlockedPaths::default())
            .health_path(self.health_path.clone())
            .article_lookup(
                ArticleLookupConfig::builder()
                    .timeout(Duration::from_millis(self.lookup_timeout_ms))
                    .build(),
            )
            .cache(cache)
            .redirect_log(redirect_log)
            .build()
    }
}

/// Trimmed non-blank entries of `values`, or `defaults` when none remain.
fn or_default(values: &[String], defaults: Vec<String>) -> Vec<String> {
    let values: Vec<String> = values
        .iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    if values.is_empty() {
        defaults
    } else {
        values
    }
}
