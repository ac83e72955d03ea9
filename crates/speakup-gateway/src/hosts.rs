//! Host allowlist shared across requests.

use parking_lot::RwLock;
use std::collections::HashSet;
use tracing::trace;

/// Wildcard entry that turns the allowlist off.
pub const ALLOW_ALL: &str = "*";

/// Upper bound on hosts recorded in allow-all mode.
pub const MAX_RECORDED_HOSTS: usize = 256;

/// The set of hostnames the site answers for.
///
/// In allow-all mode every host is accepted and recorded in the set as it is
/// seen, so the set doubles as a record of the hosts actually served. The
/// record stops growing at [`MAX_RECORDED_HOSTS`] entries.
/// Entries starting with `.` match the domain and all of its subdomains.
#[derive(Debug, Default)]
pub struct HostPolicy {
    allow_all: bool,
    hosts: RwLock<HashSet<String>>,
}

impl HostPolicy {
    pub fn new(allow_all: bool, hosts: impl IntoIterator<Item = String>) -> Self {
        let hosts = hosts
            .into_iter()
            .map(|h| canonical_host(&h))
            .filter(|h| !h.is_empty())
            .collect();
        Self {
            allow_all,
            hosts: RwLock::new(hosts),
        }
    }

    /// Builds a policy from configured entries.
    ///
    /// An empty list or a `*` entry selects allow-all mode.
    pub fn from_entries(entries: &[String]) -> Self {
        let entries: Vec<String> = entries
            .iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        let allow_all = entries.is_empty() || entries.iter().any(|e| e == ALLOW_ALL);
        Self::new(
            allow_all,
            entries.into_iter().filter(|e| e != ALLOW_ALL),
        )
    }

    pub fn allows_all(&self) -> bool {
        self.allow_all
    }

    /// Registers `host` when running in allow-all mode. No-op otherwise.
    pub fn relax(&self, host: &str) {
        if !self.allow_all {
            return;
        }
        let host = canonical_host(host);
        if host.is_empty() || self.hosts.read().contains(&host) {
            return;
        }
        let mut hosts = self.hosts.write();
        if hosts.len() >= MAX_RECORDED_HOSTS {
            trace!(host = %host, "host record full, not registering");
            return;
        }
        trace!(host = %host, "registering host");
        hosts.insert(host);
    }

    pub fn is_allowed(&self, host: &str) -> bool {
        if self.allow_all {
            return true;
        }
        let host = canonical_host(host);
        if host.is_empty() {
            return false;
        }
        let hosts = self.hosts.read();
        hosts.contains(&host)
            || hosts.iter().any(|entry| {
                entry.starts_with('.')
                    && (host.ends_with(entry.as_str()) || host == entry[1..])
            })
    }

    /// Snapshot of the known hosts, sorted.
    pub fn hosts(&self) -> Vec<String> {
        let mut hosts: Vec<String> = self.hosts.read().iter().cloned().collect();
        hosts.sort();
        hosts
    }
}

/// Lower-cases `host` and strips a port and a trailing dot.
pub fn canonical_host(host: &str) -> String {
    let host = host.trim();
    let without_port = if host.starts_with('[') {
        match host.find(']') {
            Some(end) => &host[..=end],
            None => host,
        }
    } else {
        match host.rsplit_once(':') {
            Some((name, port)) if port.chars().all(|c| c.is_ascii_digit()) => name,
            _ => host,
        }
    };
    without_port.trim_end_matches('.').to_ascii_lowercase()
}
