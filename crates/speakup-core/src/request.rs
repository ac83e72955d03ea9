use std::collections::HashMap;

/// Read-only view of an inbound request as seen by the routing pipeline.
///
/// Missing metadata (no `User-Agent`, unknown peer address) is represented
/// by the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub path: String,
    pub host: String,
    pub user_agent: String,
    pub remote_address: String,
    /// Header values keyed by lower-cased header name.
    pub headers: HashMap<String, String>,
}

impl RequestContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_remote_address(mut self, remote_address: impl Into<String>) -> Self {
        self.remote_address = remote_address.into();
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Header value by case-insensitive name, or `""` when absent.
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Client address: first `X-Forwarded-For` entry, else the peer address.
    pub fn client_ip(&self) -> &str {
        let forwarded = self.header("x-forwarded-for");
        match forwarded.split(',').next().map(str::trim) {
            Some(first) if !first.is_empty() => first,
            _ => self.remote_address.as_str(),
        }
    }
}
