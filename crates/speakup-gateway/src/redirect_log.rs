//! Append-only log of served redirects.
//!
//! Events are handed to a bounded channel and written as JSON lines by a
//! single background task, so recording never waits on the file system.

use std::io;

use jiff::Timestamp;
use serde::Serialize;
use speakup_core::{RedirectKind, RequestContext, ResolvedRedirect};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::config::RedirectLogConfig;

/// Longest user agent or referrer kept in an event, in characters.
pub const MAX_FIELD_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectEvent {
    pub timestamp: Timestamp,
    pub old_url: String,
    pub new_url: String,
    pub redirect_type: RedirectKind,
    pub user_agent: String,
    pub referrer: String,
    pub ip: String,
}

impl RedirectEvent {
    pub fn new(ctx: &RequestContext, redirect: &ResolvedRedirect) -> Self {
        Self {
            timestamp: Timestamp::now(),
            old_url: ctx.path.clone(),
            new_url: redirect.target_path.clone(),
            redirect_type: redirect.kind,
            user_agent: truncate(&ctx.user_agent),
            referrer: truncate(ctx.header("referer")),
            ip: ctx.client_ip().to_string(),
        }
    }
}

fn truncate(value: &str) -> String {
    value.chars().take(MAX_FIELD_CHARS).collect()
}

/// Handle used by the request path to record redirects.
#[derive(Debug, Clone, Default)]
pub struct RedirectLogger {
    sender: Option<mpsc::Sender<RedirectEvent>>,
}

impl RedirectLogger {
    /// A logger that drops every event.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Opens the log file and starts the writer task.
    pub async fn spawn(config: &RedirectLogConfig) -> io::Result<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.path)
            .await?;

        let (sender, mut receiver) = mpsc::channel::<RedirectEvent>(config.capacity.max(1));
        let path = config.path.clone();
        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                let mut line = match serde_json::to_vec(&event) {
                    Ok(line) => line,
                    Err(error) => {
                        warn!(%error, "failed to encode redirect event");
                        continue;
                    }
                };
                line.push(b'\n');
                if let Err(error) = file.write_all(&line).await {
                    warn!(%error, path = %path.display(), "failed to write redirect event");
                    continue;
                }
                if let Err(error) = file.flush().await {
                    warn!(%error, path = %path.display(), "failed to flush redirect log");
                }
            }
            debug!(path = %path.display(), "redirect log writer stopped");
        });

        Ok(Self {
            sender: Some(sender),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Queues `event` for writing. Drops it when the queue is full.
    pub fn record(&self, event: RedirectEvent) {
        let Some(sender) = &self.sender else {
            return;
        };
        match sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(old_url = %event.old_url, "redirect log queue full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {
                warn!("redirect log writer is gone");
            }
        }
    }
}
