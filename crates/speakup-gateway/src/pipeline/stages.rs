use std::sync::Arc;

use async_trait::async_trait;
use speakup_redirector::Redirector;
use tracing::debug;

use super::{Exchange, Outcome, Stage, Terminal};
use crate::blocked::BlockedPaths;
use crate::classify::{is_ads_bot, ProbeClassifier};
use crate::hosts::HostPolicy;

/// Registers the request host when the allowlist runs in allow-all mode.
#[derive(Debug)]
pub struct AllowedHostsStage {
    hosts: Arc<HostPolicy>,
}

impl AllowedHostsStage {
    pub fn new(hosts: Arc<HostPolicy>) -> Self {
        Self { hosts }
    }
}

#[async_trait]
impl Stage for AllowedHostsStage {
    fn name(&self) -> &'static str {
        "allowed_hosts"
    }

    async fn handle(&self, exchange: &mut Exchange) -> Outcome {
        self.hosts.relax(&exchange.ctx.host);
        Outcome::Continue
    }
}

/// Answers platform health checks on `/` and the health path.
#[derive(Debug)]
pub struct InfraProbeStage {
    classifier: ProbeClassifier,
    health_path: String,
}

impl InfraProbeStage {
    pub fn new(classifier: ProbeClassifier, health_path: impl Into<String>) -> Self {
        Self {
            classifier,
            health_path: health_path.into(),
        }
    }
}

#[async_trait]
impl Stage for InfraProbeStage {
    fn name(&self) -> &'static str {
        "infra_probe"
    }

    async fn handle(&self, exchange: &mut Exchange) -> Outcome {
        let path = exchange.ctx.path.as_str();
        if path != "/" && path != self.health_path {
            return Outcome::Continue;
        }

        let classification = self.classifier.classify(&exchange.ctx);
        match classification.reason {
            Some(reason) if classification.is_infra_probe => {
                debug!(path, %reason, "answering infrastructure probe");
                Outcome::Respond(Terminal::ProbeOk)
            }
            _ => Outcome::Continue,
        }
    }
}

/// Rejects hosts outside the allowlist.
#[derive(Debug)]
pub struct HostCheckStage {
    hosts: Arc<HostPolicy>,
}

impl HostCheckStage {
    pub fn new(hosts: Arc<HostPolicy>) -> Self {
        Self { hosts }
    }
}

#[async_trait]
impl Stage for HostCheckStage {
    fn name(&self) -> &'static str {
        "host_check"
    }

    async fn handle(&self, exchange: &mut Exchange) -> Outcome {
        if self.hosts.is_allowed(&exchange.ctx.host) {
            Outcome::Continue
        } else {
            debug!(host = %exchange.ctx.host, "host not allowed");
            Outcome::Respond(Terminal::DisallowedHost(exchange.ctx.host.clone()))
        }
    }
}

/// Tags requests from ads crawlers.
#[derive(Debug)]
pub struct AdsBotStage;

#[async_trait]
impl Stage for AdsBotStage {
    fn name(&self) -> &'static str {
        "ads_bot"
    }

    async fn handle(&self, exchange: &mut Exchange) -> Outcome {
        exchange.ads_bot = is_ads_bot(&exchange.ctx.user_agent);
        Outcome::Continue
    }
}

/// Answers removed CMS paths with `410 Gone`.
#[derive(Debug)]
pub struct BlockedPathStage {
    blocked: BlockedPaths,
}

impl BlockedPathStage {
    pub fn new(blocked: BlockedPaths) -> Self {
        Self { blocked }
    }
}

#[async_trait]
impl Stage for BlockedPathStage {
    fn name(&self) -> &'static str {
        "blocked_path"
    }

    async fn handle(&self, exchange: &mut Exchange) -> Outcome {
        if self.blocked.is_blocked(&exchange.ctx.path) {
            debug!(path = %exchange.ctx.path, "blocked legacy CMS path");
            Outcome::Respond(Terminal::Gone)
        } else {
            Outcome::Continue
        }
    }
}

/// Redirects legacy paths to their current location.
pub struct LegacyRedirectStage {
    redirector: Arc<dyn Redirector>,
}

impl LegacyRedirectStage {
    pub fn new(redirector: Arc<dyn Redirector>) -> Self {
        Self { redirector }
    }
}

#[async_trait]
impl Stage for LegacyRedirectStage {
    fn name(&self) -> &'static str {
        "legacy_redirect"
    }

    async fn handle(&self, exchange: &mut Exchange) -> Outcome {
        match self.redirector.resolve(&exchange.ctx.path).await {
            Some(redirect) => Outcome::Respond(Terminal::Redirect(redirect)),
            None => Outcome::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speakup_core::{RequestContext, ResolvedRedirect};

    fn exchange(path: &str) -> Exchange {
        Exchange::new(RequestContext::new(path).with_host("speakup.com.ua"))
    }

    #[tokio::test]
    async fn allowed_hosts_registers_in_allow_all_mode() {
        let hosts = Arc::new(HostPolicy::new(true, Vec::new()));
        let stage = AllowedHostsStage::new(hosts.clone());

        assert_eq!(stage.handle(&mut exchange("/")).await, Outcome::Continue);
        assert_eq!(hosts.hosts(), vec!["speakup.com.ua"]);
    }

    #[tokio::test]
    async fn infra_probe_ignores_visitors() {
        let stage = InfraProbeStage::new(ProbeClassifier::default(), "/health");
        let mut ex = exchange("/");
        ex.ctx.user_agent = "Mozilla/5.0".to_string();

        assert_eq!(stage.handle(&mut ex).await, Outcome::Continue);
    }

    #[tokio::test]
    async fn infra_probe_answers_health_path() {
        let stage = InfraProbeStage::new(ProbeClassifier::default(), "/health");
        let mut ex = exchange("/health");
        ex.ctx.user_agent = "Render/1.0".to_string();

        assert_eq!(
            stage.handle(&mut ex).await,
            Outcome::Respond(Terminal::ProbeOk)
        );
    }

    #[tokio::test]
    async fn host_check_rejects_unknown_host() {
        let hosts = Arc::new(HostPolicy::new(false, vec!["speakup.com.ua".to_string()]));
        let stage = HostCheckStage::new(hosts);

        assert_eq!(stage.handle(&mut exchange("/")).await, Outcome::Continue);

        let mut ex = exchange("/");
        ex.ctx.host = "evil.example".to_string();
        assert_eq!(
            stage.handle(&mut ex).await,
            Outcome::Respond(Terminal::DisallowedHost("evil.example".to_string()))
        );
    }

    #[tokio::test]
    async fn ads_bot_stage_never_answers() {
        let mut ex = exchange("/");
        ex.ctx.user_agent = "Mediapartners-Google".to_string();

        assert_eq!(AdsBotStage.handle(&mut ex).await, Outcome::Continue);
        assert!(ex.ads_bot);
    }

    #[tokio::test]
    async fn blocked_path_stage_answers_gone() {
        let stage = BlockedPathStage::new(BlockedPaths::default());
        assert_eq!(
            stage.handle(&mut exchange("/wp-admin/anything")).await,
            Outcome::Respond(Terminal::Gone)
        );
        assert_eq!(
            stage.handle(&mut exchange("/about")).await,
            Outcome::Continue
        );
    }

    struct FixedRedirector;

    #[async_trait]
    impl Redirector for FixedRedirector {
        async fn resolve(&self, path: &str) -> Option<ResolvedRedirect> {
            (path == "/old").then(|| {
                ResolvedRedirect::permanent("/new", speakup_core::RedirectKind::Static)
            })
        }
    }

    #[tokio::test]
    async fn legacy_redirect_stage_delegates() {
        let stage = LegacyRedirectStage::new(Arc::new(FixedRedirector));
        assert!(matches!(
            stage.handle(&mut exchange("/old")).await,
            Outcome::Respond(Terminal::Redirect(_))
        ));
        assert_eq!(stage.handle(&mut exchange("/other")).await, Outcome::Continue);
    }
}
