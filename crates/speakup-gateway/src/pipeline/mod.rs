//! Ordered request pipeline run before route dispatch.
//!
//! Every inbound request passes through a fixed list of named stages. A
//! stage either lets the request continue or answers it with a
//! [`Terminal`] response, which ends the pipeline. The order is part of the
//! contract: probes are answered before host validation, and blocked paths
//! are answered before any redirect is considered.

pub mod stages;

use std::sync::Arc;

use async_trait::async_trait;
use speakup_core::{RequestContext, ResolvedRedirect};
use speakup_redirector::Redirector;
use tracing::trace;

use crate::classify::ProbeClassifier;
use crate::config::EdgeConfig;
use crate::hosts::HostPolicy;
use stages::{
    AdsBotStage, AllowedHostsStage, BlockedPathStage, HostCheckStage, InfraProbeStage,
    LegacyRedirectStage,
};

/// A response that ends the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// `200 OK`, plain-text `OK`, for infrastructure probes.
    ProbeOk,
    /// `400 Bad Request` for a host outside the allowlist.
    DisallowedHost(String),
    /// `410 Gone` for a removed CMS path.
    Gone,
    /// `301 Moved Permanently` to the resolved location.
    Redirect(ResolvedRedirect),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Respond(Terminal),
}

/// Per-request state carried through the stages.
#[derive(Debug, Clone, Default)]
pub struct Exchange {
    pub ctx: RequestContext,
    pub ads_bot: bool,
}

impl Exchange {
    pub fn new(ctx: RequestContext) -> Self {
        Self {
            ctx,
            ads_bot: false,
        }
    }
}

#[async_trait]
pub trait Stage: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    async fn handle(&self, exchange: &mut Exchange) -> Outcome;
}

/// The outcome of a full pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Name of the stage that answered the request.
    pub stage: &'static str,
    pub terminal: Terminal,
}

/// An explicit, ordered list of stages.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// The standard edge pipeline.
    pub fn standard(
        config: &EdgeConfig,
        hosts: Arc<HostPolicy>,
        redirector: Arc<dyn Redirector>,
    ) -> Self {
        Self::new(vec![
            Box::new(AllowedHostsStage::new(hosts.clone())),
            Box::new(InfraProbeStage::new(
                ProbeClassifier::new(config.probe.clone()),
                config.health_path.clone(),
            )),
            Box::new(HostCheckStage::new(hosts)),
            Box::new(AdsBotStage),
            Box::new(BlockedPathStage::new(config.blocked.clone())),
            Box::new(LegacyRedirectStage::new(redirector)),
        ])
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Runs the stages in order until one answers the request.
    ///
    /// Returns `None` when the request should be dispatched to the router.
    pub async fn run(&self, exchange: &mut Exchange) -> Option<Decision> {
        for stage in &self.stages {
            match stage.handle(exchange).await {
                Outcome::Continue => {
                    trace!(stage = stage.name(), path = %exchange.ctx.path, "continue");
                }
                Outcome::Respond(terminal) => {
                    trace!(stage = stage.name(), path = %exchange.ctx.path, "answered");
                    return Some(Decision {
                        stage: stage.name(),
                        terminal,
                    });
                }
            }
        }
        None
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}
