//! User-agent and network heuristics for infrastructure probes and ad bots.

use speakup_core::RequestContext;
use std::fmt::Display;
use typed_builder::TypedBuilder;

pub const DEFAULT_PROBE_AGENT_PREFIXES: &[&str] =
    &["Render/", "kube-probe/", "GoogleHC/", "ELB-HealthChecker/"];
pub const DEFAULT_CLIENT_AGENT_PREFIXES: &[&str] = &["Go-http-client/"];
pub const DEFAULT_INTERNAL_NETWORK_PREFIXES: &[&str] = &["10.", "127.", "::1"];

const ADS_BOT_MARKERS: &[&str] = &["AdsBot-Google", "Mediapartners-Google"];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Prefix lists used to recognise hosting-platform probes.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ProbeRules {
    /// User-agent prefixes of health checkers and load balancers.
    #[builder(default = owned(DEFAULT_PROBE_AGENT_PREFIXES))]
    pub probe_agent_prefixes: Vec<String>,
    /// User-agent prefixes of generic HTTP client libraries.
    #[builder(default = owned(DEFAULT_CLIENT_AGENT_PREFIXES))]
    pub client_agent_prefixes: Vec<String>,
    /// Peer address prefixes of the platform's internal network.
    #[builder(default = owned(DEFAULT_INTERNAL_NETWORK_PREFIXES))]
    pub internal_network_prefixes: Vec<String>,
}

impl Default for ProbeRules {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Why a request was taken for an infrastructure probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeReason {
    ProbeAgent,
    ClientLibrary,
    InternalNetwork,
}

impl Display for ProbeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeReason::ProbeAgent => f.write_str("probe-agent"),
            ProbeReason::ClientLibrary => f.write_str("client-library"),
            ProbeReason::InternalNetwork => f.write_str("internal-network"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_infra_probe: bool,
    pub reason: Option<ProbeReason>,
}

impl Classification {
    fn probe(reason: ProbeReason) -> Self {
        Self {
            is_infra_probe: true,
            reason: Some(reason),
        }
    }

    fn visitor() -> Self {
        Self {
            is_infra_probe: false,
            reason: None,
        }
    }
}

/// Stateless classifier for infrastructure probes.
#[derive(Debug, Clone, Default)]
pub struct ProbeClassifier {
    rules: ProbeRules,
}

impl ProbeClassifier {
    pub fn new(rules: ProbeRules) -> Self {
        Self { rules }
    }

    /// Checks probe agents, then client libraries, then the peer network.
    pub fn classify(&self, ctx: &RequestContext) -> Classification {
        let starts_with_any =
            |value: &str, prefixes: &[String]| prefixes.iter().any(|p| value.starts_with(p.as_str()));

        if starts_with_any(&ctx.user_agent, &self.rules.probe_agent_prefixes) {
            return Classification::probe(ProbeReason::ProbeAgent);
        }
        if starts_with_any(&ctx.user_agent, &self.rules.client_agent_prefixes) {
            return Classification::probe(ProbeReason::ClientLibrary);
        }
        if !ctx.remote_address.is_empty()
            && starts_with_any(&ctx.remote_address, &self.rules.internal_network_prefixes)
        {
            return Classification::probe(ProbeReason::InternalNetwork);
        }
        Classification::visitor()
    }
}

/// Request extension telling handlers whether an ads crawler sent the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdsBot(pub bool);

pub fn is_ads_bot(user_agent: &str) -> bool {
    ADS_BOT_MARKERS.iter().any(|m| user_agent.contains(m))
}
