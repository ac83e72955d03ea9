use serde::Serialize;
use std::fmt::Display;

/// Where a redirect decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RedirectKind {
    /// Matched the compiled-in redirect table.
    Static,
    /// Matched a legacy path recorded on a news article.
    Article,
}

impl Display for RedirectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RedirectKind::Static => f.write_str("static"),
            RedirectKind::Article => f.write_str("article"),
        }
    }
}

/// The outcome of redirect resolution for a single request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRedirect {
    pub target_path: String,
    /// Always `true`: every legacy redirect is a 301.
    pub permanent: bool,
    pub kind: RedirectKind,
}

impl ResolvedRedirect {
    pub fn permanent(target_path: impl Into<String>, kind: RedirectKind) -> Self {
        Self {
            target_path: target_path.into(),
            permanent: true,
            kind,
        }
    }
}
