use async_trait::async_trait;
use speakup_core::ResolvedRedirect;

#[async_trait]
pub trait Redirector: Send + Sync + 'static {
    /// Resolves a request path to its current location.
    /// Returns `None` when the path is not a known legacy path.
    async fn resolve(&self, path: &str) -> Option<ResolvedRedirect>;
}
