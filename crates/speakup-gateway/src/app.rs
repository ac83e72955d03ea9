use axum::routing::get;
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::handlers::{fallback_handler, health_handler};
use crate::middleware::edge_middleware;
use crate::state::AppState;

pub struct App {}

impl App {
    /// The edge router: the pipeline in front of the health route and a 404
    /// fallback.
    pub fn router(state: AppState) -> Router {
        let routes = Router::new()
            .route("/health", get(health_handler))
            .fallback(fallback_handler);
        Self::wrap(routes, state)
    }

    /// Puts the edge pipeline and request tracing in front of `routes`.
    pub fn wrap(routes: Router, state: AppState) -> Router {
        routes
            .layer(middleware::from_fn_with_state(state, edge_middleware))
            .layer(TraceLayer::new_for_http())
    }
}
