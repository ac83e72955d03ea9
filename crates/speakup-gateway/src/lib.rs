//! HTTP edge for the SpeakUp site.
//!
//! Every request passes an ordered [`Pipeline`] before reaching the router:
//! host allowlisting, infrastructure probe answers, blocked CMS paths and
//! legacy-URL redirects. The binary in `bin/http` wires it to a content
//! store and serves it with axum.

pub mod app;
pub mod blocked;
pub mod classify;
pub mod config;
pub mod error;
pub mod handlers;
pub mod hosts;
pub mod middleware;
pub mod model;
pub mod pipeline;
pub mod redirect_log;
pub mod state;

pub use app::App;
pub use config::{EdgeConfig, RedirectLogConfig};
pub use error::{GatewayError, Result};
pub use pipeline::{Decision, Exchange, Outcome, Pipeline, Stage, Terminal};
pub use redirect_log::{RedirectEvent, RedirectLogger};
pub use state::AppState;
