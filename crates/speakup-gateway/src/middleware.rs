use std::borrow::Cow;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use speakup_core::RequestContext;
use tracing::info;

use crate::classify::AdsBot;
use crate::pipeline::{Decision, Exchange, Terminal};
use crate::redirect_log::RedirectEvent;
use crate::state::AppState;

/// Bytes escaped in a `Location` path besides controls and non-ASCII.
const LOCATION: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Runs the edge pipeline in front of the router.
pub async fn edge_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let mut exchange = Exchange::new(request_context(&request));

    match state.pipeline().run(&mut exchange).await {
        Some(decision) => respond(&state, &exchange.ctx, decision),
        None => {
            request.extensions_mut().insert(AdsBot(exchange.ads_bot));
            next.run(request).await
        }
    }
}

fn respond(state: &AppState, ctx: &RequestContext, decision: Decision) -> Response {
    match decision.terminal {
        Terminal::ProbeOk => (StatusCode::OK, "OK").into_response(),
        Terminal::DisallowedHost(_) => (StatusCode::BAD_REQUEST, "Bad Request").into_response(),
        Terminal::Gone => (StatusCode::GONE, "Gone").into_response(),
        Terminal::Redirect(redirect) => {
            info!(
                from = %ctx.path,
                to = %redirect.target_path,
                kind = %redirect.kind,
                "legacy redirect"
            );
            state.redirect_log().record(RedirectEvent::new(ctx, &redirect));
            let location = encode_location(&redirect.target_path);
            (
                StatusCode::MOVED_PERMANENTLY,
                [(header::LOCATION, location)],
            )
                .into_response()
        }
    }
}

/// Builds the pipeline's view of `request`.
///
/// The path is percent-decoded so it compares equal to stored legacy paths.
pub fn request_context(request: &Request) -> RequestContext {
    let raw_path = request.uri().path();
    let path = percent_decode_str(raw_path)
        .decode_utf8()
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw_path.to_string());

    let headers = request.headers();
    let host = header_str(headers, header::HOST.as_str())
        .map(str::to_string)
        .or_else(|| request.uri().authority().map(|a| a.to_string()))
        .unwrap_or_default();
    let user_agent = header_str(headers, header::USER_AGENT.as_str()).unwrap_or_default();
    let remote_address = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default();

    let mut ctx = RequestContext::new(path)
        .with_host(host)
        .with_user_agent(user_agent)
        .with_remote_address(remote_address);
    for name in headers.keys() {
        let values: Vec<&str> = headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect();
        if !values.is_empty() {
            ctx = ctx.with_header(name.as_str(), values.join(", "));
        }
    }
    ctx
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Percent-encodes non-ASCII and unsafe bytes of a redirect target.
pub fn encode_location(target: &str) -> String {
    utf8_percent_encode(target, LOCATION).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn location_keeps_ascii_paths() {
        assert_eq!(encode_location("/news/new-slug"), "/news/new-slug");
        assert_eq!(encode_location("/blog/?page=2"), "/blog/?page=2");
    }

    #[test]
    fn location_escapes_cyrillic() {
        assert_eq!(encode_location("/news/тест"), "/news/%D1%82%D0%B5%D1%81%D1%82");
    }

    #[test]
    fn context_decodes_path_and_reads_headers() {
        let request = Request::builder()
            .uri("/news/%D1%82%D0%B5%D1%81%D1%82/")
            .header("Host", "speakup.com.ua")
            .header("User-Agent", "Mozilla/5.0")
            .header("X-Forwarded-For", "203.0.113.9")
            .body(Body::empty())
            .unwrap();

        let ctx = request_context(&request);
        assert_eq!(ctx.path, "/news/тест/");
        assert_eq!(ctx.host, "speakup.com.ua");
        assert_eq!(ctx.user_agent, "Mozilla/5.0");
        assert_eq!(ctx.client_ip(), "203.0.113.9");
        assert_eq!(ctx.remote_address, "");
    }

    #[test]
    fn context_falls_back_to_uri_authority() {
        let request = Request::builder()
            .uri("http://example.org:8080/about")
            .body(Body::empty())
            .unwrap();

        let ctx = request_context(&request);
        assert_eq!(ctx.host, "example.org:8080");
        assert_eq!(ctx.path, "/about");
    }

    #[test]
    fn context_reads_peer_address() {
        let mut request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let peer: SocketAddr = "10.1.2.3:5555".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));

        assert_eq!(request_context(&request).remote_address, "10.1.2.3");
    }
}
