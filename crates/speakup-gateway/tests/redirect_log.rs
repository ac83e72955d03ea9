use std::path::Path;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use speakup_gateway::{App, AppState, EdgeConfig, RedirectLogConfig};
use speakup_storage::InMemoryRepository;
use tower::ServiceExt;

fn read_events(path: &Path) -> Vec<serde_json::Value> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn served_redirects_are_written_as_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("logs").join("redirects.jsonl");
    let config = EdgeConfig::builder()
        .redirect_log(Some(RedirectLogConfig::builder().path(log_path.clone()).build()))
        .build();
    let state = AppState::build(config, InMemoryRepository::new()).await.unwrap();
    let router = App::router(state);

    let request = Request::builder()
        .uri("/faqs/")
        .header(header::HOST, "speakup.com.ua")
        .header(header::USER_AGENT, "U".repeat(300))
        .header(header::REFERER, "https://www.google.com/")
        .header("x-forwarded-for", "203.0.113.9, 10.0.0.1")
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);

    // pass-through requests are not logged
    let request = Request::builder()
        .uri("/programs/toefl")
        .header(header::HOST, "speakup.com.ua")
        .body(Body::empty())
        .unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let path = log_path.as_path();
    awaitility::at_most(Duration::from_secs(5))
        .poll_interval(Duration::from_millis(20))
        .until_async(move || async move { !read_events(path).is_empty() })
        .await;

    let events = read_events(&log_path);
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event["old_url"], "/faqs/");
    assert_eq!(event["new_url"], "/faq");
    assert_eq!(event["redirect_type"], "static");
    assert_eq!(event["referrer"], "https://www.google.com/");
    assert_eq!(event["ip"], "203.0.113.9");
    assert_eq!(event["user_agent"].as_str().unwrap().len(), 200);
    assert!(event["timestamp"].is_string());
}

#[tokio::test]
async fn redirects_are_served_without_a_log() {
    let state = AppState::build(EdgeConfig::default(), InMemoryRepository::new())
        .await
        .unwrap();
    assert!(!state.redirect_log().is_enabled());

    let request = Request::builder()
        .uri("/about/")
        .header(header::HOST, "speakup.com.ua")
        .body(Body::empty())
        .unwrap();
    let response = App::router(state).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
}
