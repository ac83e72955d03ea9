use axum::http::StatusCode;

/// Page rendering lives upstream; anything unrouted here is a 404.
pub async fn fallback_handler() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
