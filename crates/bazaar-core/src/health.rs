use axum::{Router, http::StatusCode, routing::get};

/// `GET /healthz`: liveness.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `GET /readyz`: the services hold no connections that need warming.
pub async fn readyz() -> StatusCode {
    StatusCode::OK
}

/// Liveness and readiness routes, merged into every service router.
pub fn health_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
