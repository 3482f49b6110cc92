use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use tower::ServiceExt;

use bazaar_storefront::router::build_router;
use bazaar_storefront::state::AppState;
use bazaar_testing::fixture::store;

use crate::helpers::MockCatalog;

const SECRET: &str = "hook-secret";

fn state(catalog: &MockCatalog) -> AppState<MockCatalog> {
    AppState::new(catalog.clone(), SECRET.into(), Duration::from_millis(300))
}

async fn get(state: &AppState<MockCatalog>, uri: &str) -> Response {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    build_router(state.clone()).oneshot(request).await.unwrap()
}

async fn hook(state: &AppState<MockCatalog>, secret: Option<&str>, body: &str) -> Response {
    let mut builder = Request::post("/hooks/row-change").header(header::CONTENT_TYPE, "application/json");
    if let Some(secret) = secret {
        builder = builder.header("x-bazaar-webhook-secret", secret);
    }
    let request = builder.body(Body::from(body.to_owned())).unwrap();
    build_router(state.clone()).oneshot(request).await.unwrap()
}

async fn json_body(resp: Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

const STORE_CHANGE: &str = r#"{"type":"INSERT","table":"stores","schema":"public","record":{}}"#;

#[tokio::test]
async fn should_answer_health() {
    let state = state(&MockCatalog::listings());
    let resp = get(&state, "/readyz").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_rank_search_results() {
    let state = state(&MockCatalog::listings());

    let resp = get(&state, "/search?q=blue").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["mode"], "results");
    assert_eq!(body["query"], "blue");
    assert_eq!(body["total"], 2);
    assert_eq!(body["results"][0]["name"], "Blue Diner");
    assert_eq!(body["results"][0]["service_type"], "store");
    assert_eq!(body["results"][1]["service_type"], "hotel");
}

#[tokio::test]
async fn should_render_featured_mode_without_query() {
    let state = state(&MockCatalog::listings());

    let body = json_body(get(&state, "/search").await).await;

    assert_eq!(body["mode"], "featured");
    assert!(body.get("query").is_none());
    assert_eq!(body["total"], 3);
}

#[tokio::test]
async fn should_paginate_results() {
    let catalog = MockCatalog::listings();
    catalog
        .stores
        .lock()
        .unwrap()
        .extend((0..4).map(|i| store(&format!("Stall {i}"))));
    let state = state(&catalog);

    let body = json_body(get(&state, "/search?q=stall&per-page=3&page=2").await).await;

    assert_eq!(body["total"], 4);
    assert_eq!(body["page"], 2);
    assert_eq!(body["per_page"], 3);
    assert_eq!(body["results"].as_array().unwrap().len(), 1);
    assert_eq!(body["results"][0]["name"], "Stall 3");
}

#[tokio::test]
async fn should_report_failed_sources() {
    let catalog = MockCatalog::listings();
    catalog
        .fail_hotels
        .store(true, std::sync::atomic::Ordering::SeqCst);
    let state = state(&catalog);

    let resp = get(&state, "/search?q=blue").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["failed_sources"][0], "hotel");
}

#[tokio::test]
async fn should_reject_overlong_query() {
    let state = state(&MockCatalog::listings());
    let uri = format!("/search?q={}", "a".repeat(201));

    let resp = get(&state, &uri).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["kind"], "INVALID_QUERY");
}

// ── webhook ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_hook_without_valid_secret() {
    let catalog = MockCatalog::listings();
    let state = state(&catalog);
    get(&state, "/search").await;

    for secret in [None, Some("wrong")] {
        let resp = hook(&state, secret, STORE_CHANGE).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(resp).await["kind"], "UNAUTHORIZED");
    }
    assert!(state.cache.is_cached().await);
}

#[tokio::test]
async fn should_invalidate_cache_and_publish_on_listing_change() {
    let catalog = MockCatalog::listings();
    let state = state(&catalog);
    let mut subscription = state.feed.subscribe(&bazaar_domain::entity::ServiceType::ALL);
    get(&state, "/search").await;

    let resp = hook(&state, Some(SECRET), STORE_CHANGE).await;

    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert!(!state.cache.is_cached().await);
    assert!(subscription.next().await.is_some());
    get(&state, "/search").await;
    assert_eq!(catalog.calls.all(), [2, 2, 2]);
}

#[tokio::test]
async fn should_keep_cache_for_other_tables() {
    let catalog = MockCatalog::listings();
    let state = state(&catalog);
    get(&state, "/search").await;

    let resp = hook(
        &state,
        Some(SECRET),
        r#"{"type":"DELETE","table":"orders","schema":"public"}"#,
    )
    .await;

    assert_eq!(resp.status(), StatusCode::ACCEPTED);
    assert!(state.cache.is_cached().await);
}

#[tokio::test]
async fn should_reject_malformed_hook_body() {
    let state = state(&MockCatalog::listings());

    let resp = hook(&state, Some(SECRET), r#"{"table":"stores"}"#).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
