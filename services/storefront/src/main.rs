use std::time::Duration;

use tracing::info;

use bazaar_core::baas::BaasClient;
use bazaar_core::config::Config;
use bazaar_core::tracing::init_tracing;
use bazaar_storefront::config::StorefrontConfig;
use bazaar_storefront::infra::rest::RestCatalog;
use bazaar_storefront::router::build_router;
use bazaar_storefront::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = StorefrontConfig::from_env();
    let debounce = config.search_debounce();

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("failed to build HTTP client");

    let catalog = RestCatalog {
        baas: BaasClient::new(http, &config.baas_url, config.baas_anon_key),
    };
    let state = AppState::new(catalog, config.webhook_secret, debounce);

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.storefront_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(debounce_ms = debounce.as_millis() as u64, "storefront listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
