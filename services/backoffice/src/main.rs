use std::time::Duration;

use tracing::info;

use bazaar_backoffice::config::BackofficeConfig;
use bazaar_backoffice::infra::sessions::SessionRegistry;
use bazaar_backoffice::router::build_router;
use bazaar_backoffice::state::AppState;
use bazaar_core::baas::BaasClient;
use bazaar_core::config::Config;
use bazaar_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = BackofficeConfig::from_env();

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("failed to build HTTP client");

    let sessions = SessionRegistry::default();
    let state = AppState {
        baas: BaasClient::new(http, &config.baas_url, config.baas_anon_key),
        jwt_secret: config.baas_jwt_secret,
        cookie_domain: config.cookie_domain,
        sessions: sessions.clone(),
    };

    let max_idle = Duration::from_secs(config.session_idle_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60));
        loop {
            interval.tick().await;
            let evicted = sessions.evict_idle(max_idle);
            if evicted > 0 {
                info!(evicted, remaining = sessions.len(), "evicted idle sessions");
            }
        }
    });

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.backoffice_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("backoffice listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
