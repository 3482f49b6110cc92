use axum::{
    Router,
    routing::{get, post},
};

use bazaar_core::health::health_routes;
use bazaar_core::middleware::with_observability;

use crate::domain::repository::CatalogPort;
use crate::handlers::{hooks::row_change, live::live, search::search};
use crate::state::AppState;

pub fn build_router<C: CatalogPort + Clone>(state: AppState<C>) -> Router {
    let app = Router::new()
        .merge(health_routes::<AppState<C>>())
        .route("/search", get(search::<C>))
        .route("/search/live", get(live::<C>))
        .route("/hooks/row-change", post(row_change::<C>))
        .with_state(state);

    with_observability(app)
}
