use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use bazaar_domain::entity::{ServiceType, UnifiedSearchResult};
use bazaar_domain::pagination::PageRequest;

use crate::domain::repository::CatalogPort;
use crate::domain::types::{MAX_QUERY_LEN, SearchView};
use crate::error::StorefrontError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchPageResponse {
    pub mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub results: Vec<UnifiedSearchResult>,
    pub total: usize,
    pub page: u32,
    pub per_page: u32,
    pub failed_sources: Vec<ServiceType>,
}

impl SearchPageResponse {
    fn from_view(view: SearchView, page: PageRequest) -> Self {
        let page = page.clamped();
        let (mode, query, results, failed_sources) = match view {
            SearchView::Featured {
                results,
                failed_sources,
            } => ("featured", None, results, failed_sources),
            SearchView::Results {
                query,
                results,
                failed_sources,
            } => ("results", Some(query), results, failed_sources),
        };
        Self {
            mode,
            query,
            total: results.len(),
            results: page.slice(&results).to_vec(),
            page: page.page,
            per_page: page.per_page,
            failed_sources,
        }
    }
}

/// `GET /search?q=&page=&per-page=`
pub async fn search<C: CatalogPort + Clone>(
    State(state): State<AppState<C>>,
    Query(params): Query<SearchParams>,
    Query(page): Query<PageRequest>,
) -> Result<Json<SearchPageResponse>, StorefrontError> {
    if params.q.chars().count() > MAX_QUERY_LEN {
        return Err(StorefrontError::InvalidQuery("query too long"));
    }
    let catalog = state.cache.get().await;
    let view = catalog.view(&params.q);
    Ok(Json(SearchPageResponse::from_view(view, page)))
}
