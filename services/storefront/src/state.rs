use std::sync::Arc;
use std::time::Duration;

use crate::domain::repository::CatalogPort;
use crate::usecase::cache::CatalogCache;
use crate::usecase::feed::ChangeFeed;
use crate::usecase::live::LiveSearch;
use crate::usecase::search::SearchAggregator;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState<C> {
    pub catalog: C,
    pub cache: Arc<CatalogCache<C>>,
    pub feed: ChangeFeed,
    pub webhook_secret: String,
    pub search_debounce: Duration,
}

impl<C: CatalogPort + Clone> AppState<C> {
    pub fn new(catalog: C, webhook_secret: String, search_debounce: Duration) -> Self {
        Self {
            cache: Arc::new(CatalogCache::new(SearchAggregator {
                catalog: catalog.clone(),
            })),
            catalog,
            feed: ChangeFeed::default(),
            webhook_secret,
            search_debounce,
        }
    }

    pub fn aggregator(&self) -> SearchAggregator<C> {
        SearchAggregator {
            catalog: self.catalog.clone(),
        }
    }

    pub fn live_search(&self) -> LiveSearch<C> {
        LiveSearch {
            aggregator: self.aggregator(),
            debounce: self.search_debounce,
        }
    }
}
