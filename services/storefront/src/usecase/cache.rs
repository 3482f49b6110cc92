use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::repository::CatalogPort;
use crate::domain::types::ChangeEvent;
use crate::usecase::search::{SearchAggregator, SearchCatalog};

/// Shared catalog for one-shot searches, refreshed lazily after invalidation.
///
/// Concurrent misses wait on the same fetch. A catalog with a failed source is
/// served once but not kept, so the next request retries the source.
pub struct CatalogCache<C> {
    aggregator: SearchAggregator<C>,
    slot: Mutex<Option<Arc<SearchCatalog>>>,
}

impl<C: CatalogPort> CatalogCache<C> {
    pub fn new(aggregator: SearchAggregator<C>) -> Self {
        Self {
            aggregator,
            slot: Mutex::new(None),
        }
    }

    pub async fn get(&self) -> Arc<SearchCatalog> {
        let mut slot = self.slot.lock().await;
        if let Some(catalog) = slot.as_ref() {
            return Arc::clone(catalog);
        }
        let fresh = Arc::new(self.aggregator.fetch().await);
        if fresh.is_complete() {
            *slot = Some(Arc::clone(&fresh));
        }
        fresh
    }

    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }

    /// Invalidate if the change touches a listing table. Returns whether it did.
    pub async fn apply(&self, event: &ChangeEvent) -> bool {
        match event.service_type() {
            Some(service) => {
                debug!(table = service.table(), "catalog cache invalidated");
                self.invalidate().await;
                true
            }
            None => false,
        }
    }

    pub async fn is_cached(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}
