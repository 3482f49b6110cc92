use tracing::warn;

use bazaar_domain::entity::{Hotel, ServiceType, Store, Taxi, UnifiedSearchResult};

use crate::domain::repository::CatalogPort;
use crate::domain::types::SearchView;
use crate::error::StorefrontError;

/// Fans out to the three listing sources and merges what comes back.
#[derive(Clone)]
pub struct SearchAggregator<C> {
    pub catalog: C,
}

impl<C: CatalogPort> SearchAggregator<C> {
    /// Fetch all three sources concurrently. Never fails: a source that
    /// errors is logged and contributes nothing.
    pub async fn fetch(&self) -> SearchCatalog {
        let (stores, hotels, taxis) = tokio::join!(
            self.catalog.fetch_stores(),
            self.catalog.fetch_hotels(),
            self.catalog.fetch_taxis(),
        );

        let mut catalog = SearchCatalog::default();
        catalog.absorb(
            ServiceType::Store,
            stores.map(|rows| listed(rows, Store::is_publicly_listed)),
        );
        catalog.absorb(
            ServiceType::Hotel,
            hotels.map(|rows| listed(rows, Hotel::is_publicly_listed)),
        );
        catalog.absorb(
            ServiceType::Taxi,
            taxis.map(|rows| listed(rows, Taxi::is_publicly_listed)),
        );
        catalog
    }
}

// Sources filter server-side too; rows that slip through are still dropped.
fn listed<T>(rows: Vec<T>, eligible: fn(&T) -> bool) -> Vec<UnifiedSearchResult>
where
    T: Into<UnifiedSearchResult>,
{
    rows.into_iter().filter(eligible).map(Into::into).collect()
}

/// Merged fetch results: stores, then hotels, then taxis, each in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCatalog {
    pub entries: Vec<UnifiedSearchResult>,
    pub failed: Vec<ServiceType>,
}

impl SearchCatalog {
    fn absorb(
        &mut self,
        source: ServiceType,
        result: Result<Vec<UnifiedSearchResult>, StorefrontError>,
    ) {
        match result {
            Ok(rows) => self.entries.extend(rows),
            Err(e) => {
                let detail = match &e {
                    StorefrontError::Internal(inner) => format!("{inner:#}"),
                    other => other.to_string(),
                };
                warn!(source = source.table(), error = %detail, "search source unavailable");
                self.failed.push(source);
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn count(&self, service_type: ServiceType) -> usize {
        self.entries
            .iter()
            .filter(|e| e.service_type == service_type)
            .count()
    }

    /// Filter and rank for one query.
    ///
    /// Case-insensitive substring match on name, description and location.
    /// Name matches come first; order within each bucket is catalog order.
    pub fn view(&self, query: &str) -> SearchView {
        let query = query.trim();
        if query.is_empty() {
            return SearchView::Featured {
                results: self.entries.clone(),
                failed_sources: self.failed.clone(),
            };
        }

        let needle = query.to_lowercase();
        let mut by_name = Vec::new();
        let mut by_detail = Vec::new();
        for entry in &self.entries {
            if contains(&entry.name, &needle) {
                by_name.push(entry.clone());
            } else if [&entry.description, &entry.location]
                .into_iter()
                .flatten()
                .any(|field| contains(field, &needle))
            {
                by_detail.push(entry.clone());
            }
        }
        by_name.extend(by_detail);

        SearchView::Results {
            query: query.to_owned(),
            results: by_name,
            failed_sources: self.failed.clone(),
        }
    }
}

fn contains(haystack: &str, lowercase_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowercase_needle)
}
