use std::sync::atomic::Ordering;

use bazaar_domain::entity::{ApprovalStatus, ServiceType};
use bazaar_storefront::domain::types::SearchView;
use bazaar_storefront::usecase::cache::CatalogCache;
use bazaar_storefront::usecase::search::SearchAggregator;
use bazaar_testing::fixture::store;

use crate::helpers::{MockCatalog, change};

fn aggregator(catalog: &MockCatalog) -> SearchAggregator<MockCatalog> {
    SearchAggregator {
        catalog: catalog.clone(),
    }
}

#[tokio::test]
async fn should_fetch_each_source_once_and_merge_in_order() {
    let catalog = MockCatalog::listings();

    let merged = aggregator(&catalog).fetch().await;

    assert_eq!(catalog.calls.all(), [1, 1, 1]);
    let order: Vec<_> = merged.entries.iter().map(|e| e.service_type).collect();
    assert_eq!(order, ServiceType::ALL);
    assert!(merged.is_complete());
}

#[tokio::test]
async fn should_rank_store_name_match_above_hotel_description_match() {
    let catalog = MockCatalog::listings();

    let view = aggregator(&catalog).fetch().await.view("blue");

    let hits: Vec<_> = view
        .results()
        .iter()
        .map(|r| (r.service_type, r.name.as_str()))
        .collect();
    assert_eq!(
        hits,
        [
            (ServiceType::Store, "Blue Diner"),
            (ServiceType::Hotel, "Harbour Inn"),
        ]
    );
}

#[tokio::test]
async fn should_return_featured_mode_for_empty_query() {
    let catalog = MockCatalog::listings();

    let view = aggregator(&catalog).fetch().await.view("");

    assert!(matches!(view, SearchView::Featured { ref results, .. } if results.len() == 3));
}

#[tokio::test]
async fn should_degrade_failed_source_to_empty() {
    let catalog = MockCatalog::listings();
    catalog.fail_hotels.store(true, Ordering::SeqCst);

    let merged = aggregator(&catalog).fetch().await;

    assert_eq!(merged.count(ServiceType::Hotel), 0);
    assert_eq!(merged.count(ServiceType::Store), 1);
    assert_eq!(merged.count(ServiceType::Taxi), 1);
    assert_eq!(merged.failed, [ServiceType::Hotel]);
    assert_eq!(merged.view("").failed_sources(), [ServiceType::Hotel]);
}

#[tokio::test]
async fn should_drop_rows_that_are_not_publicly_listed() {
    let catalog = MockCatalog::listings();
    let mut hidden = store("Blue Pending");
    hidden.approval_status = ApprovalStatus::Pending;
    let mut inactive = store("Blue Closed");
    inactive.is_active = false;
    catalog.stores.lock().unwrap().extend([hidden, inactive]);

    let merged = aggregator(&catalog).fetch().await;

    assert_eq!(merged.count(ServiceType::Store), 1);
}

// ── catalog cache ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_serve_cached_catalog_without_refetch() {
    let catalog = MockCatalog::listings();
    let cache = CatalogCache::new(aggregator(&catalog));

    cache.get().await;
    cache.get().await;

    assert_eq!(catalog.calls.all(), [1, 1, 1]);
    assert!(cache.is_cached().await);
}

#[tokio::test]
async fn should_invalidate_on_listing_table_change_only() {
    let catalog = MockCatalog::listings();
    let cache = CatalogCache::new(aggregator(&catalog));
    cache.get().await;

    assert!(!cache.apply(&change("orders")).await);
    assert!(cache.is_cached().await);

    for table in ["stores", "hotels", "taxis"] {
        assert!(cache.apply(&change(table)).await, "{table}");
        assert!(!cache.is_cached().await, "{table}");
        cache.get().await;
    }
    assert_eq!(catalog.calls.all(), [4, 4, 4]);
}

#[tokio::test]
async fn should_pick_up_new_rows_after_invalidation() {
    let catalog = MockCatalog::listings();
    let cache = CatalogCache::new(aggregator(&catalog));
    assert_eq!(cache.get().await.count(ServiceType::Store), 1);

    catalog.stores.lock().unwrap().push(store("Night Market"));
    cache.apply(&change("stores")).await;

    assert_eq!(cache.get().await.count(ServiceType::Store), 2);
}

#[tokio::test]
async fn should_not_keep_catalog_with_failed_source() {
    let catalog = MockCatalog::listings();
    catalog.fail_hotels.store(true, Ordering::SeqCst);
    let cache = CatalogCache::new(aggregator(&catalog));

    let first = cache.get().await;
    assert_eq!(first.failed, [ServiceType::Hotel]);
    assert!(!cache.is_cached().await);

    catalog.fail_hotels.store(false, Ordering::SeqCst);
    let second = cache.get().await;
    assert!(second.is_complete());
    assert_eq!(catalog.calls.all(), [2, 2, 2]);
}
