use std::future::Future;

use bazaar_domain::entity::{Hotel, Store, Taxi};

use crate::error::StorefrontError;

/// Port for reading the three listing tables.
///
/// Implementations return only publicly listed rows, newest first. The futures
/// are `Send` so live search sessions can run fetches on spawned tasks.
pub trait CatalogPort: Send + Sync + 'static {
    fn fetch_stores(&self) -> impl Future<Output = Result<Vec<Store>, StorefrontError>> + Send;

    fn fetch_hotels(&self) -> impl Future<Output = Result<Vec<Hotel>, StorefrontError>> + Send;

    fn fetch_taxis(&self) -> impl Future<Output = Result<Vec<Taxi>, StorefrontError>> + Send;
}
