use anyhow::Context;
use reqwest::Method;
use serde::de::DeserializeOwned;

use bazaar_core::baas::BaasClient;
use bazaar_domain::entity::{Hotel, ServiceType, Store, Taxi};

use crate::domain::repository::CatalogPort;
use crate::error::StorefrontError;

/// Reads the listing tables through the REST layer as the anonymous role.
#[derive(Clone)]
pub struct RestCatalog {
    pub baas: BaasClient,
}

/// Publicly listed rows of one table, newest first.
pub fn listing_path(service: ServiceType) -> String {
    format!(
        "/rest/v1/{}?select=*&is_active=eq.true&approval_status=eq.approved&order=created_at.desc",
        service.table()
    )
}

impl RestCatalog {
    async fn fetch<T: DeserializeOwned>(&self, service: ServiceType) -> Result<Vec<T>, StorefrontError> {
        let table = service.table();
        let rows = self
            .baas
            .request(Method::GET, &listing_path(service), None)
            .send()
            .await
            .with_context(|| format!("{table} request failed"))?
            .error_for_status()
            .with_context(|| format!("{table} read rejected"))?
            .json::<Vec<T>>()
            .await
            .with_context(|| format!("invalid {table} response"))?;
        Ok(rows)
    }
}

impl CatalogPort for RestCatalog {
    async fn fetch_stores(&self) -> Result<Vec<Store>, StorefrontError> {
        self.fetch(ServiceType::Store).await
    }

    async fn fetch_hotels(&self) -> Result<Vec<Hotel>, StorefrontError> {
        self.fetch(ServiceType::Hotel).await
    }

    async fn fetch_taxis(&self) -> Result<Vec<Taxi>, StorefrontError> {
        self.fetch(ServiceType::Taxi).await
    }
}
