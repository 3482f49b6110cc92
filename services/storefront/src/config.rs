use std::time::Duration;

use serde::Deserialize;

use bazaar_core::config::Config;

/// Storefront configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct StorefrontConfig {
    /// BaaS project base URL. Env var: `BAAS_URL`.
    pub baas_url: String,
    pub baas_anon_key: String,
    /// Shared secret database webhooks send in `x-bazaar-webhook-secret`.
    pub webhook_secret: String,
    /// TCP port to listen on (default 3121). Env var: `STOREFRONT_PORT`.
    #[serde(default = "default_port")]
    pub storefront_port: u16,
    /// Quiet period after the last keystroke before a live session re-fetches.
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

fn default_port() -> u16 {
    3121
}

fn default_search_debounce_ms() -> u64 {
    300
}

impl StorefrontConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Config for StorefrontConfig {}
