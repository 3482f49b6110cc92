use serde::Deserialize;

use bazaar_core::config::Config;

/// Backoffice configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct BackofficeConfig {
    /// BaaS project base URL (e.g. "https://project.example.co"). Env var: `BAAS_URL`.
    pub baas_url: String,
    /// Public anon key sent as `apikey` on every BaaS request.
    pub baas_anon_key: String,
    /// HS256 secret the auth provider signs access tokens with.
    pub baas_jwt_secret: String,
    /// Cookie domain attribute for the session cookie.
    pub cookie_domain: String,
    /// TCP port to listen on (default 3120). Env var: `BACKOFFICE_PORT`.
    #[serde(default = "default_port")]
    pub backoffice_port: u16,
    /// Idle seconds after which a browser session is evicted (default 8h).
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

fn default_port() -> u16 {
    3120
}

fn default_session_idle_secs() -> u64 {
    28800
}

impl Config for BackofficeConfig {}
