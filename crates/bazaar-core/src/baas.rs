//! HTTP access to the backend-as-a-service project.

use reqwest::{Client, Method, RequestBuilder};

/// Base URL plus anon key. Every request carries the anon key as `apikey`.
#[derive(Clone)]
pub struct BaasClient {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl BaasClient {
    pub fn new(http: Client, base_url: &str, anon_key: String) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            anon_key,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build a request to `path`, authenticated as the signed-in user when a
    /// token is given and as the anonymous role otherwise.
    pub fn request(&self, method: Method, path: &str, access_token: Option<&str>) -> RequestBuilder {
        let bearer = access_token.unwrap_or(&self.anon_key);
        self.http
            .request(method, self.url(path))
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }
}
