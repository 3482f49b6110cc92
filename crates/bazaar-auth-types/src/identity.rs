//! Browser-session key extractor.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use http::header::COOKIE;
use http::request::Parts;
use uuid::Uuid;

use crate::cookie::BAZAAR_SESSION;

/// Session key presented by the browser in the `bazaar_session` cookie.
///
/// Never rejects: a missing or unparsable cookie yields `key: None`, and the
/// caller decides whether to start a fresh session or redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserSession {
    pub key: Option<Uuid>,
}

impl BrowserSession {
    fn from_headers(headers: &http::HeaderMap) -> Self {
        let key = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == BAZAAR_SESSION)
            .and_then(|(_, value)| value.parse::<Uuid>().ok());
        Self { key }
    }
}

impl<S> FromRequestParts<S> for BrowserSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    // Extract synchronously and hand back a 'static future; an `async fn` here
    // would capture the `parts` lifetime.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let session = Self::from_headers(&parts.headers);
        async move { Ok(session) }
    }
}
