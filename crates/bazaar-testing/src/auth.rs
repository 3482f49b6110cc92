//! Browser-session and provider-token helpers.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::{HeaderMap, HeaderValue, header::COOKIE};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use bazaar_auth_types::cookie::BAZAAR_SESSION;
use bazaar_auth_types::token::{AUTHENTICATED_AUDIENCE, AccessClaims, AssuranceLevel};

/// HS256 secret shared by tests that sign and validate provider tokens.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// A browser presenting a fixed session key.
pub struct MockBrowser {
    pub session_key: Uuid,
}

impl MockBrowser {
    pub fn new() -> Self {
        Self {
            session_key: Uuid::new_v4(),
        }
    }

    /// Headers as the browser would send them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        let cookie = format!("{BAZAAR_SESSION}={}", self.session_key);
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            map.insert(COOKIE, value);
        }
        map
    }
}

impl Default for MockBrowser {
    fn default() -> Self {
        Self::new()
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Sign an access token the way the auth provider would.
///
/// `ttl_secs` may be negative to produce an already-expired token.
pub fn provider_token(user_id: Uuid, email: &str, aal: AssuranceLevel, ttl_secs: i64) -> String {
    let exp = (now_secs() as i64 + ttl_secs).max(0) as u64;
    let claims = AccessClaims {
        sub: user_id.to_string(),
        aud: Some(AUTHENTICATED_AUDIENCE.to_owned()),
        email: Some(email.to_owned()),
        exp,
        aal: Some(aal),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap_or_default()
}
