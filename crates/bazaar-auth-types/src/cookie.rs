//! Cookie builders for the browser-session key.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;
use uuid::Uuid;

/// Cookie name carrying the opaque browser-session key.
pub const BAZAAR_SESSION: &str = "bazaar_session";

/// Cookie Max-Age in seconds (8 hours), aligned with the default idle eviction.
pub const SESSION_COOKIE_MAX_AGE: i64 = 28800;

/// Set the session-key cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use bazaar_auth_types::cookie::{set_session_cookie, BAZAAR_SESSION};
/// use uuid::Uuid;
///
/// let key = Uuid::new_v4();
/// let jar = set_session_cookie(CookieJar::new(), key, "example.com".to_string());
/// let cookie = jar.get(BAZAAR_SESSION).unwrap();
/// assert_eq!(cookie.value(), key.to_string());
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, key: Uuid, domain: String) -> CookieJar {
    let cookie = Cookie::build((BAZAAR_SESSION, key.to_string()))
        .path("/")
        .domain(domain)
        .max_age(Duration::seconds(SESSION_COOKIE_MAX_AGE))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Expire the session-key cookie.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use bazaar_auth_types::cookie::{clear_session_cookie, BAZAAR_SESSION};
///
/// let jar = clear_session_cookie(CookieJar::new(), "example.com".to_string());
/// let cookie = jar.get(BAZAAR_SESSION).unwrap();
/// assert_eq!(cookie.value(), "");
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_session_cookie(jar: CookieJar, domain: String) -> CookieJar {
    let cookie = Cookie::build((BAZAAR_SESSION, ""))
        .path("/")
        .domain(domain)
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}
