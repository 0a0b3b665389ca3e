//! Cookie carrying the OAuth `state` between the login redirect and the callback.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the pending OAuth state value.
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// Cookie path; only the OAuth routes ever see it.
pub const OAUTH_STATE_PATH: &str = "/auth";

/// Lifetime of a pending OAuth login in seconds (10 minutes).
pub const OAUTH_STATE_MAX_AGE: i64 = 600;

/// Set the OAuth state cookie on the jar.
///
/// `SameSite=Lax` so the cookie survives the top-level redirect back from the provider.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use skillshare_auth_types::cookie::{set_oauth_state_cookie, OAUTH_STATE_COOKIE};
///
/// let jar = set_oauth_state_cookie(CookieJar::new(), "abc123".to_string(), false);
/// let cookie = jar.get(OAUTH_STATE_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "abc123");
/// assert_eq!(cookie.path(), Some("/auth"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(600)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(!cookie.secure().unwrap_or(false));
/// ```
pub fn set_oauth_state_cookie(jar: CookieJar, state: String, secure: bool) -> CookieJar {
    let cookie = Cookie::build((OAUTH_STATE_COOKIE, state))
        .path(OAUTH_STATE_PATH)
        .max_age(Duration::seconds(OAUTH_STATE_MAX_AGE))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Read the pending OAuth state, if any.
pub fn oauth_state(jar: &CookieJar) -> Option<String> {
    jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_owned())
}

/// Expire the OAuth state cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use skillshare_auth_types::cookie::{
///     clear_oauth_state_cookie, set_oauth_state_cookie, OAUTH_STATE_COOKIE,
/// };
///
/// let jar = set_oauth_state_cookie(CookieJar::new(), "abc123".to_string(), true);
/// let jar = clear_oauth_state_cookie(jar, true);
/// let cookie = jar.get(OAUTH_STATE_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "");
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_oauth_state_cookie(jar: CookieJar, secure: bool) -> CookieJar {
    let cookie = Cookie::build((OAUTH_STATE_COOKIE, ""))
        .path(OAUTH_STATE_PATH)
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}
