use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::session::SESSION_TTL_HOURS;

pub const SESSION_COOKIE_NAME: &str = "session_token";
pub const STATE_COOKIE_NAME: &str = "oauth_state";

const STATE_COOKIE_PATH: &str = "/auth/spotify";
const STATE_TTL_MINUTES: i64 = 10;

/// Session cookie carrying the signed credential.
///
/// The max-age matches the credential lifetime, not the provider token's.
pub(super) fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::hours(SESSION_TTL_HOURS))
        .build()
}

/// Short-lived cookie remembering the login's state nonce.
pub(super) fn state_cookie(state: String, secure: bool) -> Cookie<'static> {
    Cookie::build((STATE_COOKIE_NAME, state))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path(STATE_COOKIE_PATH)
        .max_age(Duration::minutes(STATE_TTL_MINUTES))
        .build()
}

pub(super) fn clear_state_cookie() -> Cookie<'static> {
    Cookie::build((STATE_COOKIE_NAME, ""))
        .path(STATE_COOKIE_PATH)
        .max_age(Duration::ZERO)
        .build()
}

pub(super) fn get_state(jar: &CookieJar) -> Option<String> {
    jar.get(STATE_COOKIE_NAME).map(|c| c.value().to_string())
}

pub(super) fn get_session(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE_NAME).map(|c| c.value().to_string())
}
