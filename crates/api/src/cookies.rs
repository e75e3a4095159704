//! Session cookie construction.
//!
//! The session token travels only as an HTTP-only cookie. Production mode
//! requires Secure + SameSite=None for the cross-site frontend; development
//! stays on SameSite=Strict.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Builds the session cookie carrying a freshly issued token.
#[must_use]
pub fn session_cookie(token: String, ttl_days: i64, production: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(production)
        .same_site(same_site(production))
        .path("/")
        .max_age(Duration::days(ttl_days))
        .build()
}

/// Builds the expired cookie that clears the session.
#[must_use]
pub fn clear_session_cookie(production: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .secure(production)
        .same_site(same_site(production))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

const fn same_site(production: bool) -> SameSite {
    if production {
        SameSite::None
    } else {
        SameSite::Strict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("tok".into(), 7, false);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_production_cookie_is_cross_site() {
        let cookie = session_cookie("tok".into(), 7, true);
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie(false);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
