//! Refresh token cookie transport

use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::{HttpRequest, HttpResponseBuilder};
use bl_shared::RefreshCookieConfig;

/// Builds the refresh cookie carrying `token` for `max_age_seconds`
pub fn refresh_cookie(config: &RefreshCookieConfig, token: &str, max_age_seconds: i64) -> Cookie<'static> {
    Cookie::build(config.name.clone(), token.to_string())
        .path(config.path.clone())
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::seconds(max_age_seconds))
        .finish()
}

/// Sets the refresh cookie on a response when cookie transport is enabled
pub fn attach_refresh_cookie(
    builder: &mut HttpResponseBuilder,
    config: &RefreshCookieConfig,
    token: &str,
    max_age_seconds: i64,
) {
    if config.enabled {
        builder.cookie(refresh_cookie(config, token, max_age_seconds));
    }
}

/// Expires the refresh cookie on the client
pub fn clear_refresh_cookie(builder: &mut HttpResponseBuilder, config: &RefreshCookieConfig) {
    if config.enabled {
        builder.cookie(refresh_cookie(config, "", 0));
    }
}

/// Reads the refresh token from the request cookie, if enabled and present
pub fn read_refresh_cookie(req: &HttpRequest, config: &RefreshCookieConfig) -> Option<String> {
    if !config.enabled {
        return None;
    }
    req.cookie(&config.name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
