//! Request locale extractor.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tower_sessions::cookie::Cookie;

use crate::services::Locale;
use crate::state::AppState;

/// Name of the cookie the front end sets when the user picks a language.
pub const LANGUAGE_COOKIE: &str = "language";

/// The locale to answer this request in.
///
/// Resolved from the `language` cookie, then `Accept-Language`, then the
/// translator's default locale.
pub struct RequestLocale(pub Locale);

impl FromRequestParts<AppState> for RequestLocale {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookie = language_cookie(parts);
        let accept_language = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|h| h.to_str().ok());

        Ok(Self(Locale::negotiate(
            cookie.as_deref(),
            accept_language,
            state.translator().default_locale(),
        )))
    }
}

fn language_cookie(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == LANGUAGE_COOKIE)
        .map(|cookie| cookie.value().to_string())
}
