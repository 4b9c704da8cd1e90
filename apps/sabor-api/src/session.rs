//! # Session Extraction
//!
//! Resolves the acting operator for protected routes.
//!
//! ```text
//! request ──► cookie `sabor_session` ──┐
//!         └─► Authorization: Bearer ───┴──► AuthService::authenticate
//!                                                 │
//!                                  Some(op) ──► CurrentOperator(op)
//!                                  None     ──► 401 UNAUTHORIZED
//! ```
//!
//! The cookie wins when both are present. The operator is re-read from
//! storage on every request, so deleting an operator ends their sessions.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration;

use sabor_core::Operator;
use sabor_engine::auth::extract_bearer_token;

use crate::error::ApiError;
use crate::state::{AppState, CookieSettings};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sabor_session";

/// The authenticated operator behind the current request.
#[derive(Debug, Clone)]
pub struct CurrentOperator(pub Operator);

impl FromRequestParts<AppState> for CurrentOperator {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = session_token(parts) else {
            return Err(ApiError::unauthorized());
        };

        match state.auth.authenticate(&token).await? {
            Some(operator) => Ok(CurrentOperator(operator)),
            None => {
                tracing::debug!("Request with invalid or expired session");
                Err(ApiError::unauthorized())
            }
        }
    }
}

fn session_token(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(extract_bearer_token)
        .map(str::to_string)
}

/// Cookie carrying a freshly issued token.
pub fn session_cookie(token: String, settings: CookieSettings) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .max_age(Duration::seconds(settings.max_age_secs))
        .build()
}

/// Cookie that clears the session on the client.
pub fn expired_session_cookie(settings: CookieSettings) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie(
            "tok".to_string(),
            CookieSettings {
                secure: true,
                max_age_secs: 60,
            },
        );
        let rendered = cookie.to_string();

        assert!(rendered.starts_with("sabor_session=tok"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("Max-Age=60"));
    }

    #[test]
    fn test_expired_cookie() {
        let rendered = expired_session_cookie(CookieSettings {
            secure: false,
            max_age_secs: 60,
        })
        .to_string();

        assert!(rendered.contains("Max-Age=0"));
        assert!(!rendered.contains("Secure"));
    }

    #[test]
    fn test_token_sources() {
        let (mut parts, _) = axum::http::Request::builder()
            .header("cookie", "other=1; sabor_session=from-cookie")
            .header(AUTHORIZATION, "Bearer from-header")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(session_token(&parts).as_deref(), Some("from-cookie"));

        parts.headers.remove("cookie");
        assert_eq!(session_token(&parts).as_deref(), Some("from-header"));

        parts.headers.remove(AUTHORIZATION);
        assert_eq!(session_token(&parts), None);
    }
}
