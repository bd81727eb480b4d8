use crate::auth::jwt::SessionService;
use crate::types::Session;
use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::debug;

/// Prefix browsers require for cookies set with `Secure` over HTTPS.
pub const SECURE_COOKIE_PREFIX: &str = "__Secure-";

/// Turns a raw session credential into a [`Session`].
///
/// Verification never fails from the caller's point of view: a missing,
/// expired, malformed or forged credential is `Session::Anonymous`.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, credential: Option<&str>) -> Session;
}

/// Verifies HS256 session tokens minted by [`SessionService`].
pub struct JwtVerifier {
    sessions: Arc<SessionService>,
}

impl JwtVerifier {
    pub fn new(sessions: Arc<SessionService>) -> Self {
        Self { sessions }
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, credential: Option<&str>) -> Session {
        let Some(token) = credential else {
            return Session::Anonymous;
        };

        match self.sessions.verify(token) {
            Ok(claims) => Session::from_claims(&claims),
            Err(e) => {
                debug!("Session credential rejected: {}", e);
                Session::Anonymous
            }
        }
    }
}

/// Pulls the session credential out of a request.
///
/// Looks for the session cookie (plain or `__Secure-` prefixed) first, then an
/// `Authorization: Bearer` header. Empty values count as absent.
pub fn extract_credential(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    let secure_name = format!("{SECURE_COOKIE_PREFIX}{cookie_name}");

    let cookie_value = |name: &str| {
        jar.get(name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    };

    cookie_value(cookie_name)
        .or_else(|| cookie_value(&secure_name))
        .or_else(|| bearer_token(headers))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProfileState, SessionUser};
    use axum::http::HeaderValue;

    const COOKIE: &str = "holiya.session-token";

    fn service() -> Arc<SessionService> {
        Arc::new(SessionService::new(
            "test-secret-key-that-is-at-least-32-chars".to_string(),
            600,
        ))
    }

    fn user(profile_complete: Option<bool>) -> SessionUser {
        SessionUser {
            id: "7".to_string(),
            email: "grace@example.com".to_string(),
            name: "Grace".to_string(),
            access_token: None,
            profile_complete,
            industry: None,
        }
    }

    #[tokio::test]
    async fn test_missing_credential_is_anonymous() {
        let verifier = JwtVerifier::new(service());
        assert_eq!(verifier.verify(None).await, Session::Anonymous);
    }

    #[tokio::test]
    async fn test_garbage_credential_is_anonymous() {
        let verifier = JwtVerifier::new(service());
        assert_eq!(verifier.verify(Some("not-a-jwt")).await, Session::Anonymous);
    }

    #[tokio::test]
    async fn test_valid_credential_carries_profile_state() {
        let sessions = service();
        let verifier = JwtVerifier::new(sessions.clone());

        let complete = sessions.issue(&user(Some(true))).expect("should issue");
        let pending = sessions.issue(&user(None)).expect("should issue");

        assert_eq!(
            verifier.verify(Some(&complete)).await,
            Session::Authenticated(ProfileState::Complete)
        );
        assert_eq!(
            verifier.verify(Some(&pending)).await,
            Session::Authenticated(ProfileState::Incomplete)
        );
    }

    #[tokio::test]
    async fn test_foreign_secret_is_anonymous() {
        let foreign = SessionService::new("another-secret-that-is-32-chars-long".to_string(), 600);
        let token = foreign.issue(&user(Some(true))).expect("should issue");

        let verifier = JwtVerifier::new(service());
        assert_eq!(verifier.verify(Some(&token)).await, Session::Anonymous);
    }

    #[test]
    fn test_extract_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; holiya.session-token=abc.def.ghi"),
        );
        assert_eq!(
            extract_credential(&headers, COOKIE).as_deref(),
            Some("abc.def.ghi")
        );
    }

    #[test]
    fn test_extract_from_secure_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("__Secure-holiya.session-token=secure"),
        );
        assert_eq!(extract_credential(&headers, COOKIE).as_deref(), Some("secure"));
    }

    #[test]
    fn test_extract_from_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok"));
        assert_eq!(extract_credential(&headers, COOKIE).as_deref(), Some("tok"));
    }

    #[test]
    fn test_cookie_wins_over_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("holiya.session-token=c"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer h"));
        assert_eq!(extract_credential(&headers, COOKIE).as_deref(), Some("c"));
    }

    #[test]
    fn test_empty_cookie_does_not_hide_secure_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("holiya.session-token=; __Secure-holiya.session-token=secure"),
        );
        assert_eq!(extract_credential(&headers, COOKIE).as_deref(), Some("secure"));
    }

    #[test]
    fn test_empty_cookie_falls_back_to_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("holiya.session-token="));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer h"));
        assert_eq!(extract_credential(&headers, COOKIE).as_deref(), Some("h"));
    }

    #[test]
    fn test_extract_nothing() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_credential(&headers, COOKIE), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        headers.insert(header::COOKIE, HeaderValue::from_static("holiya.session-token="));
        assert_eq!(extract_credential(&headers, COOKIE), None);
    }
}
