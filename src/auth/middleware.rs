use crate::auth::verifier::{extract_credential, TokenVerifier};
use crate::guard::{decide, normalize_path, Decision, RouteTable};
use crate::types::Session;
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tracing::{debug, info};

/// Everything the guard layer needs, shared read-only across requests.
#[derive(Clone)]
pub struct GuardState {
    pub routes: Arc<RouteTable>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub cookie_name: Arc<str>,
}

impl GuardState {
    pub fn new(
        routes: Arc<RouteTable>,
        verifier: Arc<dyn TokenVerifier>,
        cookie_name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            routes,
            verifier,
            cookie_name: cookie_name.into(),
        }
    }
}

/// Guards every page navigation.
///
/// Bypassed paths pass untouched. Everything else is verified, decided and
/// either passed through (with the [`Session`] in the request extensions) or
/// answered with a `307` redirect to the decided target.
pub async fn route_guard(
    State(guard): State<GuardState>,
    mut req: Request,
    next: Next,
) -> Response {
    let raw_path = req.uri().path().to_string();
    if guard.routes.bypasses(&raw_path) {
        return next.run(req).await;
    }

    let path = normalize_path(&raw_path);
    let credential = extract_credential(req.headers(), &guard.cookie_name);
    let session = guard.verifier.verify(credential.as_deref()).await;
    let decision = decide(&session, path, &guard.routes);

    debug!(
        path,
        has_session = session.has_valid_session(),
        profile = ?session.profile(),
        %decision,
        "Route guard evaluated"
    );

    match decision {
        Decision::Allow => {
            req.extensions_mut().insert(session);
            next.run(req).await
        }
        Decision::RedirectTo(target) => {
            let location = guard.routes.target(target);
            info!(path, location, "Route guard redirect");
            Redirect::temporary(location).into_response()
        }
    }
}

/// Extractor for the session the guard let through.
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .copied()
            .map(CurrentSession)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

/// Absent on paths the guard bypassed.
impl<S> OptionalFromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Session>().copied().map(CurrentSession))
    }
}
