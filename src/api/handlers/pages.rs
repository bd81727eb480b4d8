use crate::auth::middleware::CurrentSession;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

/// Serves the built front end from `server.static_dir`
///
/// Files are served as they are. Unknown paths fall back to `index.html` only
/// when the guard evaluated and allowed them; bypassed paths are assets and a
/// missing one is a plain 404.
pub async fn app_shell(
    State(state): State<AppState>,
    session: Option<CurrentSession>,
    req: Request,
) -> Response {
    let Some(dir) = state.config.server.static_dir.as_deref() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let served = if session.is_some() {
        ServeDir::new(dir)
            .fallback(ServeFile::new(dir.join("index.html")))
            .oneshot(req)
            .await
            .map(IntoResponse::into_response)
    } else {
        ServeDir::new(dir)
            .oneshot(req)
            .await
            .map(IntoResponse::into_response)
    };

    match served {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

/// Stand-in page used when no front-end build is configured
///
/// Pages the guard allowed get a short description of the visitor. Bypassed
/// assets have nothing to serve here.
pub async fn placeholder(
    session: Option<CurrentSession>,
    uri: Uri,
) -> Result<String, StatusCode> {
    let CurrentSession(session) = session.ok_or(StatusCode::NOT_FOUND)?;
    let visitor = if session.has_valid_session() {
        "signed in"
    } else {
        "guest"
    };
    Ok(format!("{} ({})", uri.path(), visitor))
}

/// Health check
pub async fn health() -> &'static str {
    "OK"
}
