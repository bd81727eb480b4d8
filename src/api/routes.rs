use crate::api::handlers::{pages, session};
use crate::auth::middleware::route_guard;
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    // Everything under /api is bypassed by the guard
    let api_routes = Router::new()
        .route("/health", get(pages::health))
        .route("/auth/login", post(session::login))
        .route("/auth/logout", post(session::logout))
        .route("/auth/session", get(session::current))
        .route("/auth/session/profile", post(session::update_profile));

    let page_routes: Router<AppState> = if state.config.server.static_dir.is_some() {
        Router::new().fallback(pages::app_shell)
    } else {
        Router::new().fallback(pages::placeholder)
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .layer(middleware::from_fn_with_state(
            state.guard.clone(),
            route_guard,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
