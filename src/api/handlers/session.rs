use crate::{
    auth::verifier::extract_credential,
    types::{AppError, LoginRequest, ProfileUpdateRequest, Result, SessionClaims, SessionResponse},
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;
use tracing::info;

/// Login with email and password against the backend and start a session
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let user = state
        .provider
        .authorize(&payload.email, &payload.password)
        .await?;

    let token = state.sessions.issue(&user)?;
    let claims = state.sessions.verify(&token)?;

    info!(
        user_id = %claims.sub,
        profile_complete = ?claims.profile_complete,
        "Session started"
    );

    Ok((
        jar.add(session_cookie(&state, token)),
        Json(SessionResponse::from(&claims)),
    ))
}

/// End the session by expiring the cookie
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let cookie = Cookie::build((state.config.auth.cookie_name.clone(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.auth.secure_cookie)
        .max_age(Duration::ZERO);

    (jar.add(cookie), StatusCode::NO_CONTENT)
}

/// Current session, read from the request credential
pub async fn current(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<Json<SessionResponse>> {
    let claims = verified_claims(&state, &headers)?;
    Ok(Json(SessionResponse::from(&claims)))
}

/// Update profile fields on the session, typically once onboarding finishes
///
/// The token is re-issued so the next navigation is guarded with the new
/// profile state.
pub async fn update_profile(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: axum::http::HeaderMap,
    Json(payload): Json<ProfileUpdateRequest>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let claims = verified_claims(&state, &headers)?;
    let (token, updated) = state.sessions.reissue(&claims, &payload)?;

    info!(
        user_id = %updated.sub,
        profile_complete = ?updated.profile_complete,
        "Session profile updated"
    );

    Ok((
        jar.add(session_cookie(&state, token)),
        Json(SessionResponse::from(&updated)),
    ))
}

fn verified_claims(state: &AppState, headers: &axum::http::HeaderMap) -> Result<SessionClaims> {
    let token = extract_credential(headers, &state.config.auth.cookie_name)
        .ok_or_else(|| AppError::Auth("No session".to_string()))?;
    state.sessions.verify(&token)
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((state.config.auth.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.auth.secure_cookie)
        .max_age(Duration::seconds(state.sessions.max_age()))
        .build()
}
