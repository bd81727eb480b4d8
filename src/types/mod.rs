use serde::{Deserialize, Deserializer, Serialize};

// ============= API Request/Response Types =============

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Fields a signed-in user may change on their own session.
///
/// Absent fields keep the value already carried by the session.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProfileUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_complete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub user_id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    pub profile_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub expires_at: usize,
}

impl From<&SessionClaims> for SessionResponse {
    fn from(claims: &SessionClaims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            email: claims.email.clone(),
            name: claims.name.clone(),
            industry: claims.industry.clone(),
            profile_complete: claims.profile_state().is_complete(),
            access_token: claims.access_token.clone(),
            expires_at: claims.exp,
        }
    }
}

// ============= Session Types =============

/// A user the backend has just authenticated, before a session token exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub access_token: Option<String>,
    pub profile_complete: Option<bool>,
    pub industry: Option<String>,
}

/// Payload of a signed session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    /// Onboarding flag. Missing, null and non-boolean values all read as `None`.
    #[serde(
        default,
        deserialize_with = "lenient_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_complete: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    /// Bearer token for the REST backend, handed through to the front end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

impl SessionClaims {
    pub fn profile_state(&self) -> ProfileState {
        ProfileState::from_claim(self.profile_complete)
    }
}

fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_bool()))
}

/// Onboarding progress of a visitor.
///
/// `Unknown` describes a visitor without a session. Only `Complete` counts as
/// finished; every other state is confined to onboarding once signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileState {
    Unknown,
    Incomplete,
    Complete,
}

impl ProfileState {
    /// Maps the wire flag of a verified session. Anything but `true` is incomplete.
    pub fn from_claim(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => ProfileState::Complete,
            Some(false) | None => ProfileState::Incomplete,
        }
    }

    pub fn is_complete(self) -> bool {
        matches!(self, ProfileState::Complete)
    }
}

/// What the guard knows about the visitor behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Session {
    /// No credential, or one that failed verification.
    Anonymous,
    Authenticated(ProfileState),
}

impl Session {
    pub fn from_claims(claims: &SessionClaims) -> Self {
        Session::Authenticated(claims.profile_state())
    }

    pub fn has_valid_session(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn profile(&self) -> ProfileState {
        match self {
            Session::Anonymous => ProfileState::Unknown,
            Session::Authenticated(profile) => *profile,
        }
    }
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Auth(msg) => (axum::http::StatusCode::UNAUTHORIZED, msg),
            AppError::NotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (axum::http::StatusCode::BAD_REQUEST, msg),
            AppError::Config(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
