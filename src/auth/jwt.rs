use crate::types::{AppError, ProfileUpdateRequest, Result, SessionClaims, SessionUser};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Minimum secret length accepted when the server starts.
pub const MIN_SECRET_LEN: usize = 32;

/// Session token service: mints, re-issues and verifies HS256 session tokens.
pub struct SessionService {
    secret: String,
    max_age: i64,
}

impl SessionService {
    /// Creates a new SessionService.
    ///
    /// # Arguments
    /// * `secret` - Key used to sign session tokens (at least 32 chars in production)
    /// * `max_age` - Session validity in seconds
    pub fn new(secret: String, max_age: i64) -> Self {
        Self { secret, max_age }
    }

    /// Session validity in seconds, also used as the cookie `Max-Age`.
    pub fn max_age(&self) -> i64 {
        self.max_age
    }

    /// Mints a session token for a freshly authenticated user.
    pub fn issue(&self, user: &SessionUser) -> Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            profile_complete: user.profile_complete,
            industry: user.industry.clone(),
            access_token: user.access_token.clone(),
            exp: self.expiry(now)?,
            iat: now.timestamp() as usize,
        };

        self.sign(&claims)
    }

    /// Re-issues a session with updated profile fields and a fresh expiry.
    ///
    /// Fields absent from `update` keep their current values.
    pub fn reissue(
        &self,
        claims: &SessionClaims,
        update: &ProfileUpdateRequest,
    ) -> Result<(String, SessionClaims)> {
        let now = Utc::now();
        let updated = SessionClaims {
            profile_complete: update.profile_complete.or(claims.profile_complete),
            name: update
                .user_name
                .clone()
                .unwrap_or_else(|| claims.name.clone()),
            industry: update.industry.clone().or_else(|| claims.industry.clone()),
            exp: self.expiry(now)?,
            iat: now.timestamp() as usize,
            ..claims.clone()
        };

        let token = self.sign(&updated)?;
        Ok((token, updated))
    }

    /// Verifies a session token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<SessionClaims> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))
    }

    fn expiry(&self, now: DateTime<Utc>) -> Result<usize> {
        Duration::try_seconds(self.max_age)
            .and_then(|max_age| now.checked_add_signed(max_age))
            .map(|exp| exp.timestamp() as usize)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Session max age of {}s is out of range",
                    self.max_age
                ))
            })
    }

    fn sign(&self, claims: &SessionClaims) -> Result<String> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Auth(format!("Failed to sign session token: {}", e)))
    }
}
