use crate::types::{AppError, LoginRequest, Result, SessionUser};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

/// Checks user credentials with whoever owns the user accounts.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    async fn authorize(&self, email: &str, password: &str) -> Result<SessionUser>;
}

/// Credentials login against the REST backend (`POST {base}user/login`).
pub struct BackendLogin {
    http_client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    succeeded: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<LoginData>,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    access_token: String,
    user_name: String,
    user_email: String,
    #[serde(default)]
    user_profile_completion: Option<bool>,
    user_id: UserId,
    #[serde(default)]
    industry: Option<String>,
}

/// The backend sends numeric ids; older deployments sent strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UserId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserId::Number(id) => write!(f, "{}", id),
            UserId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl BackendLogin {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            http_client,
            base_url,
        }
    }

    pub fn login_url(&self) -> String {
        format!("{}user/login", self.base_url)
    }
}

#[async_trait]
impl CredentialsProvider for BackendLogin {
    async fn authorize(&self, email: &str, password: &str) -> Result<SessionUser> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "Please provide both email and password".to_string(),
            ));
        }

        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = self
            .http_client
            .post(self.login_url())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Login failed: {}", e)))?;

        let status = response.status();
        let parsed = response.json::<LoginResponse>().await;
        debug!(%status, "Backend login responded");

        let login = match parsed {
            Ok(login) => login,
            Err(e) => {
                warn!("Unreadable backend login response ({}): {}", status, e);
                return Err(AppError::Auth("Authentication failed".to_string()));
            }
        };

        if !status.is_success() || !login.succeeded {
            let message = login
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Authentication failed".to_string());
            return Err(AppError::Auth(message));
        }

        let data = login
            .data
            .ok_or_else(|| AppError::Auth("Authentication failed".to_string()))?;

        Ok(SessionUser {
            id: data.user_id.to_string(),
            email: data.user_email,
            name: data.user_name,
            access_token: Some(data.access_token),
            profile_complete: data.user_profile_completion,
            industry: data.industry,
        })
    }
}
