//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use holiya::{
    api::routes::create_router,
    auth::{jwt::SessionService, provider::CredentialsProvider},
    types::{AppError, Result, SessionUser},
    AppState, GateConfig,
};
use std::sync::Arc;

pub const TEST_SECRET: &str = "integration-test-secret-of-32-chars!";
pub const COOKIE_NAME: &str = "holiya.session-token";

/// Provider with one known account whose onboarding state is fixed.
pub struct StubProvider {
    pub profile_complete: Option<bool>,
}

#[async_trait]
impl CredentialsProvider for StubProvider {
    async fn authorize(&self, email: &str, password: &str) -> Result<SessionUser> {
        if email == "ada@example.com" && password == "correct-horse" {
            Ok(test_user(self.profile_complete))
        } else {
            Err(AppError::Auth("Invalid email or password".to_string()))
        }
    }
}

pub fn test_user(profile_complete: Option<bool>) -> SessionUser {
    SessionUser {
        id: "42".to_string(),
        email: "ada@example.com".to_string(),
        name: "Ada".to_string(),
        access_token: Some("backend-token".to_string()),
        profile_complete,
        industry: None,
    }
}

pub fn sessions() -> Arc<SessionService> {
    Arc::new(SessionService::new(TEST_SECRET.to_string(), 3600))
}

pub fn server_with_provider(provider: Arc<dyn CredentialsProvider>) -> TestServer {
    server_with(GateConfig::default(), provider)
}

pub fn server_with_config(config: GateConfig) -> TestServer {
    server_with(config, Arc::new(StubProvider { profile_complete: None }))
}

fn server_with(config: GateConfig, provider: Arc<dyn CredentialsProvider>) -> TestServer {
    let state = AppState::new(config, sessions(), provider);
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

pub fn test_server(profile_complete: Option<bool>) -> TestServer {
    server_with_provider(Arc::new(StubProvider { profile_complete }))
}

/// A signed session token for a user in the given onboarding state.
pub fn token_for(profile_complete: Option<bool>) -> String {
    sessions()
        .issue(&test_user(profile_complete))
        .expect("token should sign")
}

pub fn session_cookie(token: &str) -> String {
    format!("{}={}", COOKIE_NAME, token)
}
