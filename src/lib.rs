//! # Holiya Gate
//!
//! Session-aware route guard for the Holiya health app. Every page navigation
//! is checked against the visitor's signed session and onboarding progress,
//! and either allowed or redirected to the login page, the onboarding page or
//! the dashboard.
//!
//! ## Overview
//!
//! The gate can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `holiya-gate` binary in front of the built front end
//! 2. **As a library** - Mount [`auth::middleware::route_guard`] in your own axum router
//!
//! ### Deciding a Route
//!
//! ```rust
//! use holiya::guard::{decide, Decision, RedirectTarget, RouteTable};
//! use holiya::types::{ProfileState, Session};
//!
//! let routes = RouteTable::default();
//!
//! assert_eq!(
//!     decide(&Session::Anonymous, "/dashboard", &routes),
//!     Decision::RedirectTo(RedirectTarget::Login),
//! );
//! assert_eq!(
//!     decide(&Session::Authenticated(ProfileState::Incomplete), "/dashboard", &routes),
//!     Decision::RedirectTo(RedirectTarget::Onboarding),
//! );
//! ```
//!
//! ### Configuration-Driven Setup
//!
//! ```rust,ignore
//! use holiya::{AppState, GateConfig};
//!
//! let config = GateConfig::load("holiya.toml")?;
//! let state = AppState::from_config(config)?;
//! let app = holiya::api::routes::create_router(state);
//! ```
//!
//! ## Modules
//!
//! - [`guard`] - Route classification and the ordered access rules
//! - [`auth`] - Session tokens, verification, backend login and the guard layer
//! - [`api`] - HTTP handlers and routes
//! - [`types`] - Session types and error handling
//! - [`utils`] - TOML configuration
//! - [`cli`] - Command-line interface

#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Session tokens, verification and the guard middleware.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// Route access guard.
pub mod guard;
/// Core types (sessions, requests, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use guard::{decide, Decision, RouteTable};
pub use types::{AppError, Result};
pub use utils::toml_config::{ConfigError, GateConfig};

use crate::auth::{
    jwt::SessionService,
    middleware::GuardState,
    provider::{BackendLogin, CredentialsProvider},
    verifier::JwtVerifier,
};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Configuration loaded at startup
    pub config: Arc<GateConfig>,
    /// Session token service
    pub sessions: Arc<SessionService>,
    /// Credentials login backend
    pub provider: Arc<dyn CredentialsProvider>,
    /// Route guard inputs
    pub guard: GuardState,
}

impl AppState {
    /// Wire the state from already-built parts
    pub fn new(
        config: GateConfig,
        sessions: Arc<SessionService>,
        provider: Arc<dyn CredentialsProvider>,
    ) -> Self {
        let routes = Arc::new(RouteTable::from(&config.routes));
        let verifier = Arc::new(JwtVerifier::new(sessions.clone()));
        let guard = GuardState::new(routes, verifier, config.auth.cookie_name.as_str());

        Self {
            config: Arc::new(config),
            sessions,
            provider,
            guard,
        }
    }

    /// Build the state from configuration, resolving secrets from the environment
    pub fn from_config(config: GateConfig) -> std::result::Result<Self, ConfigError> {
        let secret = config.session_secret()?;
        let backend_url = config.backend_url()?;

        let sessions = Arc::new(SessionService::new(secret, config.auth.session_max_age));
        let provider = Arc::new(BackendLogin::new(backend_url));

        Ok(Self::new(config, sessions, provider))
    }
}
