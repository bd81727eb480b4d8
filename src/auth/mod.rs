//! Session Authentication and the Guard Layer
//!
//! This module owns the session credential: minting it after a credentials
//! login, verifying it on every request, and the axum layer that feeds the
//! verified session into the route guard.
//!
//! # Module Structure
//!
//! - [`auth::jwt`](crate::auth::jwt) - HS256 session tokens (issue, re-issue, verify)
//! - [`auth::verifier`](crate::auth::verifier) - the fail-closed `TokenVerifier` contract and credential extraction
//! - [`auth::provider`](crate::auth::provider) - credentials login against the REST backend
//! - [`auth::middleware`](crate::auth::middleware) - `route_guard` layer and `CurrentSession` extractor
//!
//! # Usage
//!
//! ```ignore
//! use holiya::auth::middleware::{route_guard, GuardState};
//!
//! let app = Router::new()
//!     .route("/dashboard", get(dashboard))
//!     .layer(middleware::from_fn_with_state(guard_state, route_guard));
//! ```
//!
//! # Configuration
//!
//! Configure via `holiya.toml`:
//! ```toml
//! [auth]
//! secret_env = "SESSION_SECRET"        # env var holding the signing key (32+ chars)
//! session_max_age = 36000              # seconds
//! cookie_name = "holiya.session-token"
//! ```

/// Session token issuing and verification.
pub mod jwt;
/// Route guard middleware and session extractor.
pub mod middleware;
/// Backend credentials login.
pub mod provider;
/// Token verifier contract consumed by the guard.
pub mod verifier;
