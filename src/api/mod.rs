//! HTTP API Handlers and Routes
//!
//! This module provides the HTTP surface of the gate, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Session (`/api/auth`)
//! - `POST /api/auth/login` - Log in against the backend and receive the session cookie
//! - `POST /api/auth/logout` - Expire the session cookie
//! - `GET /api/auth/session` - Read the current session
//! - `POST /api/auth/session/profile` - Update profile fields and re-issue the session
//!
//! ## Health (`/api/health`)
//! - `GET /api/health` - Health check endpoint
//!
//! # Pages
//!
//! Every other path is a page and goes through the route guard first. Allowed
//! pages are served from `server.static_dir`, or a placeholder when unset.
//!
//! # Authentication
//!
//! The session credential travels in the session cookie or, for scripted
//! clients, in the `Authorization` header:
//! ```text
//! Authorization: Bearer <token>
//! ```

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;
