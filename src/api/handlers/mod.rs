//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Page fallback and health handlers.
pub mod pages;
/// Session handlers (login, logout, session read, profile update).
pub mod session;
