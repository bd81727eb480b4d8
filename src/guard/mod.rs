//! Route Access Guard
//!
//! Decides, for every page navigation, whether the visitor may proceed or must
//! be sent to the login page, the onboarding page or the dashboard.
//!
//! # Module Structure
//!
//! - [`guard::routes`](crate::guard::routes) - path classification, redirect targets, bypass matcher
//! - [`guard::decision`](crate::guard::decision) - the ordered decision rules
//!
//! The guard is a pure function of `(Session, path)`. It reads no ambient
//! state; the axum layer in [`auth::middleware`](crate::auth::middleware)
//! gathers both inputs per request.
//!
//! ```ignore
//! use holiya::guard::{decide, Decision, RedirectTarget, RouteTable};
//! use holiya::types::Session;
//!
//! let routes = RouteTable::default();
//! assert_eq!(
//!     decide(&Session::Anonymous, "/dashboard", &routes),
//!     Decision::RedirectTo(RedirectTarget::Login),
//! );
//! ```

/// Ordered access rules.
pub mod decision;
/// Path classification and redirect targets.
pub mod routes;

pub use decision::{decide, Decision};
pub use routes::{normalize_path, RedirectTarget, RouteClass, RouteTable};
