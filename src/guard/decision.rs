use super::routes::{RedirectTarget, RouteClass, RouteTable};
use crate::types::Session;
use std::fmt;

/// Outcome of guarding one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Proceed to the requested path unchanged.
    Allow,
    RedirectTo(RedirectTarget),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Redirect location, if this decision redirects.
    pub fn location<'a>(&self, routes: &'a RouteTable) -> Option<&'a str> {
        match self {
            Decision::Allow => None,
            Decision::RedirectTo(target) => Some(routes.target(*target)),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Allow => write!(f, "allow"),
            Decision::RedirectTo(RedirectTarget::Login) => write!(f, "redirect to login"),
            Decision::RedirectTo(RedirectTarget::Onboarding) => write!(f, "redirect to onboarding"),
            Decision::RedirectTo(RedirectTarget::Dashboard) => write!(f, "redirect to dashboard"),
        }
    }
}

/// Decides whether `session` may reach `path`.
///
/// The checks run in a fixed order. Anonymous visitors are settled first so an
/// absent profile can never reach the onboarding rule, and onboarding
/// confinement runs before the dashboard shortcuts so an unfinished profile
/// never lands on the dashboard.
pub fn decide(session: &Session, path: &str, routes: &RouteTable) -> Decision {
    let profile = match session {
        Session::Anonymous => {
            return match routes.classify(path) {
                RouteClass::ProtectedPage => Decision::RedirectTo(RedirectTarget::Login),
                RouteClass::AuthPage => Decision::Allow,
            };
        }
        Session::Authenticated(profile) => *profile,
    };

    // Onboarding confinement: one rule covering login and every other page
    if !profile.is_complete() {
        return if routes.is_onboarding(path) {
            Decision::Allow
        } else {
            Decision::RedirectTo(RedirectTarget::Onboarding)
        };
    }

    if routes.is_login(path) || routes.is_onboarding(path) {
        return Decision::RedirectTo(RedirectTarget::Dashboard);
    }

    Decision::Allow
}
