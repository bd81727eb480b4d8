use crate::utils::toml_config::RoutesConfig;
use std::collections::HashSet;

/// Category of a requested path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteClass {
    /// Reachable without a session (login, registration start, signup).
    AuthPage,
    /// Everything else the app routes.
    ProtectedPage,
}

/// The three places the guard may send a visitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RedirectTarget {
    Login,
    Onboarding,
    Dashboard,
}

/// Static routing facts the guard evaluates against.
///
/// Built once at startup and never mutated; classification is an exact lookup
/// against the allow-list, with no prefix or pattern matching.
#[derive(Debug, Clone)]
pub struct RouteTable {
    login: String,
    onboarding: String,
    dashboard: String,
    auth_pages: HashSet<String>,
    bypass_prefixes: Vec<String>,
    bypass_paths: HashSet<String>,
    bypass_extensions: Vec<String>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::from(&RoutesConfig::default())
    }
}

impl From<&RoutesConfig> for RouteTable {
    fn from(config: &RoutesConfig) -> Self {
        Self {
            login: config.login.clone(),
            onboarding: config.onboarding.clone(),
            dashboard: config.dashboard.clone(),
            auth_pages: config.auth_pages.iter().cloned().collect(),
            bypass_prefixes: config
                .bypass_prefixes
                .iter()
                .map(|p| p.trim_end_matches('/').to_string())
                .collect(),
            bypass_paths: config.bypass_paths.iter().cloned().collect(),
            bypass_extensions: config
                .bypass_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }
}

impl RouteTable {
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.auth_pages.contains(path) {
            RouteClass::AuthPage
        } else {
            RouteClass::ProtectedPage
        }
    }

    /// Path a redirect target resolves to.
    pub fn target(&self, target: RedirectTarget) -> &str {
        match target {
            RedirectTarget::Login => &self.login,
            RedirectTarget::Onboarding => &self.onboarding,
            RedirectTarget::Dashboard => &self.dashboard,
        }
    }

    pub fn is_login(&self, path: &str) -> bool {
        path == self.login
    }

    pub fn is_onboarding(&self, path: &str) -> bool {
        path == self.onboarding
    }

    pub fn auth_pages(&self) -> impl Iterator<Item = &str> {
        self.auth_pages.iter().map(String::as_str)
    }

    /// Whether the guard skips this path entirely (API calls, build assets, icons).
    ///
    /// Prefixes match whole path segments: `/api` covers `/api` and `/api/x`
    /// but not `/apiary`.
    pub fn bypasses(&self, path: &str) -> bool {
        if self.bypass_paths.contains(path) {
            return true;
        }

        let under_prefix = self.bypass_prefixes.iter().any(|prefix| {
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        });
        if under_prefix {
            return true;
        }

        let file_name = path.rsplit('/').next().unwrap_or(path);
        match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self
                .bypass_extensions
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed)),
            _ => false,
        }
    }
}

/// Drops a trailing slash so `/login/` and `/login` classify alike. `/` stays `/`.
pub fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}
