//! TOML-based configuration for the Holiya gate
//!
//! This module loads the server, session and route settings from a TOML file
//! (`holiya.toml`). Secrets are never stored in the file; the config names the
//! environment variables that hold them.
//!
//! The route table is read once at startup. There is no hot reload: redirect
//! targets and the auth-page allow-list are constants for the life of the
//! process.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::auth::jwt::MIN_SECRET_LEN;

/// Longest session lifetime accepted, in seconds (one year).
pub const MAX_SESSION_MAX_AGE: i64 = 365 * 24 * 60 * 60;

/// Root configuration structure loaded from holiya.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Directory with the built front end; pages get a placeholder when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            static_dir: None,
        }
    }
}

// ============= Session Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable name containing the session signing secret
    #[serde(default = "default_secret_env")]
    pub secret_env: String,

    /// Session lifetime in seconds
    #[serde(default = "default_session_max_age")]
    pub session_max_age: i64,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Mark the session cookie `Secure` (HTTPS deployments)
    #[serde(default)]
    pub secure_cookie: bool,

    /// Environment variable name containing the REST backend base URL
    #[serde(default = "default_backend_url_env")]
    pub backend_url_env: String,
}

fn default_secret_env() -> String {
    "SESSION_SECRET".to_string()
}

fn default_session_max_age() -> i64 {
    10 * 60 * 60
}

fn default_cookie_name() -> String {
    "holiya.session-token".to_string()
}

fn default_backend_url_env() -> String {
    "API_URL".to_string()
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_env: default_secret_env(),
            session_max_age: default_session_max_age(),
            cookie_name: default_cookie_name(),
            secure_cookie: false,
            backend_url_env: default_backend_url_env(),
        }
    }
}

// ============= Route Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutesConfig {
    #[serde(default = "default_login")]
    pub login: String,

    /// Onboarding continuation page; the only page an unfinished profile may use
    #[serde(default = "default_onboarding")]
    pub onboarding: String,

    #[serde(default = "default_dashboard")]
    pub dashboard: String,

    /// Pages reachable without a session (exact paths)
    #[serde(default = "default_auth_pages")]
    pub auth_pages: Vec<String>,

    /// Path prefixes the guard never evaluates
    #[serde(default = "default_bypass_prefixes")]
    pub bypass_prefixes: Vec<String>,

    /// Exact paths the guard never evaluates
    #[serde(default = "default_bypass_paths")]
    pub bypass_paths: Vec<String>,

    /// File extensions the guard never evaluates
    #[serde(default = "default_bypass_extensions")]
    pub bypass_extensions: Vec<String>,
}

fn default_login() -> String {
    "/login".to_string()
}

fn default_onboarding() -> String {
    "/register".to_string()
}

fn default_dashboard() -> String {
    "/dashboard".to_string()
}

fn default_auth_pages() -> Vec<String> {
    vec![
        "/login".to_string(),
        "/register".to_string(),
        "/signup".to_string(),
    ]
}

fn default_bypass_prefixes() -> Vec<String> {
    vec![
        "/api".to_string(),
        "/_next/static".to_string(),
        "/_next/image".to_string(),
    ]
}

fn default_bypass_paths() -> Vec<String> {
    vec!["/favicon.ico".to_string()]
}

fn default_bypass_extensions() -> Vec<String> {
    vec!["svg".to_string()]
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            login: default_login(),
            onboarding: default_onboarding(),
            dashboard: default_dashboard(),
            auth_pages: default_auth_pages(),
            bypass_prefixes: default_bypass_prefixes(),
            bypass_paths: default_bypass_paths(),
            bypass_extensions: default_bypass_extensions(),
        }
    }
}

// ============= Configuration Loading & Validation =============

/// Errors that can occur during configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Environment variable '{0}' referenced in config is not set")]
    MissingEnvVar(String),

    #[error("Redirect loop: {0}")]
    RedirectLoop(String),
}

impl GateConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: GateConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the route table for malformed paths and redirect loops
    pub fn validate(&self) -> Result<(), ConfigError> {
        let routes = &self.routes;

        let named = [
            ("login", &routes.login),
            ("onboarding", &routes.onboarding),
            ("dashboard", &routes.dashboard),
        ];
        for (name, path) in named {
            if !path.starts_with('/') {
                return Err(ConfigError::ValidationError(format!(
                    "routes.{} must start with '/', got '{}'",
                    name, path
                )));
            }
        }

        if let Some(bad) = routes.auth_pages.iter().find(|p| !p.starts_with('/')) {
            return Err(ConfigError::ValidationError(format!(
                "routes.auth_pages entry must start with '/', got '{}'",
                bad
            )));
        }

        if self.auth.session_max_age <= 0 {
            return Err(ConfigError::ValidationError(
                "auth.session_max_age must be positive".to_string(),
            ));
        }

        if self.auth.session_max_age > MAX_SESSION_MAX_AGE {
            return Err(ConfigError::ValidationError(format!(
                "auth.session_max_age must be at most {} seconds, got {}",
                MAX_SESSION_MAX_AGE, self.auth.session_max_age
            )));
        }

        if self.auth.cookie_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "auth.cookie_name must not be empty".to_string(),
            ));
        }

        if !routes.auth_pages.contains(&routes.login) {
            return Err(ConfigError::RedirectLoop(format!(
                "login page '{}' is not an auth page; visitors without a session would be sent to it forever",
                routes.login
            )));
        }

        if routes.onboarding == routes.login {
            return Err(ConfigError::RedirectLoop(
                "onboarding page and login page must differ".to_string(),
            ));
        }

        if routes.dashboard == routes.login || routes.dashboard == routes.onboarding {
            return Err(ConfigError::RedirectLoop(format!(
                "dashboard '{}' must differ from the login and onboarding pages",
                routes.dashboard
            )));
        }

        if routes.auth_pages.contains(&routes.dashboard) {
            return Err(ConfigError::ValidationError(format!(
                "dashboard '{}' must not be an auth page",
                routes.dashboard
            )));
        }

        let table = crate::guard::RouteTable::from(routes);
        for (name, path) in named {
            if table.bypasses(path) {
                return Err(ConfigError::ValidationError(format!(
                    "routes.{} '{}' is excluded from the guard by a bypass rule",
                    name, path
                )));
            }
        }

        Ok(())
    }

    /// Resolve an environment variable by name
    pub fn resolve_env(&self, env_name: &str) -> Option<String> {
        std::env::var(env_name).ok()
    }

    /// The session signing secret, which must be set and long enough
    pub fn session_secret(&self) -> Result<String, ConfigError> {
        let secret = self
            .resolve_env(&self.auth.secret_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.secret_env.clone()))?;

        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::ValidationError(format!(
                "{} must be at least {} characters",
                self.auth.secret_env, MIN_SECRET_LEN
            )));
        }

        Ok(secret)
    }

    /// The REST backend base URL
    pub fn backend_url(&self) -> Result<String, ConfigError> {
        self.resolve_env(&self.auth.backend_url_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(self.auth.backend_url_env.clone()))
    }

    /// Socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn create_test_config() -> String {
        r#"
[server]
host = "0.0.0.0"
port = 8080
log_level = "debug"

[auth]
secret_env = "TEST_SESSION_SECRET"
session_max_age = 3600
cookie_name = "test.session"
backend_url_env = "TEST_API_URL"

[routes]
login = "/login"
onboarding = "/register"
dashboard = "/dashboard"
auth_pages = ["/login", "/register", "/signup"]
"#
        .to_string()
    }

    #[test]
    fn test_parse_config() {
        let config = GateConfig::from_toml(&create_test_config()).expect("should parse");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.session_max_age, 3600);
        assert_eq!(config.auth.cookie_name, "test.session");
        assert_eq!(config.routes.auth_pages.len(), 3);
        // Omitted bypass lists fall back to defaults
        assert_eq!(config.routes.bypass_paths, vec!["/favicon.ico"]);
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = GateConfig::from_toml("").expect("empty config is valid");

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.session_max_age, 36000);
        assert_eq!(config.routes.login, "/login");
        assert_eq!(config.routes.onboarding, "/register");
        assert_eq!(config.routes.dashboard, "/dashboard");
    }

    #[test]
    fn test_login_must_be_auth_page() {
        let result = GateConfig::from_toml(
            r#"
[routes]
auth_pages = ["/register", "/signup"]
"#,
        );
        assert!(matches!(result, Err(ConfigError::RedirectLoop(_))));
    }

    #[test]
    fn test_dashboard_cannot_be_login() {
        let result = GateConfig::from_toml(
            r#"
[routes]
dashboard = "/login"
"#,
        );
        assert!(matches!(result, Err(ConfigError::RedirectLoop(_))));
    }

    #[test]
    fn test_onboarding_cannot_be_login() {
        let result = GateConfig::from_toml(
            r#"
[routes]
onboarding = "/login"
"#,
        );
        assert!(matches!(result, Err(ConfigError::RedirectLoop(_))));
    }

    #[test]
    fn test_dashboard_cannot_be_public() {
        let result = GateConfig::from_toml(
            r#"
[routes]
auth_pages = ["/login", "/register", "/dashboard"]
"#,
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_relative_route_rejected() {
        let result = GateConfig::from_toml(
            r#"
[routes]
dashboard = "dashboard"
"#,
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_bypassed_target_rejected() {
        let result = GateConfig::from_toml(
            r#"
[routes]
dashboard = "/api/dashboard"
"#,
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_non_positive_max_age_rejected() {
        let result = GateConfig::from_toml(
            r#"
[auth]
session_max_age = 0
"#,
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_oversized_max_age_rejected() {
        let result = GateConfig::from_toml(
            r#"
[auth]
session_max_age = 9223372036854775807
"#,
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));

        let one_year = GateConfig::from_toml(&format!(
            "[auth]\nsession_max_age = {}",
            MAX_SESSION_MAX_AGE
        ));
        assert!(one_year.is_ok());
    }

    #[test]
    fn test_invalid_toml() {
        let result = GateConfig::from_toml("[server\nport = 1");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = GateConfig::load("/definitely/not/here/holiya.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(create_test_config().as_bytes())
            .expect("write config");

        let config = GateConfig::load(file.path()).expect("should load");
        assert_eq!(config.server.log_level, "debug");
    }

    #[test]
    fn test_session_secret_resolution() {
        let mut config = GateConfig::default();
        config.auth.secret_env = "HOLIYA_TEST_SECRET_UNSET_VAR".to_string();
        assert!(matches!(
            config.session_secret(),
            Err(ConfigError::MissingEnvVar(_))
        ));

        // SAFETY: Each test uses its own variable name
        unsafe {
            std::env::set_var("HOLIYA_TEST_SHORT_SECRET", "short");
            std::env::set_var(
                "HOLIYA_TEST_LONG_SECRET",
                "a-secret-that-is-comfortably-over-32-chars",
            );
        }

        config.auth.secret_env = "HOLIYA_TEST_SHORT_SECRET".to_string();
        assert!(matches!(
            config.session_secret(),
            Err(ConfigError::ValidationError(_))
        ));

        config.auth.secret_env = "HOLIYA_TEST_LONG_SECRET".to_string();
        assert!(config.session_secret().is_ok());
    }
}
