//! Check command implementation
//!
//! Runs the route guard for a single path offline, the same way the server
//! would for a request carrying the given credential.

use super::{output::Output, ProfileArg};
use crate::auth::{
    jwt::SessionService,
    verifier::{JwtVerifier, TokenVerifier},
};
use crate::guard::{decide, normalize_path, Decision, RouteTable};
use crate::types::{ProfileState, Session};
use crate::utils::toml_config::{ConfigError, GateConfig};
use std::sync::Arc;

/// Where the session for a check comes from
pub enum SessionSource {
    Anonymous,
    Token(String),
    Assumed(ProfileArg),
}

impl SessionSource {
    pub fn from_args(token: Option<String>, profile: Option<ProfileArg>) -> Self {
        match (token, profile) {
            (Some(token), _) => SessionSource::Token(token),
            (None, Some(profile)) => SessionSource::Assumed(profile),
            (None, None) => SessionSource::Anonymous,
        }
    }
}

/// Resolve the session to evaluate; verifying a token needs the session secret
pub async fn resolve_session(
    config: &GateConfig,
    source: SessionSource,
) -> Result<Session, ConfigError> {
    let session = match source {
        SessionSource::Anonymous => Session::Anonymous,
        SessionSource::Assumed(profile) => Session::Authenticated(match profile {
            ProfileArg::Complete => ProfileState::Complete,
            ProfileArg::Incomplete => ProfileState::Incomplete,
            ProfileArg::Unknown => ProfileState::Unknown,
        }),
        SessionSource::Token(token) => {
            let sessions = SessionService::new(config.session_secret()?, config.auth.session_max_age);
            JwtVerifier::new(Arc::new(sessions))
                .verify(Some(&token))
                .await
        }
    };
    Ok(session)
}

/// Decide `path` for `session` and print the result
pub fn run(config: &GateConfig, path: &str, session: Session, output: &Output) -> Decision {
    let routes = RouteTable::from(&config.routes);

    output.header("Route check");
    output.kv("path", path);
    output.kv("session", if session.has_valid_session() { "valid" } else { "none" });
    output.kv("profile", &format!("{:?}", session.profile()));

    // Bypass rules see the raw path, as in the middleware
    if routes.bypasses(path) {
        output.info("Path is bypassed; the guard does not evaluate it");
        return Decision::Allow;
    }

    let path = normalize_path(path);
    let decision = decide(&session, path, &routes);
    output.decision(path, decision, decision.location(&routes));
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::RedirectTarget;

    #[test]
    fn test_source_prefers_token() {
        assert!(matches!(
            SessionSource::from_args(Some("t".to_string()), None),
            SessionSource::Token(_)
        ));
        assert!(matches!(
            SessionSource::from_args(None, Some(ProfileArg::Complete)),
            SessionSource::Assumed(ProfileArg::Complete)
        ));
        assert!(matches!(
            SessionSource::from_args(None, None),
            SessionSource::Anonymous
        ));
    }

    #[tokio::test]
    async fn test_assumed_profiles() {
        let config = GateConfig::default();
        let session = resolve_session(&config, SessionSource::Assumed(ProfileArg::Incomplete))
            .await
            .expect("no secret needed");
        assert_eq!(session, Session::Authenticated(ProfileState::Incomplete));
    }

    #[tokio::test]
    async fn test_token_without_secret_is_config_error() {
        let mut config = GateConfig::default();
        config.auth.secret_env = "HOLIYA_CHECK_TEST_UNSET_SECRET".to_string();

        let result = resolve_session(&config, SessionSource::Token("abc".to_string())).await;
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
    }

    #[test]
    fn test_run_reports_decision() {
        let config = GateConfig::default();
        let output = Output::no_color();

        assert_eq!(
            run(&config, "/dashboard", Session::Anonymous, &output),
            Decision::RedirectTo(RedirectTarget::Login)
        );
        assert_eq!(
            run(
                &config,
                "/register/",
                Session::Authenticated(ProfileState::Complete),
                &output
            ),
            Decision::RedirectTo(RedirectTarget::Dashboard)
        );
        assert_eq!(
            run(&config, "/api/health", Session::Anonymous, &output),
            Decision::Allow
        );
    }

    #[test]
    fn test_bypass_uses_raw_path() {
        let config = GateConfig::default();
        let output = Output::no_color();

        assert_eq!(
            run(&config, "/favicon.ico", Session::Anonymous, &output),
            Decision::Allow
        );
        assert_eq!(
            run(&config, "/favicon.ico/", Session::Anonymous, &output),
            Decision::RedirectTo(RedirectTarget::Login)
        );
    }
}
