//! Building the gate from a holiya.toml on disk.

use axum_test::TestServer;
use holiya::{api::routes::create_router, AppState, ConfigError, GateConfig};
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("holiya.toml");
    fs::write(&path, content).expect("write config");
    path
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().expect("temp dir");

    let result = GateConfig::load(dir.path().join("holiya.toml"));

    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn test_redirect_loop_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(
        &dir,
        r#"
[routes]
login = "/sign-in"
auth_pages = ["/register"]
"#,
    );

    let result = GateConfig::load(path);

    assert!(matches!(result, Err(ConfigError::RedirectLoop(_))));
}

#[test]
fn test_state_needs_secret_and_backend() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_config(
        &dir,
        r#"
[auth]
secret_env = "HOLIYA_CONFIG_TEST_MISSING_SECRET"
backend_url_env = "HOLIYA_CONFIG_TEST_MISSING_API"
"#,
    );
    let config = GateConfig::load(path).expect("should load");

    let result = AppState::from_config(config);

    assert!(matches!(result, Err(ConfigError::MissingEnvVar(ref name)) if name == "HOLIYA_CONFIG_TEST_MISSING_SECRET"));
}

#[test]
fn test_short_secret_is_rejected() {
    std::env::set_var("HOLIYA_CONFIG_TEST_SHORT_SECRET", "too-short");
    let config = GateConfig::from_toml(
        r#"
[auth]
secret_env = "HOLIYA_CONFIG_TEST_SHORT_SECRET"
"#,
    )
    .expect("should parse");

    assert!(matches!(
        config.session_secret(),
        Err(ConfigError::ValidationError(_))
    ));
}

#[tokio::test]
async fn test_custom_routes_drive_the_guard() {
    std::env::set_var(
        "HOLIYA_CONFIG_TEST_SECRET",
        "a-sufficiently-long-session-secret-value",
    );
    std::env::set_var("HOLIYA_CONFIG_TEST_API", "http://127.0.0.1:9/api/");

    let dir = TempDir::new().expect("temp dir");
    let path = write_config(
        &dir,
        r#"
[auth]
secret_env = "HOLIYA_CONFIG_TEST_SECRET"
backend_url_env = "HOLIYA_CONFIG_TEST_API"
cookie_name = "gate"

[routes]
login = "/sign-in"
onboarding = "/welcome"
dashboard = "/home"
auth_pages = ["/sign-in", "/welcome"]
"#,
    );
    let config = GateConfig::load(path).expect("should load");
    let state = AppState::from_config(config).expect("state");
    let server = TestServer::new(create_router(state)).expect("Failed to create test server");

    let response = server.get("/home").await;
    response.assert_status(axum::http::StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "/sign-in");

    server.get("/welcome").await.assert_status_ok();
}
