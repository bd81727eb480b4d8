//! Init command implementation
//!
//! Scaffolds `holiya.toml` and `.env.example` for a new gate deployment.

use super::output::Output;
use crate::utils::toml_config::GateConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of the init operation
#[derive(Debug, PartialEq, Eq)]
pub enum InitResult {
    /// Initialization completed successfully
    Success,
    /// Project already exists (holiya.toml found)
    AlreadyExists,
    /// An error occurred during initialization
    Error(String),
}

/// Configuration for the init command
pub struct InitConfig {
    /// Directory to initialize
    pub path: PathBuf,
    /// Overwrite existing files
    pub force: bool,
    /// Host address for the server
    pub host: String,
    /// Port for the server
    pub port: u16,
}

/// Run the init command
pub fn run(config: InitConfig, output: &Output) -> InitResult {
    output.banner();
    output.header("Initializing holiya-gate");

    let base_path = &config.path;
    let config_path = base_path.join("holiya.toml");
    if config_path.exists() && !config.force {
        output.warning("holiya.toml already exists!");
        output.hint("Use --force to overwrite existing files");
        return InitResult::AlreadyExists;
    }

    if !base_path.exists() {
        if let Err(e) = fs::create_dir_all(base_path) {
            output.error(&format!("Failed to create {}: {}", base_path.display(), e));
            return InitResult::Error(e.to_string());
        }
    }

    output.subheader("Creating configuration files");

    let files = [
        ("config", "holiya.toml", generate_config(&config.host, config.port)),
        ("env", ".env.example", generate_env_example()),
    ];

    for (kind, name, content) in files {
        match write_file(base_path, name, &content, config.force) {
            Ok(true) => output.created(kind, name),
            Ok(false) => output.skipped(name, "already exists"),
            Err(e) => {
                output.error(&format!("Failed to write {}: {}", name, e));
                return InitResult::Error(e.to_string());
            }
        }
    }

    // The scaffold must load with the same rules the server applies
    if let Err(e) = GateConfig::load(&config_path) {
        output.error(&format!("Generated configuration is invalid: {}", e));
        return InitResult::Error(e.to_string());
    }

    output.subheader("Next steps");
    output.command("cp .env.example .env   # then set SESSION_SECRET and API_URL");
    output.command("holiya-gate config --validate");
    output.command("holiya-gate");

    InitResult::Success
}

/// Writes `name` under `base`; returns false when an existing file was kept.
fn write_file(base: &Path, name: &str, content: &str, force: bool) -> std::io::Result<bool> {
    let path = base.join(name);
    if path.exists() && !force {
        return Ok(false);
    }
    fs::write(path, content)?;
    Ok(true)
}

fn generate_config(host: &str, port: u16) -> String {
    format!(
        r#"# holiya-gate configuration

[server]
host = "{host}"
port = {port}
log_level = "info"
# Built front end to serve behind the guard
# static_dir = "./public"

[auth]
# Environment variable holding the session signing secret (32+ chars)
secret_env = "SESSION_SECRET"
# Session lifetime in seconds (10 hours)
session_max_age = 36000
cookie_name = "holiya.session-token"
secure_cookie = false
# Environment variable holding the REST backend base URL
backend_url_env = "API_URL"

[routes]
login = "/login"
onboarding = "/register"
dashboard = "/dashboard"
auth_pages = ["/login", "/register", "/signup"]
bypass_prefixes = ["/api", "/_next/static", "/_next/image"]
bypass_paths = ["/favicon.ico"]
bypass_extensions = ["svg"]
"#
    )
}

fn generate_env_example() -> String {
    r#"# Session signing secret, at least 32 characters
SESSION_SECRET=change-me-to-a-long-random-value-of-32-chars
# REST backend base URL (login is POSTed to {API_URL}user/login)
API_URL=http://localhost:8000/api/
# Overrides server.log_level
RUST_LOG=info
"#
    .to_string()
}
