//! holiya-gate - session-aware route guard binary.

use std::path::Path;
use std::process::ExitCode;

use holiya::{
    api::routes::create_router,
    cli::{
        check::{self, SessionSource},
        init::{self, InitConfig, InitResult},
        output::Output,
        Cli, Commands,
    },
    AppState, GateConfig,
};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn setup_logging(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Missing .env is fine; real deployments set the environment directly
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match cli.command {
        Some(Commands::Init {
            path,
            force,
            host,
            port,
        }) => {
            let result = init::run(
                InitConfig {
                    path,
                    force,
                    host,
                    port,
                },
                &output,
            );
            match result {
                InitResult::Success | InitResult::AlreadyExists => ExitCode::SUCCESS,
                InitResult::Error(_) => ExitCode::FAILURE,
            }
        }
        Some(Commands::Config { full, validate }) => show_config(&cli.config, full, validate, &output),
        Some(Commands::Check {
            path,
            token,
            profile,
        }) => {
            if cli.verbose {
                setup_logging("debug", cli.json_logs);
            }
            let Some(config) = load_config(&cli.config, &output) else {
                return ExitCode::FAILURE;
            };
            match check::resolve_session(&config, SessionSource::from_args(token, profile)).await {
                Ok(session) => {
                    check::run(&config, &path, session, &output);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    output.error(&e.to_string());
                    ExitCode::FAILURE
                }
            }
        }
        None => {
            let Some(config) = load_config(&cli.config, &output) else {
                output.hint("Run 'holiya-gate init' to create a configuration");
                return ExitCode::FAILURE;
            };
            let level = if cli.verbose {
                "debug"
            } else {
                config.server.log_level.as_str()
            };
            setup_logging(level, cli.json_logs);
            serve(config).await
        }
    }
}

fn load_config(path: &Path, output: &Output) -> Option<GateConfig> {
    match GateConfig::load(path) {
        Ok(config) => Some(config),
        Err(e) => {
            output.error(&e.to_string());
            None
        }
    }
}

fn show_config(path: &Path, full: bool, validate: bool, output: &Output) -> ExitCode {
    let Some(config) = load_config(path, output) else {
        return ExitCode::FAILURE;
    };

    if validate {
        output.success(&format!("{} is valid", path.display()));
        if let Err(e) = config.session_secret() {
            output.warning(&e.to_string());
        }
        if let Err(e) = config.backend_url() {
            output.warning(&e.to_string());
        }
    }

    output.header("Configuration");
    output.kv("file", &path.display().to_string());
    output.kv("listen", &config.bind_addr());
    output.kv("cookie", &config.auth.cookie_name);
    output.kv("session max age", &format!("{}s", config.auth.session_max_age));

    output.subheader("Routes");
    output.kv("login", &config.routes.login);
    output.kv("onboarding", &config.routes.onboarding);
    output.kv("dashboard", &config.routes.dashboard);
    for page in &config.routes.auth_pages {
        output.list_item(page);
    }

    if full {
        output.subheader("Full configuration");
        match toml::to_string_pretty(&config) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => {
                output.error(&format!("Failed to render configuration: {}", e));
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

async fn serve(config: GateConfig) -> ExitCode {
    let addr = config.bind_addr();

    let state = match AppState::from_config(config) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialise gate: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!("holiya-gate listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Server shut down");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
