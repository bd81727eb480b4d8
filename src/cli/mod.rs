//! CLI module for holiya-gate
//!
//! Provides command-line interface parsing and handling for the holiya-gate binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod check;
pub mod init;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// holiya-gate - session-aware route guard
///
/// Verifies the session on every page navigation and sends visitors to the
/// login page, the onboarding page or the dashboard as their state requires.
#[derive(Parser, Debug)]
#[command(
    name = "holiya-gate",
    version,
    about = "holiya-gate - session-aware route guard",
    long_about = "Verifies the session credential on every page navigation and redirects\n\
                  visitors to login, onboarding or the dashboard.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a configuration.",
    after_help = "EXAMPLES:\n    \
                  holiya-gate init                        # Scaffold holiya.toml\n    \
                  holiya-gate                             # Start the server (requires holiya.toml)\n    \
                  holiya-gate check /dashboard            # Decide a path for an anonymous visitor\n    \
                  holiya-gate check /login --profile complete"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "holiya.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold holiya.toml and .env.example
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,

        /// Host address for the server
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port for the server
        #[arg(long, default_value = "3000")]
        port: u16,
    },

    /// Show configuration information
    Config {
        /// Show the full configuration
        #[arg(short = 'f', long)]
        full: bool,

        /// Validate the configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Run the route guard for one path without starting the server
    Check {
        /// Request path, e.g. /dashboard
        path: String,

        /// Session token to verify (needs the session secret in the environment)
        #[arg(long, conflicts_with = "profile")]
        token: Option<String>,

        /// Assume a valid session with this profile state
        #[arg(long, value_enum)]
        profile: Option<ProfileArg>,
    },
}

/// Profile state for `check --profile`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    Complete,
    Incomplete,
    Unknown,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
