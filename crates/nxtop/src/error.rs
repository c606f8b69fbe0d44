//! CLI error types with miette diagnostics.
//!
//! Maps config and core errors into user-facing errors with help text and
//! a process exit code.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use nxtop_config::ConfigError;
use nxtop_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Credentials ──────────────────────────────────────────────────
    #[error("No credentials configured{}", username.as_deref().map(|u| format!(" for user '{u}'")).unwrap_or_default())]
    #[diagnostic(
        code(nxtop::no_credentials),
        help(
            "Set credentials.username in the inventory (or NXTOP_USERNAME), then either:\n  \
             export NXTOP_PASSWORD=...\n  \
             nxtop config set-password\n  \
             or add credentials.password to the inventory."
        )
    )]
    NoCredentials { username: Option<String> },

    #[error("Keyring error: {message}")]
    #[diagnostic(
        code(nxtop::keyring),
        help("Use NXTOP_PASSWORD or credentials.password_env when no system keyring is available.")
    )]
    Keyring { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(nxtop::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Inventory file not found: {}", path.display())]
    #[diagnostic(
        code(nxtop::no_inventory),
        help(
            "Create network_config.yaml in the working directory, pass --inventory,\n\
             or place an inventory at: {expected}"
        )
    )]
    InventoryNotFound { path: PathBuf, expected: String },

    #[error(transparent)]
    #[diagnostic(code(nxtop::config))]
    Config(Box<figment::Error>),

    #[error("Setup failed: {message}")]
    #[diagnostic(code(nxtop::setup))]
    Setup { message: String },

    // ── Reports ──────────────────────────────────────────────────────
    #[error("Could not write report {}", path.display())]
    #[diagnostic(
        code(nxtop::report_write),
        help("Check that the output directory exists and is writable, or pass --output-dir.")
    )]
    ReportWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("None of the {count} reports could be written")]
    #[diagnostic(code(nxtop::reports_failed))]
    AllReportsFailed { count: usize },

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {message}")]
    #[diagnostic(code(nxtop::serialization))]
    Serialization { message: String },
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: err.to_string(),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { username } => CliError::NoCredentials { username },
            ConfigError::NotFound { path } => CliError::InventoryNotFound {
                path,
                expected: nxtop_config::default_inventory_path().display().to_string(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Keyring(e) => CliError::Keyring {
                message: e.to_string(),
            },
            ConfigError::Serialization(e) => CliError::Serialization {
                message: e.to_string(),
            },
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let message = match err {
            CoreError::Config { message } => message,
            other => other.to_string(),
        };
        CliError::Setup { message }
    }
}
