//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use mockctl_config::ConfigError;
use mockctl_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to mock server at {url}")]
    #[diagnostic(
        code(mockctl::connection_failed),
        help(
            "Check that the mock server is running and reachable.\n\
             Reason: {reason}\n\
             Use --insecure (-k) for self-signed certificates."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(mockctl::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Server ───────────────────────────────────────────────────────
    /// The server's payload, shown as-is.
    #[error("{payload}")]
    #[diagnostic(code(mockctl::rejected), help("The server answered HTTP {status}."))]
    Rejected { status: u16, payload: String },

    #[error("{kind} {id} not found")]
    #[diagnostic(
        code(mockctl::not_found),
        help("Run: mockctl {list_command} list to see available records")
    )]
    NotFound {
        kind: String,
        id: String,
        list_command: String,
    },

    #[error("Unexpected response from server: {message}")]
    #[diagnostic(
        code(mockctl::decode),
        help("Is --server pointing at the admin API root?")
    )]
    Decode { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mockctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(mockctl::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: mockctl config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No mock server configured")]
    #[diagnostic(
        code(mockctl::no_config),
        help(
            "Pass --server, or create a profile with: mockctl config init\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(mockctl::config))]
    Config(Box<figment::Error>),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(mockctl::config))]
    ConfigFile(String),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(mockctl::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Internal ─────────────────────────────────────────────────────
    #[error("{0}")]
    #[diagnostic(code(mockctl::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    #[diagnostic(code(mockctl::json))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } | Self::Rejected { status: 404, .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            CoreError::Rejected { status, payload } => CliError::Rejected { status, payload },
            CoreError::Decode { message, .. } => CliError::Decode { message },
            CoreError::UnknownField { kind, field } => CliError::Validation {
                field,
                reason: format!("not an editable {kind} field"),
            },
            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },
            CoreError::NothingLoaded { kind } => CliError::Internal(format!("no {kind} loaded")),
            CoreError::InvalidRoute(route) => CliError::Validation {
                field: "route".into(),
                reason: route,
            },
            CoreError::Config { message } => CliError::ConfigFile(message),
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => {
                let available = mockctl_config::load_config_or_default()
                    .profiles
                    .into_keys()
                    .collect::<Vec<_>>()
                    .join(", ");
                CliError::ProfileNotFound { name, available }
            }
            ConfigError::NoProfile => CliError::NoConfig {
                path: mockctl_config::config_path().display().to_string(),
            },
            ConfigError::Figment(err) => CliError::Config(err),
            ConfigError::Io(err) => CliError::Io(err),
            ConfigError::Serialization(err) => CliError::ConfigFile(err.to_string()),
        }
    }
}
