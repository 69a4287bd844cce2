//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use wavecheck_core::CoreError;

/// Exit codes per the CLI contract.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(wavecheck::connection_failed),
        help(
            "Check that the controller is running and accessible.\n\
             URL: {url}\n\
             Try: wavecheck score --insecure"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed for profile '{profile}'")]
    #[diagnostic(
        code(wavecheck::auth_failed),
        help(
            "Verify the username and password for this controller.\n\
             Set WAVECHECK_PASSWORD, or store the password in the system keyring\n\
             under service 'wavecheck', user '{profile}/password'."
        )
    )]
    AuthFailed { profile: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(wavecheck::no_credentials),
        help(
            "Add username/password to the profile, or set the\n\
             WAVECHECK_USERNAME and WAVECHECK_PASSWORD environment variables."
        )
    )]
    NoCredentials { profile: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration file not found")]
    #[diagnostic(
        code(wavecheck::no_config),
        help(
            "Create one with: wavecheck config init\n\
             Expected at: {path}\n\
             Or pass --controller and --username directly."
        )
    )]
    NoConfig { path: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(wavecheck::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: wavecheck config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(wavecheck::config))]
    Config(Box<figment::Error>),

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(wavecheck::validation))]
    Validation { field: String, reason: String },

    // ── Collection ───────────────────────────────────────────────────
    #[error("Snapshot collection failed: {message}")]
    #[diagnostic(
        code(wavecheck::collection),
        help("Re-run with -v for request-level detail.")
    )]
    Collection { message: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(wavecheck::timeout),
        help("Increase timeout with --timeout or check controller responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Persistence ──────────────────────────────────────────────────
    #[error("Could not write the recommendation history at {path}")]
    #[diagnostic(
        code(wavecheck::history),
        help("Check directory permissions, or re-run with --no-history.")
    )]
    HistoryWrite { path: String, reason: String },

    // ── Confirmation ─────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(wavecheck::confirmation_required),
        help("Use --yes (-y) to confirm in non-interactive contexts.")
    )]
    ConfirmationRequired { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    #[diagnostic(code(wavecheck::json))]
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
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::ConfirmationRequired { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }
            CoreError::AuthenticationFailed { .. } => CliError::AuthFailed {
                profile: "current".into(),
            },
            CoreError::CollectionFailed { message } => CliError::Collection { message },
            CoreError::InvalidConfig { message } => CliError::Validation {
                field: "engine".into(),
                reason: message,
            },
            CoreError::HistoryWriteFailed { path, reason } => {
                CliError::HistoryWrite { path, reason }
            }
            CoreError::Internal(message) => CliError::Collection { message },
        }
    }
}
