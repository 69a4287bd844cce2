// ── Core error types ──
//
// User-facing errors from wavecheck-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<wavecheck_api::Error>` impl translates transport-layer
// errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Collection errors ────────────────────────────────────────────
    #[error("Cannot connect to controller at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Snapshot collection failed: {message}")]
    CollectionFailed { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Invalid engine configuration: {message}")]
    InvalidConfig { message: String },

    // ── Persistence errors ───────────────────────────────────────────
    #[error("Failed to persist recommendation history at {path}: {reason}")]
    HistoryWriteFailed { path: String, reason: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<wavecheck_api::Error> for CoreError {
    fn from(err: wavecheck_api::Error) -> Self {
        match err {
            wavecheck_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            wavecheck_api::Error::SessionExpired => CoreError::AuthenticationFailed {
                message: "Session expired -- re-authentication required".into(),
            },
            wavecheck_api::Error::Transport(ref e) => {
                if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::CollectionFailed {
                        message: e.to_string(),
                    }
                }
            }
            wavecheck_api::Error::InvalidUrl(e) => CoreError::InvalidConfig {
                message: format!("Invalid URL: {e}"),
            },
            wavecheck_api::Error::Timeout { timeout_secs } => CoreError::CollectionFailed {
                message: format!("request timed out after {timeout_secs}s"),
            },
            wavecheck_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            wavecheck_api::Error::Api { message } => CoreError::CollectionFailed { message },
            wavecheck_api::Error::EndpointUnavailable { path } => CoreError::CollectionFailed {
                message: format!("endpoint not available: {path}"),
            },
            wavecheck_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
