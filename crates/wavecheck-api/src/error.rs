use thiserror::Error;

/// Top-level error type for the `wavecheck-api` crate.
///
/// Covers authentication, transport, and envelope-level failures.
/// `wavecheck-core` maps these into user-facing diagnostics; callers of
/// this crate never need to inspect reqwest internals.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, account locked, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Session has expired (cookie expired or revoked).
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Controller API ──────────────────────────────────────────────
    /// Error parsed from the `{meta: {rc, msg}}` envelope.
    #[error("Controller API error: {message}")]
    Api { message: String },

    /// The requested endpoint does not exist on this controller
    /// (older firmware, or a feature the platform lacks).
    #[error("Endpoint not available: {path}")]
    EndpointUnavailable { path: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// True when the failure means "this collector is unavailable" rather
    /// than "the whole run is broken" — the engine degrades gracefully
    /// for these.
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::EndpointUnavailable { .. })
    }
}
