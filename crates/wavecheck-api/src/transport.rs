// Connection settings for the controller: TLS policy, timeout, and
// the cookie jar session auth depends on.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;

use crate::error::Error;

/// TLS verification policy.
#[derive(Debug, Clone, Default)]
pub enum TlsMode {
    /// Verify against the system certificate store.
    System,
    /// Verify against a private CA bundle (PEM file).
    CustomCa(PathBuf),
    /// Skip certificate verification. Controllers ship self-signed
    /// certs out of the box, so this is the default.
    #[default]
    DangerAcceptInvalid,
}

impl TlsMode {
    fn apply(&self, builder: reqwest::ClientBuilder) -> Result<reqwest::ClientBuilder, Error> {
        match self {
            Self::System => Ok(builder),
            Self::CustomCa(path) => {
                let pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("reading CA bundle {}: {e}", path.display())))?;
                let ca = reqwest::Certificate::from_pem(&pem)
                    .map_err(|e| Error::Tls(format!("parsing CA bundle {}: {e}", path.display())))?;
                Ok(builder.add_root_certificate(ca))
            }
            Self::DangerAcceptInvalid => Ok(builder.danger_accept_invalid_certs(true)),
        }
    }
}

/// Everything needed to construct the underlying `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub cookie_jar: Option<Arc<Jar>>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::default(),
            timeout: Duration::from_secs(30),
            cookie_jar: None,
        }
    }
}

impl TransportConfig {
    /// Attach a fresh cookie jar. Session auth stores its cookie here,
    /// so the client constructor adds one if the caller didn't.
    pub fn with_cookie_jar(mut self) -> Self {
        self.cookie_jar = Some(Arc::new(Jar::default()));
        self
    }

    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("wavecheck/", env!("CARGO_PKG_VERSION")));
        builder = self.tls.apply(builder)?;
        if let Some(jar) = &self.cookie_jar {
            builder = builder.cookie_provider(Arc::clone(jar));
        }
        builder
            .build()
            .map_err(|e| Error::Tls(format!("building HTTP client: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_a_client() {
        let config = TransportConfig::default();
        assert!(matches!(config.tls, TlsMode::DangerAcceptInvalid));
        assert!(config.build_client().is_ok());
    }

    #[test]
    fn with_cookie_jar_attaches_a_jar() {
        let config = TransportConfig::default().with_cookie_jar();
        assert!(config.cookie_jar.is_some());
        assert!(config.build_client().is_ok());
    }

    #[test]
    fn missing_ca_bundle_is_a_tls_error() {
        let config = TransportConfig {
            tls: TlsMode::CustomCa("/nonexistent/ca.pem".into()),
            ..TransportConfig::default()
        };
        let err = config.build_client().unwrap_err();
        assert!(matches!(err, Error::Tls(_)));
    }
}
