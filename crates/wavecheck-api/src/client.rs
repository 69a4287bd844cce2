// Controller HTTP client
//
// Wraps `reqwest::Client` with site-scoped URL construction, envelope
// unwrapping, platform-aware path prefixing, and cookie-session login.
// Endpoint groups (devices, clients, events, stats) are implemented as
// inherent methods in separate files to keep this module focused on
// transport mechanics.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::Envelope;
use crate::transport::TransportConfig;

/// Controller platform flavor.
///
/// UniFi OS consoles proxy the network application under
/// `/proxy/network`; standalone controllers serve `/api` at the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPlatform {
    UnifiOs,
    Standalone,
}

impl ControllerPlatform {
    /// Path prefix applied before `/api/...`.
    pub fn api_prefix(self) -> &'static str {
        match self {
            Self::UnifiOs => "/proxy/network",
            Self::Standalone => "",
        }
    }

    /// Login endpoint for cookie-session auth.
    pub fn login_path(self) -> &'static str {
        match self {
            Self::UnifiOs => "/api/auth/login",
            Self::Standalone => "/api/login",
        }
    }
}

/// Raw HTTP client for the controller's legacy JSON API.
///
/// Handles the `{ data: [], meta: { rc, msg } }` envelope and
/// site-scoped URL construction. All methods return unwrapped `data`
/// payloads — the envelope is stripped before the caller sees it.
pub struct ControllerClient {
    http: reqwest::Client,
    base_url: Url,
    site: String,
    platform: ControllerPlatform,
}

impl ControllerClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth requires cookies).
    pub fn new(
        base_url: Url,
        site: String,
        platform: ControllerPlatform,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            site,
            platform,
        })
    }

    /// Create a client with a pre-built `reqwest::Client` (used in tests).
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        site: String,
        platform: ControllerPlatform,
    ) -> Self {
        Self {
            http,
            base_url,
            site,
            platform,
        }
    }

    /// The current site identifier.
    pub fn site(&self) -> &str {
        &self.site
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Authenticate with the controller using username/password.
    ///
    /// On success the session cookie is stored in the client's cookie jar
    /// and used for all subsequent requests.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self
            .base_url
            .join(self.platform.login_path())
            .map_err(Error::InvalidUrl)?;

        debug!("logging in at {}", url);

        let body = serde_json::json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        debug!("login successful");
        Ok(())
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a site-scoped URL: `{base}{prefix}/api/s/{site}/{path}`
    pub(crate) fn site_url(&self, path: &str) -> Result<Url, Error> {
        let full = format!(
            "{}{}/api/s/{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.platform.api_prefix(),
            self.site,
            path
        );
        Url::parse(&full).map_err(Error::InvalidUrl)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the legacy envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        self.parse_envelope(resp).await
    }

    /// Send a POST request with a JSON body and unwrap the legacy envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<Vec<T>, Error> {
        debug!("POST {}", url);
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        self.parse_envelope(resp).await
    }

    /// Unwrap the `{ meta, data }` envelope, translating controller-level
    /// errors into typed variants.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Vec<T>, Error> {
        let status = resp.status();
        let path = resp.url().path().to_owned();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::EndpointUnavailable { path });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.chars().take(512).collect(),
            })?;

        if envelope.meta.rc != "ok" {
            return Err(Error::Api {
                message: envelope
                    .meta
                    .msg
                    .unwrap_or_else(|| format!("rc={}", envelope.meta.rc)),
            });
        }

        Ok(envelope.data)
    }
}
