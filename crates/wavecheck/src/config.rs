//! CLI-owned configuration: TOML profiles, credential resolution, and
//! translation into the transport and engine settings the other crates
//! consume.
//!
//! Core never sees these types -- it receives a pre-built `EngineConfig`
//! and explicit paths for the pattern table and history store.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use wavecheck_api::{ControllerPlatform, TlsMode};
use wavecheck_core::EngineConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── TOML config structs ──────────────────────────────────────────────

/// CLI-owned TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name (used when --profile is not specified).
    pub default_profile: Option<String>,

    /// Named controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,

    /// Engine tunables. Defaults are sensible; override selectively.
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            profiles: HashMap::new(),
            engine: EngineConfig::default(),
        }
    }
}

/// One controller profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Controller base URL (e.g., "https://192.168.1.1:8443").
    pub controller: String,

    /// Site name.
    #[serde(default = "default_site")]
    pub site: String,

    /// Controller platform: "unifi-os" (console, /proxy/network prefix)
    /// or "standalone" (software controller).
    #[serde(default = "default_platform")]
    pub platform: String,

    pub username: Option<String>,

    /// Password in plaintext -- prefer the keyring or WAVECHECK_PASSWORD.
    pub password: Option<String>,

    /// Path to a custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,

    /// Accept self-signed certificates for this profile.
    pub insecure: Option<bool>,

    pub timeout: Option<u64>,
}

fn default_site() -> String {
    "default".into()
}
fn default_platform() -> String {
    "unifi-os".into()
}

// ── Paths ────────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "wavecheck", "wavecheck")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| home_fallback(".config/wavecheck/config.toml"))
}

/// Default location of the recommendation history store.
pub fn history_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("history.json"))
        .unwrap_or_else(|| home_fallback(".local/share/wavecheck/history.json"))
}

/// Default location of the device-pattern table.
pub fn patterns_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join("patterns.toml"))
        .unwrap_or_else(|| home_fallback(".config/wavecheck/patterns.toml"))
}

fn home_fallback(rel: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(rel);
    p
}

// ── Config loading ───────────────────────────────────────────────────

/// Load the full Config from defaults, file, and environment.
pub fn load_config() -> Result<Config, CliError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("WAVECHECK_").split("_"));

    let config: Config = figment.extract()?;
    config.engine.validate()?;
    Ok(config)
}

/// Load config, returning defaults if the file doesn't exist or is
/// unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Profile resolution ───────────────────────────────────────────────

/// Everything needed to open a controller session.
#[derive(Debug)]
pub struct ControllerSettings {
    pub url: url::Url,
    pub site: String,
    pub platform: ControllerPlatform,
    pub username: String,
    pub password: SecretString,
    pub tls: TlsMode,
    pub timeout: Duration,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build `ControllerSettings` from the config file, profile, and CLI
/// overrides. This is the single boundary where CLI config crosses into
/// transport types.
pub fn resolve_controller(global: &GlobalOpts, config: &Config) -> Result<ControllerSettings, CliError> {
    let profile_name = active_profile_name(global, config);
    let profile = config.profiles.get(&profile_name).cloned();

    if profile.is_none() && global.controller.is_none() {
        if config.profiles.is_empty() {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
        let mut available: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
        available.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available.join(", "),
        });
    }

    // 1. Controller URL (flag > env > profile)
    let url_str = global
        .controller
        .clone()
        .or_else(|| profile.as_ref().map(|p| p.controller.clone()))
        .ok_or_else(|| CliError::NoConfig {
            path: config_path().display().to_string(),
        })?;
    let url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "controller".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    // 2. Platform
    let platform = match profile.as_ref().map(|p| p.platform.as_str()) {
        Some("standalone") => ControllerPlatform::Standalone,
        Some("unifi-os") | None => ControllerPlatform::UnifiOs,
        Some(other) => {
            return Err(CliError::Validation {
                field: "platform".into(),
                reason: format!("expected 'unifi-os' or 'standalone', got '{other}'"),
            });
        }
    };

    // 3. Credentials
    let username = global
        .username
        .clone()
        .or_else(|| profile.as_ref().and_then(|p| p.username.clone()))
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.clone(),
        })?;
    let password = resolve_password(profile.as_ref(), &profile_name)?;

    // 4. TLS
    let profile_insecure = profile.as_ref().and_then(|p| p.insecure).unwrap_or(false);
    let tls = if global.insecure || profile_insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ca) = profile.as_ref().and_then(|p| p.ca_cert.clone()) {
        TlsMode::CustomCa(ca)
    } else {
        TlsMode::System
    };

    // 5. Site and timeout (flag > profile > default)
    let site = global
        .site
        .clone()
        .or_else(|| profile.as_ref().map(|p| p.site.clone()))
        .unwrap_or_else(default_site);
    let timeout = profile
        .as_ref()
        .and_then(|p| p.timeout)
        .map_or(Duration::from_secs(global.timeout), Duration::from_secs);

    Ok(ControllerSettings {
        url,
        site,
        platform,
        username,
        password,
        tls,
        timeout,
    })
}

/// Resolve the password from the credential chain:
/// env var > system keyring > plaintext in the profile.
fn resolve_password(profile: Option<&Profile>, profile_name: &str) -> Result<SecretString, CliError> {
    if let Ok(pw) = std::env::var("WAVECHECK_PASSWORD") {
        return Ok(SecretString::from(pw));
    }

    if let Ok(entry) = keyring::Entry::new("wavecheck", &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    if let Some(pw) = profile.and_then(|p| p.password.clone()) {
        return Ok(SecretString::from(pw));
    }

    Err(CliError::NoCredentials {
        profile: profile_name.into(),
    })
}
