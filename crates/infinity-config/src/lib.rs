//! Profile configuration for Infinity management clients.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to an `infinity_api::ClientBuilder`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use infinity_api::{ClientBuilder, RetryPolicy, TlsMode, TransportConfig};

/// Keyring service all stored secrets live under.
pub const KEYRING_SERVICE: &str = "infinity-sdk";

/// Prefix for environment overrides, e.g. `INFINITY_DEFAULTS__TIMEOUT=10`.
pub const ENV_PREFIX: &str = "INFINITY_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{0}' not found")]
    UnknownProfile(String),

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named Controller profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile by name, falling back to `default_profile`.
    pub fn profile<'a>(&'a self, name: Option<&'a str>) -> Result<(&'a str, &'a Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get(name)
            .map(|p| (name, p))
            .ok_or_else(|| ConfigError::UnknownProfile(name.into()))
    }
}

/// Values a profile inherits unless it sets its own.
#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Per-attempt timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            max_retries: default_max_retries(),
            insecure: false,
            user_agent: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    RetryPolicy::default().max_retries
}

/// How a profile authenticates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Username + password.
    #[default]
    Basic,
    /// `Authorization: Token …`
    Token,
    /// `Authorization: Bearer …`
    Bearer,
    None,
}

/// A named Controller profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Controller root (e.g., "https://mgr.example.com").
    pub base_url: String,

    #[serde(default)]
    pub auth_mode: AuthMode,

    pub username: Option<String>,

    /// Password (plaintext; prefer keyring or `password_env`).
    pub password: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    /// Token for `token`/`bearer` modes (plaintext; prefer keyring).
    pub token: Option<String>,

    /// Environment variable holding the token.
    pub token_env: Option<String>,

    /// Path to a custom CA certificate (PEM).
    pub ca_cert: Option<PathBuf>,

    /// Override `defaults.insecure`.
    pub insecure: Option<bool>,

    /// Override `defaults.timeout`.
    pub timeout: Option<u64>,

    /// Override `defaults.max_retries`.
    pub max_retries: Option<u32>,

    /// Override `defaults.user_agent`.
    pub user_agent: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "infinity-sdk", "infinity-sdk").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("infinity-sdk");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolved credentials for a profile.
#[derive(Debug)]
pub enum Credentials {
    Basic {
        username: String,
        password: SecretString,
    },
    Token(SecretString),
    Bearer(SecretString),
    None,
}

fn keyring_key(profile_name: &str, kind: &str) -> String {
    format!("{profile_name}/{kind}")
}

/// Look up a secret: named env var, then system keyring, then plaintext.
fn resolve_secret(
    env_name: Option<&str>,
    profile_name: &str,
    kind: &str,
    plaintext: Option<&str>,
) -> Option<SecretString> {
    // 1. Env var named by the profile
    if let Some(val) = env_name.and_then(|name| std::env::var(name).ok()) {
        return Some(SecretString::from(val));
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_key(profile_name, kind)) {
        if let Ok(secret) = entry.get_password() {
            return Some(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    plaintext.map(|s| SecretString::from(s.to_owned()))
}

/// Store a profile secret (`password` or `token`) in the system keyring.
pub fn store_secret(profile_name: &str, kind: &str, secret: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &keyring_key(profile_name, kind))?.set_password(secret)?;
    Ok(())
}

/// Resolve the credentials a profile's `auth_mode` calls for.
pub fn resolve_credentials(profile: &Profile, profile_name: &str) -> Result<Credentials, ConfigError> {
    let missing = || ConfigError::NoCredentials {
        profile: profile_name.into(),
    };

    match profile.auth_mode {
        AuthMode::Basic => {
            let username = profile.username.clone().ok_or_else(missing)?;
            let password = resolve_secret(
                profile.password_env.as_deref(),
                profile_name,
                "password",
                profile.password.as_deref(),
            )
            .ok_or_else(missing)?;
            Ok(Credentials::Basic { username, password })
        }
        AuthMode::Token | AuthMode::Bearer => {
            let token = resolve_secret(
                profile.token_env.as_deref(),
                profile_name,
                "token",
                profile.token.as_deref(),
            )
            .ok_or_else(missing)?;
            if profile.auth_mode == AuthMode::Token {
                Ok(Credentials::Token(token))
            } else {
                Ok(Credentials::Bearer(token))
            }
        }
        AuthMode::None => Ok(Credentials::None),
    }
}

// ── Client construction ─────────────────────────────────────────────

/// Build a `ClientBuilder` from a profile, applying `defaults` for
/// anything the profile leaves unset.
pub fn profile_to_builder(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ClientBuilder, ConfigError> {
    let url: url::Url = profile
        .base_url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("invalid URL: {}", profile.base_url),
        })?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };
    let timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    let transport = TransportConfig::default()
        .with_tls(tls)
        .with_timeout(timeout);

    let mut builder = ClientBuilder::default()
        .base_url(url.as_str())
        .transport(transport)
        .max_retries(profile.max_retries.unwrap_or(defaults.max_retries));

    if let Some(ua) = profile.user_agent.as_ref().or(defaults.user_agent.as_ref()) {
        builder = builder.user_agent(ua.clone());
    }

    builder = match resolve_credentials(profile, profile_name)? {
        Credentials::Basic { username, password } => builder.basic_auth(username, password),
        Credentials::Token(token) => builder.token_auth(token),
        Credentials::Bearer(token) => builder.bearer_auth(token),
        Credentials::None => builder,
    };

    Ok(builder)
}
