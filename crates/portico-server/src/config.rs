//! Configuration for the portal server.
//!
//! The config file is TOML. Its location is resolved in this order:
//!
//! 1. an explicit path (`--config`)
//! 2. the `PORTICO_CONFIG` environment variable
//! 3. `<config dir>/portico/config.toml`
//!
//! A missing file is not an error; defaults are used. Selected settings can
//! be overridden from the environment after the file is loaded.

use std::path::PathBuf;
use std::time::Duration;

use portico_auth::guard::{DEFAULT_LOGIN_PATH, DEFAULT_PUBLIC_ROUTES};
use portico_auth::portal::portal_segment;
use portico_auth::{GuardConfig, PortalMap, RouteGuard, TokenCodec, DEFAULT_COOKIE_NAME};
use portico_rbac::PermissionMatrix;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::directory::{DirectoryUser, UserDirectory};
use crate::{Error, Result};

/// Environment variable overrides applied on load.
pub const ENV_HOST: &str = "PORTICO_HOST";
/// Overrides `server.port`.
pub const ENV_PORT: &str = "PORTICO_PORT";
/// Overrides `guard.enabled`.
pub const ENV_GUARD_ENABLED: &str = "PORTICO_GUARD_ENABLED";
/// Overrides `session.cookie_name`.
pub const ENV_COOKIE_NAME: &str = "PORTICO_COOKIE_NAME";
/// Overrides `session.ttl_secs`.
pub const ENV_SESSION_TTL_SECS: &str = "PORTICO_SESSION_TTL_SECS";

// ============================================================================
// ConfigManager
// ============================================================================

/// A TOML-backed configuration type with a well-known location.
pub trait ConfigManager: Default + Serialize + DeserializeOwned {
    /// Project name; names the config directory and env prefix.
    fn project_name() -> &'static str;

    /// Environment variable naming an explicit config file.
    fn config_env_var() -> String {
        format!("{}_CONFIG", Self::project_name().to_uppercase())
    }

    /// Platform default config file path.
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::project_name()).join("config.toml"))
    }

    /// Resolve the config file path from the process environment.
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        Self::resolve_config_path_with(explicit, &|key: &str| std::env::var(key).ok())
    }

    /// Resolve the config file path using `lookup` for environment access.
    fn resolve_config_path_with(
        explicit: Option<&str>,
        lookup: &dyn Fn(&str) -> Option<String>,
    ) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }
        if let Some(path) = lookup(&Self::config_env_var()).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(path));
        }
        Self::default_config_path()
    }

    /// Load from the resolved path, then apply environment overrides.
    fn load(explicit: Option<&str>) -> Result<Self> {
        Self::load_with(explicit, &|key: &str| std::env::var(key).ok())
    }

    /// [`ConfigManager::load`] with an injectable environment.
    fn load_with(explicit: Option<&str>, lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match Self::resolve_config_path_with(explicit, lookup) {
            Some(path) if path.exists() => {
                let content =
                    std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
                log::debug!("Loading config from {}", path.display());
                toml::from_str(&content).map_err(|e| {
                    Error::config(format!("Failed to parse {}: {e}", path.display()))
                })?
            }
            Some(path) => {
                log::debug!("No config at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Apply environment overrides. The default does nothing.
    fn apply_env(&mut self, _lookup: &dyn Fn(&str) -> Option<String>) -> Result<()> {
        Ok(())
    }

    /// Serialize as pretty TOML.
    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Environment variables equivalent to this config's overridable settings.
    fn to_env_vars(&self) -> Result<Vec<(String, String)>>;

    /// Semantic checks run before an edited file is saved.
    fn check(&self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// PorticoConfig
// ============================================================================

/// `[server]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// `[session]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the session cookie.
    pub cookie_name: String,
    /// Session lifetime in seconds.
    pub ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            ttl_secs: portico_auth::token::DEFAULT_SESSION_TTL.as_secs(),
        }
    }
}

/// `[guard]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardSettings {
    /// When false every request passes through unchecked.
    pub enabled: bool,
    /// Where unauthenticated users are sent.
    pub login_path: String,
    /// Path prefixes reachable without a session.
    pub public_routes: Vec<String>,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            public_routes: DEFAULT_PUBLIC_ROUTES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Top-level Portico configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PorticoConfig {
    /// Display name of this deployment.
    pub project_name: String,
    /// HTTP listener.
    pub server: ServerConfig,
    /// Session cookie and token lifetime.
    pub session: SessionConfig,
    /// Route guard.
    pub guard: GuardSettings,
    /// Demo user directory.
    pub users: Vec<DirectoryUser>,
    /// Replacement permission matrix; the built-in one when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionMatrix>,
    /// Replacement portal layout; the built-in one when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portals: Option<PortalMap>,
}

impl Default for PorticoConfig {
    fn default() -> Self {
        Self {
            project_name: "portico".to_string(),
            server: ServerConfig::default(),
            session: SessionConfig::default(),
            guard: GuardSettings::default(),
            users: DirectoryUser::demo_users(),
            permissions: None,
            portals: None,
        }
    }
}

impl ConfigManager for PorticoConfig {
    fn project_name() -> &'static str {
        "portico"
    }

    fn check(&self) -> Result<()> {
        self.validate()
    }

    fn apply_env(&mut self, lookup: &dyn Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("{ENV_PORT} is not a valid port: '{port}'")))?;
        }
        if let Some(enabled) = lookup(ENV_GUARD_ENABLED) {
            self.guard.enabled = parse_bool(&enabled).ok_or_else(|| {
                Error::config(format!("{ENV_GUARD_ENABLED} must be true or false, got '{enabled}'"))
            })?;
        }
        if let Some(name) = lookup(ENV_COOKIE_NAME) {
            self.session.cookie_name = name;
        }
        if let Some(ttl) = lookup(ENV_SESSION_TTL_SECS) {
            self.session.ttl_secs = ttl.trim().parse().map_err(|_| {
                Error::config(format!("{ENV_SESSION_TTL_SECS} is not a number: '{ttl}'"))
            })?;
        }
        Ok(())
    }

    fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        Ok(vec![
            (ENV_HOST.to_string(), self.server.host.clone()),
            (ENV_PORT.to_string(), self.server.port.to_string()),
            (ENV_GUARD_ENABLED.to_string(), self.guard.enabled.to_string()),
            (ENV_COOKIE_NAME.to_string(), self.session.cookie_name.clone()),
            (ENV_SESSION_TTL_SECS.to_string(), self.session.ttl_secs.to_string()),
        ])
    }
}

impl PorticoConfig {
    /// Check settings that would otherwise fail at request time.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::config("server.port must be non-zero"));
        }
        let name = &self.session.cookie_name;
        if name.is_empty()
            || name
                .chars()
                .any(|c| c.is_whitespace() || c == ';' || c == '=' || c == ',')
        {
            return Err(Error::config(format!(
                "session.cookie_name '{name}' is not a valid cookie name"
            )));
        }
        if self.session.ttl_secs == 0 {
            return Err(Error::config("session.ttl_secs must be non-zero"));
        }
        if !self.guard.login_path.starts_with('/') {
            return Err(Error::config("guard.login_path must start with '/'"));
        }
        if let Some(route) = self.guard.public_routes.iter().find(|r| !r.starts_with('/')) {
            return Err(Error::config(format!(
                "guard.public_routes entry '{route}' must start with '/'"
            )));
        }
        // Public prefixes skip the session check, so none may cover the
        // whole site or any portal.
        let portals = self.portal_map();
        let segments = portals.segments();
        let public = std::iter::once(("guard.login_path", &self.guard.login_path)).chain(
            self.guard
                .public_routes
                .iter()
                .map(|route| ("guard.public_routes", route)),
        );
        for (key, route) in public {
            match portal_segment(route) {
                None => {
                    return Err(Error::config(format!(
                        "{key} entry '{route}' would make every route public"
                    )));
                }
                Some(segment) if segments.contains(segment) => {
                    return Err(Error::config(format!(
                        "{key} entry '{route}' would expose the '{segment}' portal"
                    )));
                }
                Some(_) => {}
            }
        }
        let dupes = self.directory().duplicate_emails();
        if !dupes.is_empty() {
            return Err(Error::config(format!(
                "duplicate user emails: {}",
                dupes.join(", ")
            )));
        }
        portals.validate()?;
        Ok(())
    }

    /// `host:port` to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Middleware settings.
    pub fn guard_config(&self) -> GuardConfig {
        GuardConfig {
            enabled: self.guard.enabled,
            cookie_name: self.session.cookie_name.clone(),
        }
    }

    /// The configured permission matrix, or the built-in one.
    pub fn matrix(&self) -> PermissionMatrix {
        self.permissions.clone().unwrap_or_else(PermissionMatrix::standard)
    }

    /// The configured portal layout, or the built-in one.
    pub fn portal_map(&self) -> PortalMap {
        self.portals.clone().unwrap_or_else(PortalMap::standard)
    }

    /// Route guard built from the portal layout and `[guard]`.
    pub fn route_guard(&self) -> RouteGuard {
        RouteGuard::new(self.portal_map())
            .with_public_routes(self.guard.public_routes.iter().cloned())
            .with_login_path(self.guard.login_path.clone())
    }

    /// Token codec using `session.ttl_secs`.
    pub fn token_codec(&self) -> TokenCodec {
        TokenCodec::new(Duration::from_secs(self.session.ttl_secs))
    }

    /// User directory from `[[users]]`.
    pub fn directory(&self) -> UserDirectory {
        UserDirectory::new(self.users.clone())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
