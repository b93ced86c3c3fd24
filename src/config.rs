//! Configuration management for the gateway.
//!
//! Configuration comes from two layers:
//! - Command-line arguments via clap (with `DOUK_`-prefixed environment
//!   variables), covering deployment concerns: bind address, CORS, logging.
//! - The settings document (`settings.json`), a flat JSON object holding the
//!   operational parameters clients may read and update at runtime through
//!   the `/settings` routes: API token, platform cookies, proxy, timeouts.
//!
//! CLI host/port, when given, override the settings document's values.
//!
//! # Environment Variables
//!
//! - `DOUK_HOST` - Server bind address override
//! - `DOUK_PORT` - Server port override
//! - `DOUK_SETTINGS` - Path to the settings document (default: settings.json)
//! - `DOUK_TOKEN` - API token override (never written to the document)
//! - `DOUK_CORS_ORIGINS` - Allowed CORS origins (comma-separated)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::SettingsError;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 5555;

/// Default settings document path.
pub const DEFAULT_SETTINGS_PATH: &str = "settings.json";

/// Default upstream request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default retry budget for upstream requests.
pub const DEFAULT_MAX_RETRY: u32 = 5;

// =============================================================================
// CLI Arguments
// =============================================================================

/// DouK Gateway - HTTP front end for douyin/tiktok content extraction.
///
/// Exposes the extraction engine's operations as a token-guarded JSON API
/// with a uniform response envelope.
#[derive(Parser, Debug, Clone)]
#[command(name = "douk-gateway")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to (overrides the settings document).
    #[arg(long, env = "DOUK_HOST")]
    pub host: Option<String>,

    /// Port to listen on (overrides the settings document).
    #[arg(short, long, env = "DOUK_PORT")]
    pub port: Option<u16>,

    /// Path to the settings document.
    ///
    /// Created with defaults on first start if missing.
    #[arg(long, default_value = DEFAULT_SETTINGS_PATH, env = "DOUK_SETTINGS")]
    pub settings: PathBuf,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// API token override.
    ///
    /// When set, takes precedence over the token in the settings document and
    /// is never persisted to it.
    #[arg(long, env = "DOUK_TOKEN")]
    pub token: Option<String>,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "DOUK_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(host) = &self.host {
            if host.is_empty() {
                return Err("host must not be empty".to_string());
            }
        }
        if self.port == Some(0) {
            return Err("port must be greater than 0".to_string());
        }
        if self.settings.as_os_str().is_empty() {
            return Err("settings path must not be empty. Set --settings or DOUK_SETTINGS".to_string());
        }
        Ok(())
    }

    /// Get the server bind address as "host:port", falling back to the
    /// settings document for anything the CLI does not override.
    pub fn bind_address(&self, settings: &Settings) -> String {
        let host = self.host.as_deref().unwrap_or(&settings.host);
        let port = self.port.unwrap_or(settings.port);
        format!("{host}:{port}")
    }
}

// =============================================================================
// Settings Document
// =============================================================================

/// The runtime settings document.
///
/// Every field carries a default so a partial or missing document always
/// deserializes; unknown fields are ignored. The `proxy` field uses the empty
/// string for "no proxy" so partial updates stay a plain field merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// API token required by the auth gate; empty disables the gate.
    pub token: String,

    /// Server bind host.
    pub host: String,

    /// Server bind port.
    pub port: u16,

    /// Default douyin cookie sent to the platform.
    pub cookie: String,

    /// Default tiktok cookie sent to the platform.
    pub cookie_tiktok: String,

    /// Proxy address for upstream requests; empty means direct.
    pub proxy: String,

    /// Retry budget for upstream requests.
    pub max_retry: u32,

    /// Upstream request timeout in seconds.
    pub timeout: u64,

    /// Response language hint forwarded to the platforms.
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            token: String::new(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cookie: String::new(),
            cookie_tiktok: String::new(),
            proxy: String::new(),
            max_retry: DEFAULT_MAX_RETRY,
            timeout: DEFAULT_TIMEOUT_SECS,
            language: "zh_CN".to_string(),
        }
    }
}

/// A partial settings update: only the fields present are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    pub token: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cookie: Option<String>,
    pub cookie_tiktok: Option<String>,
    pub proxy: Option<String>,
    pub max_retry: Option<u32>,
    pub timeout: Option<u64>,
    pub language: Option<String>,
}

impl Settings {
    /// Merge a partial update into this document.
    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(token) = update.token {
            self.token = token;
        }
        if let Some(host) = update.host {
            self.host = host;
        }
        if let Some(port) = update.port {
            self.port = port;
        }
        if let Some(cookie) = update.cookie {
            self.cookie = cookie;
        }
        if let Some(cookie_tiktok) = update.cookie_tiktok {
            self.cookie_tiktok = cookie_tiktok;
        }
        if let Some(proxy) = update.proxy {
            self.proxy = proxy;
        }
        if let Some(max_retry) = update.max_retry {
            self.max_retry = max_retry;
        }
        if let Some(timeout) = update.timeout {
            self.timeout = timeout;
        }
        if let Some(language) = update.language {
            self.language = language;
        }
    }
}

// =============================================================================
// Settings Store
// =============================================================================

/// Shared access to the settings document, backing the `/settings` routes.
///
/// Reads take the current in-memory document; updates merge, persist to disk,
/// and replace it. Concurrent updates are last-write-wins.
pub struct SettingsStore {
    path: Option<PathBuf>,
    inner: RwLock<Settings>,
}

impl SettingsStore {
    /// Load the document from disk, creating it with defaults if missing.
    pub fn load(path: &Path) -> Result<Arc<Self>, SettingsError> {
        let settings = match std::fs::read_to_string(path) {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|source| SettingsError::Invalid {
                    path: path.display().to_string(),
                    source,
                })?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "settings document missing, creating defaults");
                let settings = Settings::default();
                persist(path, &settings)?;
                settings
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        Ok(Arc::new(Self {
            path: Some(path.to_path_buf()),
            inner: RwLock::new(settings),
        }))
    }

    /// An in-memory store that never touches disk.
    pub fn ephemeral(settings: Settings) -> Arc<Self> {
        Arc::new(Self {
            path: None,
            inner: RwLock::new(settings),
        })
    }

    /// Snapshot the current document.
    pub async fn snapshot(&self) -> Settings {
        self.inner.read().await.clone()
    }

    /// The current API token.
    pub async fn token(&self) -> String {
        self.inner.read().await.token.clone()
    }

    /// Merge a partial update, persist, and return the full document.
    pub async fn update(&self, update: SettingsUpdate) -> Result<Settings, SettingsError> {
        let mut guard = self.inner.write().await;
        guard.apply(update);
        if let Some(path) = &self.path {
            persist(path, &guard)?;
        }
        Ok(guard.clone())
    }
}

fn persist(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    let contents =
        serde_json::to_string_pretty(settings).map_err(|source| SettingsError::Invalid {
            path: path.display().to_string(),
            source,
        })?;
    std::fs::write(path, contents).map_err(|source| SettingsError::Io {
        path: path.display().to_string(),
        source,
    })
}

// =============================================================================
// Tests
// =============================================================================
