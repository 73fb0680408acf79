//! Service configuration.
//!
//! Configuration is an explicit [`AppConfig`] value built once at startup and
//! handed to the server, never read from the environment inside a handler.
//! It is layered, each layer overriding the one before it:
//!
//! ```text
//! 1. stock defaults     AppConfig::default()
//! 2. config file        --config gallery.toml   (optional, sparse)
//! 3. environment        NEXT_PUBLIC_URL, FARCASTER_*, PORT, ...
//! ```
//!
//! Layers 2 and 3 are both expressed as `toml::Value` tables and folded onto
//! the defaults with [`merge_toml`], so a file or the environment only needs
//! to name the keys it wants to change.
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//!
//! [manifest]
//! public_url = "http://localhost:3000"
//! name = "GIF Gallery"
//! splash_background_color = "#000000"
//!
//! [storage]
//! file = "gallery.json"
//! # url = "https://example.com/gifs.json"
//!
//! [readiness]
//! delay_ms = 100
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! ## Environment Variables
//!
//! | Variable | Key |
//! |----------|-----|
//! | `NEXT_PUBLIC_URL` | `manifest.public_url` |
//! | `FARCASTER_HEADER` | `manifest.header` |
//! | `FARCASTER_PAYLOAD` | `manifest.payload` |
//! | `FARCASTER_SIGNATURE` | `manifest.signature` |
//! | `HOST` | `server.host` |
//! | `PORT` | `server.port` |
//! | `GALLERY_STORAGE_FILE` | `storage.file` |
//! | `GALLERY_STORAGE_URL` | `storage.url` |
//! | `READINESS_DELAY_MS` | `readiness.delay_ms` |
//!
//! A variable that is set but empty counts as unset.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";
pub const DEFAULT_APP_NAME: &str = "GIF Gallery";
pub const DEFAULT_SPLASH_BACKGROUND_COLOR: &str = "#000000";

/// Account association credentials used when none are configured.
///
/// These sign for `localhost:3000` with a zero custody key; they are enough
/// for the manifest to validate structurally during local development.
pub const DEFAULT_FARCASTER_HEADER: &str = "eyJmaWQiOjEsInR5cGUiOiJjdXN0b2R5Iiwia2V5IjoiMHgwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwIn0";
pub const DEFAULT_FARCASTER_PAYLOAD: &str = "eyJkb21haW4iOiJsb2NhbGhvc3Q6MzAwMCJ9";
pub const DEFAULT_FARCASTER_SIGNATURE: &str = "MHgwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMA";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid value for {var}: {message}")]
    Env { var: &'static str, message: String },
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete service configuration.
///
/// All fields have defaults. A config file need only specify the values it
/// wants to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Listen address.
    pub server: ServerConfig,
    /// Values published in the mini-app manifest.
    pub manifest: ManifestConfig,
    /// Where gallery items are listed from.
    pub storage: StorageConfig,
    /// Readiness stub timing.
    pub readiness: ReadinessConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port must be non-zero".into(),
            ));
        }
        // The manifest is served whatever the base looks like.
        if !is_http_url(&self.manifest.public_url) {
            tracing::warn!(
                "manifest.public_url {:?} has no http(s) scheme, derived URLs will be relative",
                self.manifest.public_url
            );
        }
        if let Some(url) = &self.storage.url {
            if !is_http_url(url) {
                return Err(ConfigError::Validation(format!(
                    "storage.url must be an http(s) URL, got {url:?}"
                )));
            }
        }
        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// `host:port` as accepted by `TcpListener::bind`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Manifest inputs: the public base URL, display values, and the three
/// account association credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    /// Base URL the app is served from. Icon, home, and splash URLs are
    /// derived from it.
    pub public_url: String,
    pub name: String,
    pub splash_background_color: String,
    pub header: String,
    pub payload: String,
    pub signature: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            public_url: DEFAULT_PUBLIC_URL.to_string(),
            name: DEFAULT_APP_NAME.to_string(),
            splash_background_color: DEFAULT_SPLASH_BACKGROUND_COLOR.to_string(),
            header: DEFAULT_FARCASTER_HEADER.to_string(),
            payload: DEFAULT_FARCASTER_PAYLOAD.to_string(),
            signature: DEFAULT_FARCASTER_SIGNATURE.to_string(),
        }
    }
}

/// Storage backend selection. `url` takes precedence over `file`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// JSON file holding an array of gallery items.
    pub file: PathBuf,
    /// Remote endpoint returning a JSON array of gallery items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("gallery.json"),
            url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReadinessConfig {
    /// Milliseconds between mount and the disabled-integration transition.
    pub delay_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self { delay_ms: 100 }
    }
}

impl ReadinessConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that file and environment overrides merge onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AppConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
///
/// The path was named explicitly, so a missing file is an error.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

#[derive(Debug, Clone, Copy)]
enum EnvKind {
    Str,
    Int,
}

/// Environment variable → `(section, key)` mapping for the env layer.
const ENV_VARS: &[(&str, &str, &str, EnvKind)] = &[
    ("NEXT_PUBLIC_URL", "manifest", "public_url", EnvKind::Str),
    ("FARCASTER_HEADER", "manifest", "header", EnvKind::Str),
    ("FARCASTER_PAYLOAD", "manifest", "payload", EnvKind::Str),
    ("FARCASTER_SIGNATURE", "manifest", "signature", EnvKind::Str),
    ("HOST", "server", "host", EnvKind::Str),
    ("PORT", "server", "port", EnvKind::Int),
    ("GALLERY_STORAGE_FILE", "storage", "file", EnvKind::Str),
    ("GALLERY_STORAGE_URL", "storage", "url", EnvKind::Str),
    ("READINESS_DELAY_MS", "readiness", "delay_ms", EnvKind::Int),
];

/// Build the environment layer from a variable lookup.
///
/// Returns `Ok(None)` when no mapped variable is set to a non-empty value.
/// Taking the lookup as a closure keeps tests away from process-global
/// environment state.
pub fn env_overlay<F>(lookup: F) -> Result<Option<toml::Value>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut root = toml::map::Map::new();
    for &(var, section, key, kind) in ENV_VARS {
        let Some(raw) = lookup(var).filter(|v| !v.trim().is_empty()) else {
            continue;
        };
        let value = match kind {
            EnvKind::Str => toml::Value::String(raw),
            EnvKind::Int => {
                let n = raw.trim().parse::<i64>().map_err(|e| ConfigError::Env {
                    var,
                    message: e.to_string(),
                })?;
                toml::Value::Integer(n)
            }
        };
        tracing::debug!("{var} set, overriding {section}.{key}");
        let table = root
            .entry(section)
            .or_insert(toml::Value::Table(toml::map::Map::new()));
        if let toml::Value::Table(table) = table {
            table.insert(key.to_string(), value);
        }
    }
    if root.is_empty() {
        Ok(None)
    } else {
        Ok(Some(toml::Value::Table(root)))
    }
}

/// Merge optional overlays onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = Option<toml::Value>>,
) -> Result<AppConfig, ConfigError> {
    let merged = overlays
        .into_iter()
        .flatten()
        .fold(base, merge_toml);
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config: defaults, then `file` (if given), then the
/// variables visible through `lookup`.
pub fn load_config_with<F>(file: Option<&Path>, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let file_layer = file.map(load_raw_config).transpose()?;
    let env_layer = env_overlay(lookup)?;
    resolve_config(stock_defaults_value(), [file_layer, env_layer])
}

/// Load the effective config from an optional file and the process
/// environment.
pub fn load_config(file: Option<&Path>) -> Result<AppConfig, ConfigError> {
    load_config_with(file, |var| std::env::var(var).ok())
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# GIF Gallery Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Environment variables override this file:
#   NEXT_PUBLIC_URL, FARCASTER_HEADER, FARCASTER_PAYLOAD, FARCASTER_SIGNATURE,
#   HOST, PORT, GALLERY_STORAGE_FILE, GALLERY_STORAGE_URL, READINESS_DELAY_MS
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# HTTP server
# ---------------------------------------------------------------------------
[server]
host = "0.0.0.0"
port = 3000

# ---------------------------------------------------------------------------
# Mini-app manifest (/.well-known/farcaster.json)
# ---------------------------------------------------------------------------
[manifest]
# Public base URL. iconUrl, homeUrl and splashImageUrl are derived from it.
public_url = "http://localhost:3000"
name = "GIF Gallery"
splash_background_color = "#000000"

# Account association. The defaults only suit local development; generate
# real values with the Farcaster manifest tool for your domain.
header = "eyJmaWQiOjEsInR5cGUiOiJjdXN0b2R5Iiwia2V5IjoiMHgwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwIn0"
payload = "eyJkb21haW4iOiJsb2NhbGhvc3Q6MzAwMCJ9"
signature = "MHgwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMDAwMA"

# ---------------------------------------------------------------------------
# Gallery storage (/api/gallery/storage)
# ---------------------------------------------------------------------------
[storage]
# JSON file containing an array of gallery items. Missing file = empty gallery.
file = "gallery.json"

# Remote endpoint returning a JSON array. Takes precedence over `file`.
# url = "https://example.com/gifs.json"

# ---------------------------------------------------------------------------
# Readiness
# ---------------------------------------------------------------------------
[readiness]
# Delay before the SDK readiness stub reports ready (integration disabled).
delay_ms = 100
"##
}
