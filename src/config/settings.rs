//! Configuration settings structures for schoolhub-link
//!
//! Every section deserialises with defaults so that a partial TOML file (or
//! none at all, for `Settings::default()`) is still a complete configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::{RetryPolicy, TransportOptions};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "schoolhub-link".to_string()
}

fn default_app_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "full".to_string()
}

fn default_true() -> bool {
    true
}

fn default_token_expiration() -> i64 {
    24
}

fn default_client_timeout_ms() -> u64 {
    10_000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_pool_max_idle_per_host() -> usize {
    10
}

fn default_base_delay_ms() -> u64 {
    100
}

fn default_max_delay_ms() -> u64 {
    2_000
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Name and version reported by the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ============================================================================
// Logger Configuration
// ============================================================================

/// Logger settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Level or `EnvFilter` directive, e.g. `info` or `schoolhub_link=debug,info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: "full", "compact" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,

    /// ANSI colours for the text formats
    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            colored: default_true(),
        }
    }
}

// ============================================================================
// JWT Configuration
// ============================================================================

/// JWT authentication configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 signing secret shared by every service of the platform.
    /// Supply it through `SCHOOLHUB_JWT__SECRET` outside development.
    #[serde(default)]
    pub secret: String,

    /// Lifetime of tokens issued by the `token` command, in hours
    #[serde(default = "default_token_expiration")]
    pub token_expiration_hours: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_expiration_hours: default_token_expiration(),
        }
    }
}

// ============================================================================
// Peer Client Configuration
// ============================================================================

/// Retry settings for idempotent peer calls. Zero retries by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default)]
    pub max_retries: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl RetrySettings {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.base_delay_ms),
            Duration::from_millis(self.max_delay_ms),
        )
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Settings shared by every `ServiceClient` and the underlying transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    /// Per-attempt deadline in milliseconds
    #[serde(default = "default_client_timeout_ms")]
    pub timeout_ms: u64,

    /// TCP/TLS connect deadline in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,

    #[serde(default)]
    pub retry: RetrySettings,
}

impl ClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            connect_timeout: self.connect_timeout(),
            pool_max_idle_per_host: self.pool_max_idle_per_host,
            ..Default::default()
        }
    }
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_client_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
            retry: RetrySettings::default(),
        }
    }
}

// ============================================================================
// Main Settings Structure
// ============================================================================

/// Complete application settings
///
/// Loaded by `ConfigLoader` from TOML files and `SCHOOLHUB_*` environment
/// variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logger: LoggerSettings,

    #[serde(default)]
    pub jwt: JwtConfig,

    #[serde(default)]
    pub client: ClientSettings,

    /// Peer services by name, e.g. `courses = "http://courses:4002"`
    #[serde(default)]
    pub peers: BTreeMap<String, String>,
}
