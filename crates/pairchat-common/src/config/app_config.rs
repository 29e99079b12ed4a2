//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub gateway: ServerConfig,
    pub cors: CorsConfig,
    pub matchmaking: MatchmakingConfig,
    pub connection: ConnectionConfig,
}

/// General application settings
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(ConfigError::InvalidValue("APP_ENV", other.to_string())),
        }
    }
}

/// Server bind configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// CORS configuration
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    /// Allowed origins; empty means any origin
    pub allowed_origins: Vec<String>,
}

/// Matchmaking configuration
#[derive(Debug, Clone)]
pub struct MatchmakingConfig {
    /// Seconds between stale-state sweeps
    pub sweep_interval_secs: u64,
}

impl MatchmakingConfig {
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Per-connection transport settings
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Milliseconds between server pings
    pub heartbeat_interval_ms: u64,
    /// Milliseconds of silence before a connection is dropped
    pub heartbeat_timeout_ms: u64,
    /// Capacity of each connection's outbound queue
    pub outbound_buffer: usize,
}

impl ConnectionConfig {
    #[must_use]
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    #[must_use]
    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_millis(self.heartbeat_timeout_ms)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_ms: default_heartbeat_interval_ms(),
            heartbeat_timeout_ms: default_heartbeat_timeout_ms(),
            outbound_buffer: default_outbound_buffer(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "pairchat".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_sweep_interval_secs() -> u64 {
    300 // 5 minutes
}

fn default_heartbeat_interval_ms() -> u64 {
    25_000
}

fn default_heartbeat_timeout_ms() -> u64 {
    60_000
}

fn default_outbound_buffer() -> usize {
    100
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: default_app_name(),
                env: Environment::default(),
            },
            gateway: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            cors: CorsConfig::default(),
            matchmaking: MatchmakingConfig {
                sweep_interval_secs: default_sweep_interval_secs(),
            },
            connection: ConnectionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a variable is present but cannot be parsed, or if the
    /// resulting settings are inconsistent
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Missing keys fall back to defaults; present but malformed keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: parse_or(&lookup, "APP_ENV", Environment::default)?,
            },
            gateway: ServerConfig {
                host: lookup("GATEWAY_HOST").unwrap_or_else(default_host),
                port: parse_or(&lookup, "GATEWAY_PORT", default_port)?,
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|origin| !origin.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            matchmaking: MatchmakingConfig {
                sweep_interval_secs: parse_or(
                    &lookup,
                    "SWEEP_INTERVAL_SECS",
                    default_sweep_interval_secs,
                )?,
            },
            connection: ConnectionConfig {
                heartbeat_interval_ms: parse_or(
                    &lookup,
                    "HEARTBEAT_INTERVAL_MS",
                    default_heartbeat_interval_ms,
                )?,
                heartbeat_timeout_ms: parse_or(
                    &lookup,
                    "HEARTBEAT_TIMEOUT_MS",
                    default_heartbeat_timeout_ms,
                )?,
                outbound_buffer: parse_or(&lookup, "OUTBOUND_BUFFER", default_outbound_buffer)?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matchmaking.sweep_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SWEEP_INTERVAL_SECS",
                "must be greater than zero".to_string(),
            ));
        }
        if self.connection.heartbeat_interval_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "HEARTBEAT_INTERVAL_MS",
                "must be greater than zero".to_string(),
            ));
        }
        if self.connection.heartbeat_timeout_ms <= self.connection.heartbeat_interval_ms {
            return Err(ConfigError::InvalidValue(
                "HEARTBEAT_TIMEOUT_MS",
                "must exceed HEARTBEAT_INTERVAL_MS".to_string(),
            ));
        }
        if self.connection.outbound_buffer == 0 {
            return Err(ConfigError::InvalidValue(
                "OUTBOUND_BUFFER",
                "must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_or<T, F, D>(lookup: &F, key: &'static str, default: D) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
    D: FnOnce() -> T,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
