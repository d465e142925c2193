use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use tracing::info;
use validator::Validate;

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";

/// Application configuration with validation.
///
/// Values are layered: `config/default.toml`, then
/// `config/{environment}.toml`, then `APP__*` environment variables
/// (double-underscore separated), each layer overriding the previous one.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// Database connection URL (postgres or sqlite)
    #[validate(length(min = 1))]
    pub database_url: String,

    /// Maximum number of pooled database connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// Minimum number of pooled database connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// Connection establishment timeout in seconds
    #[serde(default = "default_db_timeout")]
    pub db_connect_timeout_secs: u64,

    /// Pool acquire timeout in seconds
    #[serde(default = "default_db_timeout")]
    pub db_acquire_timeout_secs: u64,

    /// Idle connection timeout in seconds
    #[serde(default = "default_db_idle_timeout")]
    pub db_idle_timeout_secs: u64,

    /// Run migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,

    /// Deployment environment name
    #[serde(default = "default_environment")]
    pub environment: String,

    /// Log filter directive (tracing EnvFilter syntax)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Buffer size for the in-process event channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer_size: usize,
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_db_min_connections() -> u32 {
    1
}

fn default_db_timeout() -> u64 {
    30
}

fn default_db_idle_timeout() -> u64 {
    600
}

fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_event_buffer() -> usize {
    100
}

impl AppConfig {
    /// Minimal constructor used by tests and tools.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            db_connect_timeout_secs: default_db_timeout(),
            db_acquire_timeout_secs: default_db_timeout(),
            db_idle_timeout_secs: default_db_idle_timeout(),
            auto_migrate: false,
            environment: "test".to_string(),
            log_level: default_log_level(),
            event_buffer_size: default_event_buffer(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Loads configuration from files and the environment.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let environment = env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_ENV.to_string());

    let config = Config::builder()
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, environment)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config
        .validate()
        .map_err(|e| ConfigError::Message(format!("Invalid configuration: {}", e)))?;

    info!(environment = %app_config.environment, "configuration loaded");
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_applies_defaults() {
        let cfg = AppConfig::new("sqlite::memory:");
        assert_eq!(cfg.db_max_connections, 10);
        assert_eq!(cfg.log_level, "info");
        assert!(!cfg.is_production());
    }
}
