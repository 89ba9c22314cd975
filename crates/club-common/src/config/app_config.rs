//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present).

use std::env;
use std::time::Duration;

use serde::Deserialize;

const MIN_JWT_SECRET_LEN: usize = 32;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    /// Redis is optional; without it the user cache is disabled
    pub redis: Option<RedisConfig>,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
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

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" | "dev" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    /// Apply pending migrations on startup
    #[serde(default)]
    pub run_migrations: bool,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_pool_size")]
    pub pool_size: usize,
    /// TTL for cached user profiles
    #[serde(default = "default_user_cache_ttl")]
    pub user_cache_ttl_secs: u64,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
    #[serde(default = "default_refresh_token_expiry")]
    pub refresh_token_expiry: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Empty means any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

// Default value functions
fn default_app_name() -> String {
    "club-api".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_acquire_timeout() -> u64 {
    5
}

fn default_redis_pool_size() -> usize {
    10
}

fn default_user_cache_ttl() -> u64 {
    300
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_refresh_token_expiry() -> i64 {
    604_800 // 7 days
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// # Errors
    /// Returns an error if required keys are missing or invalid
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &'static str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| var(key).ok_or(ConfigError::MissingVar(key));
        let parsed = |key: &'static str| -> Result<Option<u64>, ConfigError> {
            var(key)
                .map(|v| {
                    v.trim()
                        .parse::<u64>()
                        .map_err(|_| ConfigError::InvalidValue(key, v))
                })
                .transpose()
        };
        let flag = |key: &'static str| {
            var(key).is_some_and(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        };

        let env = match var("APP_ENV") {
            Some(raw) => Environment::parse(&raw).ok_or(ConfigError::InvalidValue("APP_ENV", raw))?,
            None => Environment::default(),
        };
        let log_format = match var("LOG_FORMAT").as_deref().map(str::to_lowercase).as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            Some(other) => return Err(ConfigError::InvalidValue("LOG_FORMAT", other.to_string())),
            None if env.is_production() => LogFormat::Json,
            None => LogFormat::Pretty,
        };

        let secret = required("JWT_SECRET")?;
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::InvalidValue(
                "JWT_SECRET",
                format!("must be at least {MIN_JWT_SECRET_LEN} characters"),
            ));
        }

        let worker_id = parsed("SNOWFLAKE_WORKER_ID")?.unwrap_or(0);
        if worker_id >= 1024 {
            return Err(ConfigError::InvalidValue(
                "SNOWFLAKE_WORKER_ID",
                worker_id.to_string(),
            ));
        }

        let port = match parsed("SERVER_PORT")? {
            Some(port) => u16::try_from(port)
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT", port.to_string()))?,
            None => default_port(),
        };

        let redis = match var("REDIS_URL") {
            Some(url) => Some(RedisConfig {
                url,
                pool_size: parsed("REDIS_POOL_SIZE")?
                    .map_or_else(default_redis_pool_size, |n| n as usize),
                user_cache_ttl_secs: parsed("USER_CACHE_TTL_SECS")?
                    .unwrap_or_else(default_user_cache_ttl),
            }),
            None => None,
        };

        Ok(Self {
            app: AppSettings {
                name: var("APP_NAME").unwrap_or_else(default_app_name),
                env,
                log_format,
            },
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or_else(default_host),
                port,
                request_timeout_secs: parsed("REQUEST_TIMEOUT_SECS")?
                    .unwrap_or_else(default_request_timeout),
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parsed("DATABASE_MAX_CONNECTIONS")?
                    .map_or_else(default_max_connections, |n| n as u32),
                min_connections: parsed("DATABASE_MIN_CONNECTIONS")?
                    .map_or_else(default_min_connections, |n| n as u32),
                acquire_timeout_secs: parsed("DATABASE_ACQUIRE_TIMEOUT_SECS")?
                    .unwrap_or_else(default_acquire_timeout),
                run_migrations: flag("RUN_MIGRATIONS"),
            },
            redis,
            jwt: JwtConfig {
                secret,
                access_token_expiry: parsed("JWT_ACCESS_TOKEN_EXPIRY")?
                    .map_or_else(default_access_token_expiry, |n| n as i64),
                refresh_token_expiry: parsed("JWT_REFRESH_TOKEN_EXPIRY")?
                    .map_or_else(default_refresh_token_expiry, |n| n as i64),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parsed("RATE_LIMIT_PER_SECOND")?
                    .map_or_else(default_requests_per_second, |n| n as u32),
                burst: parsed("RATE_LIMIT_BURST")?.map_or_else(default_burst, |n| n as u32),
            },
            cors: CorsConfig {
                allowed_origins: var("CORS_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|o| !o.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            snowflake: SnowflakeConfig {
                worker_id: worker_id as u16,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
