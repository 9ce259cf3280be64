use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub prediction: PredictionConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            prediction: PredictionConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Cosmetic timings and randomness applied around each estimate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionConfig {
    pub delay: Duration,
    pub jitter: Duration,
    pub save_delay: Duration,
    pub notification_ttl: Duration,
    pub random_seed: Option<u64>,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(2000),
            jitter: Duration::from_millis(1000),
            save_delay: Duration::from_millis(1000),
            notification_ttl: Duration::from_millis(4000),
            random_seed: None,
        }
    }
}

impl PredictionConfig {
    /// Zero delays, for tests and scripted runs.
    pub fn immediate() -> Self {
        Self {
            delay: Duration::ZERO,
            jitter: Duration::ZERO,
            save_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let random_seed = match env::var("APP_RANDOM_SEED") {
            Ok(raw) if !raw.trim().is_empty() => {
                Some(raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidNumber {
                    variable: "APP_RANDOM_SEED",
                    value: raw,
                })?)
            }
            _ => None,
        };

        Ok(Self {
            delay: millis_from_env("APP_PREDICTION_DELAY_MS", defaults.delay)?,
            jitter: millis_from_env("APP_PREDICTION_JITTER_MS", defaults.jitter)?,
            save_delay: millis_from_env("APP_SAVE_DELAY_MS", defaults.save_delay)?,
            notification_ttl: millis_from_env("APP_NOTIFICATION_TTL_MS", defaults.notification_ttl)?,
            random_seed,
        })
    }
}

fn millis_from_env(variable: &'static str, fallback: Duration) -> Result<Duration, ConfigError> {
    match env::var(variable) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidNumber {
                variable,
                value: raw,
            }),
        Err(_) => Ok(fallback),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { variable: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable, value } => {
                write!(f, "{variable} must be a non-negative integer, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
