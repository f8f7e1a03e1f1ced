use crate::scoring::{RiskConfig, RiskConfigError, ScoreOverrides};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

pub const RISK_CONFIG_PATH_VAR: &str = "RISK_CONFIG_PATH";
pub const REJECT_AT_VAR: &str = "REJECT_AT";
pub const REVIEW_AT_VAR: &str = "REVIEW_AT";

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

/// Top-level configuration for the scoring binaries.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub risk: RiskConfig,
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
        let log_format = LogFormat::from_str(
            &env::var("APP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        );

        let risk_path = env::var_os(RISK_CONFIG_PATH_VAR).map(PathBuf::from);
        let risk = load_risk_config(risk_path.as_deref())?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            risk,
        })
    }
}

/// Builds the scoring configuration: compiled-in defaults or a JSON file,
/// then the `REJECT_AT` / `REVIEW_AT` overrides, then validation.
pub fn load_risk_config(path: Option<&Path>) -> Result<RiskConfig, ConfigError> {
    let base = match path {
        Some(path) => {
            let file = std::fs::File::open(path).map_err(|source| ConfigError::RiskFile {
                path: path.to_path_buf(),
                source,
            })?;
            RiskConfig::from_json_reader(std::io::BufReader::new(file))?
        }
        None => RiskConfig::default(),
    };

    let risk = base.with_overrides(score_overrides_from_env());
    risk.validate()?;
    Ok(risk)
}

pub fn score_overrides_from_env() -> ScoreOverrides {
    let reject_at = env::var(REJECT_AT_VAR).ok();
    let review_at = env::var(REVIEW_AT_VAR).ok();
    ScoreOverrides::parse(reject_at.as_deref(), review_at.as_deref())
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

/// Output shape of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Compact,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    RiskFile {
        path: PathBuf,
        source: std::io::Error,
    },
    Risk(RiskConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::RiskFile { path, .. } => {
                write!(f, "unable to read risk configuration {}", path.display())
            }
            ConfigError::Risk(err) => write!(f, "invalid risk configuration: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::RiskFile { source, .. } => Some(source),
            ConfigError::Risk(err) => Some(err),
        }
    }
}

impl From<RiskConfigError> for ConfigError {
    fn from(value: RiskConfigError) -> Self {
        Self::Risk(value)
    }
}
