use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use crate::error::{AppError, AppResult};

pub const DEFAULT_PORT: u16 = 8888;
pub const DEFAULT_API_URL: &str = "https://api.waifu.pics";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub api_url: String,
    pub user_agent: String,
    pub proxy: Option<String>,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
            connect_timeout_secs: 5,
            idle_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn new() -> AppResult<Self> {
        // Load environment variables
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Build the configuration from the current process environment only.
    pub fn from_env() -> AppResult<Self> {
        let port = match env::var("PORT") {
            Ok(port_str) => port_str.trim().parse().unwrap_or_else(|_| {
                tracing::warn!("Ignoring invalid PORT '{}', using {}", port_str, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };

        let server = ServerConfig {
            port,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
        };

        let defaults = UpstreamConfig::default();

        let api_url = env::var("WAIFU_API_URL").unwrap_or(defaults.api_url);
        let api_url = validate_url("WAIFU_API_URL", &api_url)?
            .trim_end_matches('/')
            .to_string();

        let proxy = match env::var("UPSTREAM_PROXY") {
            Ok(proxy) if !proxy.trim().is_empty() => {
                Some(validate_url("UPSTREAM_PROXY", proxy.trim())?.to_string())
            }
            _ => None,
        };

        let upstream = UpstreamConfig {
            api_url,
            user_agent: env::var("UPSTREAM_USER_AGENT").unwrap_or(defaults.user_agent),
            proxy,
            connect_timeout_secs: parse_secs(
                "UPSTREAM_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
            idle_timeout_secs: parse_secs("UPSTREAM_IDLE_TIMEOUT_SECS", defaults.idle_timeout_secs)?,
        };

        Ok(Config { server, upstream })
    }
}

fn validate_url<'a>(var_name: &str, value: &'a str) -> AppResult<&'a str> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(value),
        Ok(parsed) => Err(AppError::Config(format!(
            "Invalid {} '{}': unsupported scheme '{}'",
            var_name,
            value,
            parsed.scheme()
        ))),
        Err(e) => Err(AppError::Config(format!(
            "Invalid {} '{}': {}",
            var_name, value, e
        ))),
    }
}

fn parse_secs(var_name: &str, default: u64) -> AppResult<u64> {
    match env::var(var_name) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            AppError::Config(format!(
                "Invalid {} '{}': Must be a whole number of seconds",
                var_name, raw
            ))
        }),
        Err(_) => Ok(default),
    }
}
