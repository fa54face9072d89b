use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{Error, Result};

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "text")]
    Text,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Json
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub telegram: TelegramConfig,
    pub routing: RoutingConfig,
    pub links: LinkConfig,
    #[serde(default)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub addr: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub api_url: String,
    pub timeout: Duration,
    /// Keep titles bold and descriptions literal when they contain Markdown markup.
    pub escape_markdown: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    pub default_receivers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    pub grafana_url: String,
    pub alertmanager_url: String,
    pub prometheus_url: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        let _ = dotenvy::dotenv();

        let config = Config {
            server: ServerConfig {
                addr: normalize_listen_addr(&env_or("LISTEN_ADDR", "0.0.0.0:8080")),
                request_timeout: Duration::from_secs(env_parse("REQUEST_TIMEOUT_SECS", 30)?),
            },
            telegram: TelegramConfig {
                bot_token: env_or("TELEGRAM_BOT_TOKEN", ""),
                api_url: env_or("TELEGRAM_API_URL", DEFAULT_TELEGRAM_API_URL),
                timeout: Duration::from_secs(env_parse("TELEGRAM_TIMEOUT_SECS", 10)?),
                escape_markdown: env_parse("ESCAPE_MARKDOWN", true)?,
            },
            routing: RoutingConfig {
                default_receivers: parse_receiver_list(
                    &std::env::var("DEFAULT_RECEIVERS")
                        .or_else(|_| std::env::var("DEFAULT_RECEPIENTS"))
                        .unwrap_or_default(),
                ),
            },
            links: LinkConfig {
                grafana_url: env_or("GRAFANA_BASE_URL", ""),
                alertmanager_url: env_or("AM_BASE_URL", ""),
                prometheus_url: env_or("PROM_BASE_URL", ""),
            },
            log_format: match env_or("LOG_FORMAT", "json").to_lowercase().as_str() {
                "text" => LogFormat::Text,
                _ => LogFormat::Json,
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Logs settings that load fine but will likely drop alerts.
    pub fn warn_incomplete(&self) {
        if self.telegram.bot_token.is_empty() {
            tracing::warn!("TELEGRAM_BOT_TOKEN is not set. Deliveries will be rejected by the API.");
        }
        if self.routing.default_receivers.is_empty() {
            tracing::warn!("DEFAULT_RECEIVERS is empty. Only alerts with receiver annotations will be delivered.");
        }
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.telegram.api_url).map_err(|e| {
            Error::Config(format!("TELEGRAM_API_URL is not a valid URL ({}): {}", self.telegram.api_url, e))
        })?;

        if self.telegram.timeout.is_zero() {
            return Err(Error::Config("TELEGRAM_TIMEOUT_SECS must be greater than zero".to_string()));
        }
        if self.server.request_timeout.is_zero() {
            return Err(Error::Config("REQUEST_TIMEOUT_SECS must be greater than zero".to_string()));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                addr: "0.0.0.0:8080".to_string(),
                request_timeout: Duration::from_secs(30),
            },
            telegram: TelegramConfig {
                bot_token: "".to_string(),
                api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
                timeout: Duration::from_secs(10),
                escape_markdown: true,
            },
            routing: RoutingConfig {
                default_receivers: Vec::new(),
            },
            links: LinkConfig {
                grafana_url: "".to_string(),
                alertmanager_url: "".to_string(),
                prometheus_url: "".to_string(),
            },
            log_format: LogFormat::default(),
        }
    }
}

/// Splits a comma-separated receiver list, dropping empty entries.
pub fn parse_receiver_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect()
}

/// Accepts the `:8080` shorthand and binds it on all interfaces.
fn normalize_listen_addr(addr: &str) -> String {
    if addr.starts_with(':') {
        format!("0.0.0.0{}", addr)
    } else {
        addr.to_string()
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("{} has an invalid value ({}): {}", key, raw, e))),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_receiver_list_drops_empty_entries() {
        assert_eq!(parse_receiver_list("-100,200"), vec!["-100", "200"]);
        assert_eq!(parse_receiver_list(" a , ,b,"), vec!["a", "b"]);
        assert!(parse_receiver_list("").is_empty());
    }

    #[test]
    fn test_normalize_listen_addr() {
        assert_eq!(normalize_listen_addr(":9000"), "0.0.0.0:9000");
        assert_eq!(normalize_listen_addr("127.0.0.1:9000"), "127.0.0.1:9000");
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.telegram.api_url, DEFAULT_TELEGRAM_API_URL);
        assert!(config.telegram.escape_markdown);
    }

    #[test]
    fn test_validate_rejects_bad_api_url() {
        let mut config = Config::default();
        config.telegram.api_url = "not a url".to_string();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.telegram.timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
