use std::{env, net::IpAddr, str::FromStr, time::Duration};

use thiserror::Error;

use crate::delivery::DeliveryLimits;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Where the generation backend lives and which model it should run.
/// Built once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    pub model: String,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            base_url,
            model: model.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub token: String,
    pub api_url: String,
    pub poll_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub backend: BackendConfig,
    pub health_timeout: Duration,
    pub generate_timeout: Duration,
    pub bind_addr: IpAddr,
    pub port: u16,
    pub telegram: Option<TelegramConfig>,
    pub delivery: DeliveryLimits,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = BackendConfig::new(
            read_string("OLLAMA_API", "http://localhost:11434"),
            read_string("OLLAMA_MODEL", "llama3"),
        );

        let telegram = env::var("BOT_TOKEN")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .map(|token| -> Result<TelegramConfig, ConfigError> {
                Ok(TelegramConfig {
                    token,
                    api_url: read_string("TELEGRAM_API_URL", "https://api.telegram.org")
                        .trim_end_matches('/')
                        .to_owned(),
                    poll_timeout: Duration::from_secs(read_parsed(
                        "TELEGRAM_POLL_TIMEOUT_SECS",
                        30,
                    )?),
                })
            })
            .transpose()?;

        let defaults = DeliveryLimits::default();
        let delivery = DeliveryLimits::new(
            read_parsed("DELIVERY_SINGLE_MAX", defaults.single_max)?,
            read_parsed("DELIVERY_CHUNK_MAX", defaults.chunk_max)?,
        )
        .ok_or(ConfigError::Invalid {
            name: "DELIVERY_CHUNK_MAX",
            value: "must be at least 2 and not exceed DELIVERY_SINGLE_MAX".to_owned(),
        })?;

        Ok(Self {
            backend,
            health_timeout: Duration::from_secs(read_parsed("OLLAMA_HEALTH_TIMEOUT_SECS", 5)?),
            generate_timeout: Duration::from_secs(read_parsed("OLLAMA_TIMEOUT_SECS", 60)?),
            bind_addr: read_parsed("BIND_ADDR", IpAddr::from([0, 0, 0, 0]))?,
            port: read_parsed("PORT", 3000)?,
            telegram,
            delivery,
        })
    }
}

fn read_string(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

fn read_parsed<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => {
            value.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
                name,
                value,
            })
        }
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_config_trims_trailing_slash() {
        let config = BackendConfig::new("http://ollama:11434///", "llama3");
        assert_eq!(config.base_url, "http://ollama:11434");
    }

    #[test]
    fn unset_variables_fall_back_to_defaults() {
        let port: u16 = read_parsed("AUTOAID_TEST_UNSET_PORT", 3000).expect("default");
        assert_eq!(port, 3000);
        assert_eq!(read_string("AUTOAID_TEST_UNSET_MODEL", "llama3"), "llama3");
    }
}
