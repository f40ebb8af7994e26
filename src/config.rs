use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Yahoo,
    Synthetic,
}

impl FromStr for ProviderKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yahoo" => Ok(ProviderKind::Yahoo),
            "synthetic" => Ok(ProviderKind::Synthetic),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub price_provider: ProviderKind,
    pub default_ticker: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        fn parse<T: FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &'static str,
            default: &str,
        ) -> Result<T, ConfigError> {
            let value = lookup(key).unwrap_or_else(|| default.to_string());
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid { key, value })
        }

        Ok(Self {
            host: parse(&lookup, "HOST", "127.0.0.1")?,
            port: parse(&lookup, "PORT", "8050")?,
            price_provider: parse(&lookup, "PRICE_PROVIDER", "yahoo")?,
            default_ticker: lookup("DEFAULT_TICKER").unwrap_or_else(|| "AAPL".to_string()),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
