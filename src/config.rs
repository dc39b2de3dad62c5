use crate::error::ConfigError;
use std::str::FromStr;

pub const DEFAULT_DATA_URL: &str = "https://data.alpaca.markets/v2";
pub const DEFAULT_TRADING_URL: &str = "https://paper-api.alpaca.markets/v2";
pub const DEFAULT_BROKER_URL: &str = "https://broker-api.sandbox.alpaca.markets/v1";

/// Trading configuration, read once at startup.
///
/// Presence and format are validated here so a missing credential fails fast
/// instead of surfacing later as a brokerage-side auth rejection.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_secret: String,
    pub data_url: String,
    pub trading_url: String,
    pub symbol: String,
    pub qty: u32,
    pub max_ratio: u32,
    pub max_in_flight: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: require("ALPACA_API_KEY")?,
            api_secret: require("ALPACA_API_SECRET")?,
            data_url: optional("ALPACA_DATA_URL", DEFAULT_DATA_URL),
            trading_url: optional("ALPACA_TRADING_URL", DEFAULT_TRADING_URL),
            symbol: optional("TRADE_SYMBOL", "NDAQ"),
            qty: parse_optional("TRADE_QTY", 1)?,
            max_ratio: parse_optional("MAX_RATIO", 20)?,
            max_in_flight: parse_optional("MAX_IN_FLIGHT", 8)?,
        })
    }
}

/// Broker (account maintenance) configuration, used by the sandbox utilities.
#[derive(Debug, Clone)]
pub struct BrokerConfig {
    pub auth_token: String,
    pub broker_url: String,
}

impl BrokerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            auth_token: require("ALPACA_BROKER_AUTH")?,
            broker_url: optional("ALPACA_BROKER_URL", DEFAULT_BROKER_URL),
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_optional<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidVar { name, value }),
        Err(_) => Ok(default),
    }
}
