/**
* filename : config
* author : HAMA
* date: 2025. 6. 2.
* description:
**/

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use crate::error::VwapError;
use crate::feed::coinbase::COINBASE_WS_URL;
use crate::listener::ReconnectPolicy;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub engine: EngineConfig,
    pub feed: FeedConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of most recent trades kept per symbol
    pub window_size: usize,
    /// Fixed delay between two feed reads
    pub throttle_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub provider: String,
    pub url: String,
    pub product_ids: Vec<String>,
    /// Reconnects attempted by the caller after a feed failure
    pub reconnect_attempts: u32,
    pub reconnect_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    /// Load configuration from `config.json` in the working directory
    pub fn load() -> Result<Self, VwapError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a file, falling back to defaults when it does not exist
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, VwapError> {
        let config_path = path.as_ref();

        let mut cfg = if config_path.exists() {
            let mut file = File::open(config_path)
                .map_err(|e| VwapError::ConfigError(format!("Failed to open config file: {}", e)))?;

            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .map_err(|e| VwapError::ConfigError(format!("Failed to read config file: {}", e)))?;

            serde_json::from_str::<Config>(&contents)
                .map_err(|e| VwapError::ConfigError(format!("Failed to parse config file: {}", e)))?
        } else {
            Config::default()
        };

        // environment overrides
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply environment variable overrides for runtime fields
    fn apply_env_overrides(&mut self) {
        use std::env;
        if let Ok(v) = env::var("VWAP_WINDOW_SIZE") {
            match v.parse() {
                Ok(n) => self.engine.window_size = n,
                Err(_) => log::warn!("Ignoring VWAP_WINDOW_SIZE={:?}: not an integer", v),
            }
        }
        if let Ok(v) = env::var("VWAP_THROTTLE_MS") {
            match v.parse() {
                Ok(n) => self.engine.throttle_ms = n,
                Err(_) => log::warn!("Ignoring VWAP_THROTTLE_MS={:?}: not an integer", v),
            }
        }
        if let Ok(v) = env::var("FEED_URL") { if !v.is_empty() { self.feed.url = v; } }
        if let Ok(v) = env::var("FEED_PRODUCT_IDS") {
            let ids: Vec<String> = v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !ids.is_empty() { self.feed.product_ids = ids; }
        }
        if let Ok(v) = env::var("FEED_RECONNECT_ATTEMPTS") {
            if let Ok(n) = v.parse() { self.feed.reconnect_attempts = n; }
        }
        if let Ok(v) = env::var("LOG_LEVEL") { if !v.is_empty() { self.logging.level = v; } }
    }

    /// Reject values the engine or the feed cannot work with
    pub fn validate(&self) -> Result<(), VwapError> {
        if self.engine.window_size == 0 {
            return Err(VwapError::ConfigError("engine.window_size must be greater than zero".to_string()));
        }
        if self.feed.product_ids.is_empty() {
            return Err(VwapError::ConfigError("feed.product_ids must not be empty".to_string()));
        }
        if self.feed.url.is_empty() {
            return Err(VwapError::ConfigError("feed.url must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.engine.throttle_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.feed.reconnect_delay_ms)
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            max_attempts: self.feed.reconnect_attempts,
            delay: self.reconnect_delay(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            engine: EngineConfig {
                window_size: 200,
                throttle_ms: 1000,
            },
            feed: FeedConfig {
                provider: "coinbase".to_string(),
                url: COINBASE_WS_URL.to_string(),
                product_ids: vec![
                    "BTC-USD".to_string(),
                    "ETH-USD".to_string(),
                    "ETH-BTC".to_string(),
                ],
                reconnect_attempts: 3,
                reconnect_delay_ms: 5000,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}
