// src/config.rs
use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_STATIC_DIR: &str = "public";
/// One day, matching the backend's session cookie lifetime.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60 * 24;
pub const DEFAULT_PURGE_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub bind_addr: SocketAddr,
    pub backend_url: String,
    pub static_dir: PathBuf,
    pub session_ttl: Duration,
    pub purge_interval: Duration,
}

impl WidgetConfig {
    /// Read settings from the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            bind_addr: parse("WIDGET_BIND_ADDR", get("WIDGET_BIND_ADDR", DEFAULT_BIND_ADDR))?,
            backend_url: get("CHAT_BACKEND_URL", DEFAULT_BACKEND_URL),
            static_dir: PathBuf::from(get("WIDGET_STATIC_DIR", DEFAULT_STATIC_DIR)),
            session_ttl: Duration::from_secs(parse(
                "WIDGET_SESSION_TTL_SECS",
                get("WIDGET_SESSION_TTL_SECS", &DEFAULT_SESSION_TTL_SECS.to_string()),
            )?),
            purge_interval: Duration::from_secs(parse(
                "WIDGET_PURGE_INTERVAL_SECS",
                get("WIDGET_PURGE_INTERVAL_SECS", &DEFAULT_PURGE_INTERVAL_SECS.to_string()),
            )?),
        })
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            purge_interval: Duration::from_secs(DEFAULT_PURGE_INTERVAL_SECS),
        }
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}
