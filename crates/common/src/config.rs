use tracing::debug;

use crate::{Error, Result};

/// Process configuration loaded from environment variables at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Port the HTTP server binds on all interfaces.
    pub server_port: u16,
    /// Optional TOML file overriding strategy parameters.
    /// `None` means the built-in defaults are used.
    pub strategy_config_path: Option<String>,
}

impl Config {
    pub const DEFAULT_PORT: u16 = 5000;

    /// Load configuration from the environment, reading `.env` if present.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            debug!(error = %e, "No .env file loaded");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_port = match lookup("SERVER_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                Error::Config(format!("SERVER_PORT must be a port number, got: '{raw}'"))
            })?,
            None => Self::DEFAULT_PORT,
        };

        let strategy_config_path = lookup("STRATEGY_CONFIG_PATH")
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());

        Ok(Config {
            server_port,
            strategy_config_path,
        })
    }
}
