//! Server configuration loaded from environment variables.
//!
//! CLI flags override these values in `main`.

use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Runtime configuration for the HTTP server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Bind address (from TASKDECK_HOST)
    pub host: String,
    /// Bind port (from TASKDECK_PORT)
    pub port: u16,
    /// SQLite database file (from TASKDECK_DATABASE). `None` uses the
    /// platform data directory.
    pub database: Option<PathBuf>,
    /// Allowed CORS origins (from TASKDECK_CORS_ORIGINS, comma-separated).
    /// `None` allows any origin.
    pub cors_origins: Option<Vec<String>>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("TASKDECK_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("TASKDECK_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: "TASKDECK_PORT",
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };

        let database = lookup("TASKDECK_DATABASE")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let cors_origins = lookup("TASKDECK_CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty());

        Ok(Self {
            host,
            port,
            database,
            cors_origins,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: None,
            cors_origins: None,
        }
    }
}
