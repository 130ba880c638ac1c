//! Server configuration.
//!
//! Resolution order: compiled defaults, then environment variables, then
//! whatever the caller (the CLI) sets explicitly.

use std::path::PathBuf;

use tracing::warn;

pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_DATABASE_PATH: &str = "DATABASE_PATH";

/// Configuration for the task server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `3001`; `0` auto-assigns).
    pub port: u16,
    /// SQLite database file (default `./data/tasks.db`).
    pub database_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3001,
            database_path: PathBuf::from("./data/tasks.db"),
        }
    }
}

impl ServerConfig {
    /// Defaults with process environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply overrides from a key lookup. Empty or invalid values are
    /// ignored and the current value is kept.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = read(ENV_HOST) {
            self.host = host;
        }
        if let Some(raw) = read(ENV_PORT) {
            match parse_port(&raw) {
                Some(port) => self.port = port,
                None => warn!(key = ENV_PORT, value = %raw, "invalid port env var, ignoring"),
            }
        }
        if let Some(path) = read(ENV_DATABASE_PATH) {
            self.database_path = PathBuf::from(path);
        }
    }

    /// `host:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a port number.
pub fn parse_port(val: &str) -> Option<u16> {
    val.trim().parse().ok()
}
