//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `GREENLIGHT_*` environment variables, or a
//! configuration file. Fields fall back to development-friendly defaults.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The configured host is not an IP address.
    #[error("invalid listen host {host:?}: {message}")]
    InvalidHost { host: String, message: String },
}

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GREENLIGHT")]
pub struct ServerSettings {
    /// Interface to listen on.
    pub host: Option<String>,
    /// TCP port to listen on.
    #[ortho_config(default = 4000)]
    pub port: u16,
    /// Deployment environment reported by the healthcheck.
    pub environment: Option<String>,
    /// PostgreSQL connection string. Movies are kept in memory when unset.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Seconds to wait for a pooled database connection.
    pub db_connect_timeout_secs: Option<u64>,
}

impl ServerSettings {
    /// Return the configured host, falling back to all interfaces.
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    /// Return the deployment environment name.
    pub fn environment(&self) -> &str {
        self.environment.as_deref().unwrap_or(DEFAULT_ENVIRONMENT)
    }

    /// Return the database URL, if persistence is configured.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    /// Return the connection pool size.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Return how long a pool checkout may wait.
    pub fn db_connect_timeout(&self) -> Duration {
        Duration::from_secs(
            self.db_connect_timeout_secs
                .unwrap_or(DEFAULT_DB_CONNECT_TIMEOUT_SECS),
        )
    }

    /// Resolve the socket address to bind.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidHost`] when the host is not an IP
    /// address literal.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.host();
        let ip: IpAddr = host.parse().map_err(|err: std::net::AddrParseError| {
            ConfigError::InvalidHost {
                host: host.to_owned(),
                message: err.to_string(),
            }
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
