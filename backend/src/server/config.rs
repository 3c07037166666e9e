//! Server settings loaded via OrthoConfig and the runtime configuration built
//! from them.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use shareit::outbound::persistence::{DbPool, PoolConfig};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Settings failures detected before the server starts.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value}: {source}")]
    BindAddress {
        value: String,
        source: std::net::AddrParseError,
    },
}

/// Configuration values controlling the HTTP server and its store.
///
/// Environment variables use the `SHAREIT_` prefix, for example
/// `SHAREIT_DATABASE_URL`.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SHAREIT")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_address: Option<String>,
    /// PostgreSQL connection URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl ServerSettings {
    /// Parse the configured bind address, falling back to the default.
    pub fn bind_address(&self) -> Result<SocketAddr, SettingsError> {
        let value = self
            .bind_address
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDRESS);
        value
            .parse()
            .map_err(|source| SettingsError::BindAddress {
                value: value.to_owned(),
                source,
            })
    }

    /// Configured pool size, falling back to the default.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }

    /// Pool configuration when a database is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url
            .as_deref()
            .map(|url| PoolConfig::new(url).with_max_size(self.db_max_connections()))
    }
}

/// Runtime configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Serve on `bind_addr` backed by the in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
        }
    }

    /// Back every repository with PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
