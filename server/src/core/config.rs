use std::fmt;

use anyhow::Result;

use super::cli::CliConfig;
use super::constants::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SOURCE_TABLE};
use crate::data::warehouse::validate_table_name;

// =============================================================================
// Warehouse Backend Enum (SQLite or PostgreSQL)
// =============================================================================

/// Warehouse backend holding the directory source table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WarehouseBackend {
    #[default]
    Sqlite,
    Postgres,
}

impl fmt::Display for WarehouseBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarehouseBackend::Sqlite => write!(f, "sqlite"),
            WarehouseBackend::Postgres => write!(f, "postgres"),
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Warehouse configuration
#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    pub backend: WarehouseBackend,
    pub postgres_url: Option<String>,
    /// Table the directory snapshot is loaded from
    pub source_table: String,
}

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub warehouse: WarehouseConfig,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let host = cli
            .host
            .clone()
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = cli.port.unwrap_or(DEFAULT_PORT);

        let backend = cli.warehouse_backend.unwrap_or_default();
        let postgres_url = cli.postgres_url.clone();
        if backend == WarehouseBackend::Postgres
            && postgres_url.as_deref().is_none_or(str::is_empty)
        {
            anyhow::bail!("PostgreSQL URL is required when using the postgres backend");
        }

        let source_table = cli
            .source_table
            .clone()
            .unwrap_or_else(|| DEFAULT_SOURCE_TABLE.to_string());
        validate_table_name(&source_table)
            .map_err(|e| anyhow::anyhow!("Invalid source table: {e}"))?;

        if is_all_interfaces(&host) {
            tracing::warn!(
                host = %host,
                "Server is bound to all interfaces; the directory will be reachable from the network"
            );
        }

        Ok(Self {
            server: ServerConfig { host, port },
            warehouse: WarehouseConfig {
                backend,
                postgres_url,
                source_table,
            },
        })
    }
}

/// Whether a host string binds every interface
pub(crate) fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_cli_is_empty() {
        let config = AppConfig::load(&CliConfig::default()).unwrap();
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.warehouse.backend, WarehouseBackend::Sqlite);
        assert_eq!(config.warehouse.source_table, DEFAULT_SOURCE_TABLE);
    }

    #[test]
    fn cli_overrides_defaults() {
        let cli = CliConfig {
            host: Some("10.0.0.5".to_string()),
            port: Some(9000),
            source_table: Some("staff_2024".to_string()),
            ..CliConfig::default()
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.host, "10.0.0.5");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.warehouse.source_table, "staff_2024");
    }

    #[test]
    fn postgres_requires_url() {
        let cli = CliConfig {
            warehouse_backend: Some(WarehouseBackend::Postgres),
            ..CliConfig::default()
        };
        assert!(AppConfig::load(&cli).is_err());

        let cli = CliConfig {
            warehouse_backend: Some(WarehouseBackend::Postgres),
            postgres_url: Some("postgres://localhost/directory".to_string()),
            ..CliConfig::default()
        };
        assert!(AppConfig::load(&cli).is_ok());
    }

    #[test]
    fn invalid_source_table_is_rejected() {
        let cli = CliConfig {
            source_table: Some("people; DROP TABLE x".to_string()),
            ..CliConfig::default()
        };
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(is_all_interfaces("[::]"));
        assert!(!is_all_interfaces("127.0.0.1"));
        assert!(!is_all_interfaces("localhost"));
    }
}
