//! Warehouse access for the personnel directory
//!
//! The warehouse is the system of record the directory snapshot is loaded
//! from and the destination filtered subsets are persisted to. Two backends
//! are supported: SQLite for local/embedded deployments and PostgreSQL for
//! shared deployments. The backend is chosen once at startup.

pub mod postgres;
pub mod sqlite;

pub use postgres::PostgresWarehouse;
pub use sqlite::SqliteWarehouse;

use tracing::info;

use crate::core::config::{AppConfig, WarehouseBackend};
use crate::core::constants::MAX_TABLE_NAME_LENGTH;
use crate::core::storage::AppStorage;
use crate::data::error::DataError;
use crate::domain::directory::{Record, Snapshot};

/// Result of persisting a filtered subset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Whether the destination table was created by this save
    pub created: bool,
    /// Rows appended to the destination table
    pub rows_written: usize,
}

/// Warehouse service dispatching to the configured backend
///
/// Created once at server startup and shared across all modules.
pub enum WarehouseService {
    Sqlite(SqliteWarehouse),
    Postgres(PostgresWarehouse),
}

impl WarehouseService {
    /// Initialize the warehouse backend selected by configuration
    pub async fn init(config: &AppConfig, storage: &AppStorage) -> Result<Self, DataError> {
        match config.warehouse.backend {
            WarehouseBackend::Sqlite => {
                let warehouse = SqliteWarehouse::init(storage).await?;
                Ok(Self::Sqlite(warehouse))
            }
            WarehouseBackend::Postgres => {
                let url = config.warehouse.postgres_url.as_deref().ok_or_else(|| {
                    DataError::Config("PostgreSQL URL is required".to_string())
                })?;
                let warehouse = PostgresWarehouse::init(url).await?;
                Ok(Self::Postgres(warehouse))
            }
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Postgres(_) => "postgres",
        }
    }

    /// Load the full directory table into an in-memory snapshot.
    ///
    /// Row order is whatever the backend returns; the engine preserves it
    /// through every later filtering pass.
    pub async fn load_snapshot(&self, table: &str) -> Result<Snapshot, DataError> {
        validate_table_name(table)?;
        let rows = match self {
            Self::Sqlite(warehouse) => warehouse.fetch_rows(table).await?,
            Self::Postgres(warehouse) => warehouse.fetch_rows(table).await?,
        };
        info!(
            table = table,
            rows = rows.len(),
            backend = self.backend_name(),
            "Directory snapshot loaded"
        );
        Ok(Snapshot::new(table, rows))
    }

    /// Persist rows to a destination table, appending when it already exists
    /// and creating it first when it does not.
    pub async fn save_rows(&self, table: &str, rows: &[&Record]) -> Result<SaveOutcome, DataError> {
        validate_table_name(table)?;
        let outcome = match self {
            Self::Sqlite(warehouse) => warehouse.save_rows(table, rows).await?,
            Self::Postgres(warehouse) => warehouse.save_rows(table, rows).await?,
        };
        info!(
            table = table,
            rows = outcome.rows_written,
            created = outcome.created,
            "Filtered subset saved"
        );
        Ok(outcome)
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        match self {
            Self::Sqlite(warehouse) => warehouse.close().await,
            Self::Postgres(warehouse) => warehouse.close().await,
        }
    }
}

/// Validate a table identifier before it is interpolated into SQL.
///
/// Identifiers cannot be bound as query parameters, so only a conservative
/// subset is accepted: ASCII letters, digits, and underscores, not starting
/// with a digit.
pub fn validate_table_name(table: &str) -> Result<(), DataError> {
    if table.is_empty() || table.len() > MAX_TABLE_NAME_LENGTH {
        return Err(DataError::InvalidTableName(table.to_string()));
    }
    let mut chars = table.chars();
    let first = chars.next().unwrap_or('0');
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(DataError::InvalidTableName(table.to_string()));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DataError::InvalidTableName(table.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        assert!(validate_table_name("personnel").is_ok());
        assert!(validate_table_name("_staging_2024").is_ok());
        assert!(validate_table_name("SavedResults").is_ok());
    }

    #[test]
    fn rejects_injection_attempts() {
        assert!(validate_table_name("personnel; DROP TABLE x").is_err());
        assert!(validate_table_name("a\"b").is_err());
        assert!(validate_table_name("a b").is_err());
        assert!(validate_table_name("tab-le").is_err());
    }

    #[test]
    fn rejects_empty_and_leading_digit() {
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("1table").is_err());
    }

    #[test]
    fn rejects_over_length_names() {
        let long = "a".repeat(MAX_TABLE_NAME_LENGTH + 1);
        assert!(validate_table_name(&long).is_err());
        let max = "a".repeat(MAX_TABLE_NAME_LENGTH);
        assert!(validate_table_name(&max).is_ok());
    }
}
