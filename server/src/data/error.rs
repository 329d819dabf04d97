//! Unified error type for data layer
//!
//! This module provides a unified error type that can represent errors from
//! both warehouse backends (SQLite, PostgreSQL).

use thiserror::Error;

/// Unified error type for data layer operations
///
/// This error type wraps backend-specific errors while preserving context
/// about which backend generated the error.
#[derive(Error, Debug)]
pub enum DataError {
    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(sqlx::Error),

    /// PostgreSQL database error
    #[error("PostgreSQL error: {0}")]
    Postgres(sqlx::Error),

    /// The source table is missing a column the directory schema requires
    #[error("Source table is missing required column '{column}'")]
    SchemaMismatch { column: String },

    /// Table identifier rejected before reaching the database
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DataError {
    /// Create a SQLite error with preserved context
    pub fn from_sqlite(e: sqlx::Error) -> Self {
        Self::Sqlite(e)
    }

    /// Create a PostgreSQL error with preserved context
    pub fn from_postgres(e: sqlx::Error) -> Self {
        Self::Postgres(e)
    }

    /// Create a schema mismatch error for a missing column
    pub fn schema_mismatch(column: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            column: column.into(),
        }
    }

    /// Get the backend name that generated this error
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "sqlite",
            Self::Postgres(_) => "postgres",
            Self::SchemaMismatch { .. }
            | Self::InvalidTableName(_)
            | Self::Config(_)
            | Self::Io(_) => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_display() {
        let err = DataError::schema_mismatch("surname");
        assert_eq!(
            err.to_string(),
            "Source table is missing required column 'surname'"
        );
    }

    #[test]
    fn test_invalid_table_name_display() {
        let err = DataError::InvalidTableName("1; DROP TABLE".to_string());
        assert_eq!(err.to_string(), "Invalid table name: 1; DROP TABLE");
    }

    #[test]
    fn test_backend_method() {
        assert_eq!(DataError::schema_mismatch("email").backend(), "unknown");
        assert_eq!(
            DataError::from_sqlite(sqlx::Error::PoolClosed).backend(),
            "sqlite"
        );
        assert_eq!(
            DataError::from_postgres(sqlx::Error::PoolClosed).backend(),
            "postgres"
        );
    }
}
