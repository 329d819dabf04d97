//! SQLite warehouse backend
//!
//! Local/embedded deployments keep the directory source table in a single
//! database file under the application data directory. WAL mode allows
//! concurrent reads while a save is in flight.

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{QueryBuilder, Row, SqlitePool};

use crate::core::constants::{
    SAVE_INSERT_BATCH, SQLITE_BUSY_TIMEOUT_SECS, SQLITE_DB_FILENAME, SQLITE_MAX_CONNECTIONS,
};
use crate::core::storage::AppStorage;
use crate::data::error::DataError;
use crate::data::warehouse::SaveOutcome;
use crate::domain::directory::Record;

/// SQLite warehouse backend
pub struct SqliteWarehouse {
    pool: SqlitePool,
}

impl SqliteWarehouse {
    /// Initialize the warehouse database under the application data directory
    pub async fn init(storage: &AppStorage) -> Result<Self, DataError> {
        let db_path = storage.data_dir().join(SQLITE_DB_FILENAME);
        let warehouse = Self::connect(&db_path).await?;
        tracing::debug!(path = %db_path.display(), "SqliteWarehouse initialized");
        Ok(warehouse)
    }

    /// Open a pool against a database file, creating it if missing
    pub async fn connect(db_path: &Path) -> Result<Self, DataError> {
        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(SQLITE_BUSY_TIMEOUT_SECS));

        let pool = SqlitePoolOptions::new()
            .max_connections(SQLITE_MAX_CONNECTIONS)
            .connect_with(options)
            .await
            .map_err(DataError::from_sqlite)?;

        Ok(Self { pool })
    }

    /// Fetch every row of the source table in storage order
    pub async fn fetch_rows(&self, table: &str) -> Result<Vec<Record>, DataError> {
        let query = format!("SELECT * FROM \"{table}\"");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(DataError::from_sqlite)?;

        rows.iter().map(record_from_row).collect()
    }

    /// Append rows to a destination table, creating it when absent
    pub async fn save_rows(&self, table: &str, rows: &[&Record]) -> Result<SaveOutcome, DataError> {
        let created = !self.table_exists(table).await?;
        if created {
            self.create_table(table).await?;
        }
        self.insert_rows(table, rows).await?;
        Ok(SaveOutcome {
            created,
            rows_written: rows.len(),
        })
    }

    async fn table_exists(&self, table: &str) -> Result<bool, DataError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
                .bind(table)
                .fetch_one(&self.pool)
                .await
                .map_err(DataError::from_sqlite)?;
        Ok(count > 0)
    }

    async fn create_table(&self, table: &str) -> Result<(), DataError> {
        let columns = Record::COLUMNS
            .iter()
            .map(|c| format!("\"{c}\" TEXT"))
            .collect::<Vec<_>>()
            .join(", ");
        let ddl = format!("CREATE TABLE \"{table}\" ({columns})");
        sqlx::query(&ddl)
            .execute(&self.pool)
            .await
            .map_err(DataError::from_sqlite)?;
        Ok(())
    }

    async fn insert_rows(&self, table: &str, rows: &[&Record]) -> Result<(), DataError> {
        let mut tx = self.pool.begin().await.map_err(DataError::from_sqlite)?;
        let column_list = Record::COLUMNS.join(", ");
        for chunk in rows.chunks(SAVE_INSERT_BATCH) {
            let mut builder: QueryBuilder<sqlx::Sqlite> =
                QueryBuilder::new(format!("INSERT INTO \"{table}\" ({column_list}) "));
            builder.push_values(chunk, |mut b, record| {
                b.push_bind(record.given_name.clone())
                    .push_bind(record.surname.clone())
                    .push_bind(record.title.clone())
                    .push_bind(record.email.clone())
                    .push_bind(record.department_acronym.clone())
                    .push_bind(record.department_name.clone())
                    .push_bind(record.organization_acronym.clone())
                    .push_bind(record.organization_name.clone())
                    .push_bind(record.organization_structure.clone());
            });
            builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(DataError::from_sqlite)?;
        }
        tx.commit().await.map_err(DataError::from_sqlite)?;
        Ok(())
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("SQLite warehouse pool closed");
    }
}

/// Map one result row to a record, surfacing a missing required column as a
/// schema mismatch rather than a generic driver error.
fn record_from_row(row: &SqliteRow) -> Result<Record, DataError> {
    Ok(Record {
        given_name: get_column(row, "given_name")?,
        surname: get_column(row, "surname")?,
        title: get_column(row, "title")?,
        email: get_column(row, "email")?,
        department_acronym: get_column(row, "department_acronym")?,
        department_name: get_column(row, "department_name")?,
        organization_acronym: get_column(row, "organization_acronym")?,
        organization_name: get_column(row, "organization_name")?,
        organization_structure: get_column(row, "organization_structure")?,
    })
}

fn get_column(row: &SqliteRow, column: &str) -> Result<Option<String>, DataError> {
    match row.try_get::<Option<String>, _>(column) {
        Ok(value) => Ok(value),
        Err(sqlx::Error::ColumnNotFound(_)) => Err(DataError::schema_mismatch(column)),
        Err(e) => Err(DataError::from_sqlite(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_warehouse() -> (tempfile::TempDir, SqliteWarehouse) {
        let dir = tempfile::tempdir().unwrap();
        let warehouse = SqliteWarehouse::connect(&dir.path().join("test.db"))
            .await
            .unwrap();
        (dir, warehouse)
    }

    async fn seed(warehouse: &SqliteWarehouse, table: &str, names: &[(&str, Option<&str>)]) {
        warehouse.create_table(table).await.unwrap();
        for (surname, email) in names {
            sqlx::query(&format!(
                "INSERT INTO \"{table}\" (surname, email) VALUES (?, ?)"
            ))
            .bind(surname)
            .bind(email)
            .execute(&warehouse.pool)
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn fetch_preserves_storage_order() {
        let (_dir, warehouse) = temp_warehouse().await;
        seed(
            &warehouse,
            "personnel",
            &[("Alpha", Some("a@x.ca")), ("Beta", None), ("Gamma", Some("g@x.ca"))],
        )
        .await;

        let rows = warehouse.fetch_rows("personnel").await.unwrap();
        let surnames: Vec<_> = rows.iter().map(|r| r.surname.as_deref()).collect();
        assert_eq!(surnames, vec![Some("Alpha"), Some("Beta"), Some("Gamma")]);
    }

    #[tokio::test]
    async fn null_columns_map_to_none() {
        let (_dir, warehouse) = temp_warehouse().await;
        seed(&warehouse, "personnel", &[("Beta", None)]).await;

        let rows = warehouse.fetch_rows("personnel").await.unwrap();
        assert_eq!(rows[0].email, None);
        assert_eq!(rows[0].given_name, None);
    }

    #[tokio::test]
    async fn missing_column_is_schema_mismatch() {
        let (_dir, warehouse) = temp_warehouse().await;
        sqlx::query("CREATE TABLE partial (surname TEXT, email TEXT)")
            .execute(&warehouse.pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO partial (surname, email) VALUES ('X', 'x@x.ca')")
            .execute(&warehouse.pool)
            .await
            .unwrap();

        let err = warehouse.fetch_rows("partial").await.unwrap_err();
        assert!(matches!(err, DataError::SchemaMismatch { .. }));
    }

    #[tokio::test]
    async fn save_creates_then_appends() {
        let (_dir, warehouse) = temp_warehouse().await;
        let record = Record {
            surname: Some("Singh".to_string()),
            ..Record::default()
        };

        let first = warehouse.save_rows("saved", &[&record]).await.unwrap();
        assert!(first.created);
        assert_eq!(first.rows_written, 1);

        let second = warehouse
            .save_rows("saved", &[&record, &record])
            .await
            .unwrap();
        assert!(!second.created);
        assert_eq!(second.rows_written, 2);

        let rows = warehouse.fetch_rows("saved").await.unwrap();
        assert_eq!(rows.len(), 3);
    }
}
