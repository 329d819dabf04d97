//! PostgreSQL warehouse backend
//!
//! Shared deployments point the service at an existing PostgreSQL database
//! holding the directory source table. The pool is sized conservatively; the
//! service reads the table once per startup and writes only on save.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgRow};
use sqlx::{PgPool, QueryBuilder, Row};

use crate::core::constants::{
    POSTGRES_ACQUIRE_TIMEOUT_SECS, POSTGRES_MAX_CONNECTIONS, SAVE_INSERT_BATCH,
};
use crate::data::error::DataError;
use crate::data::warehouse::SaveOutcome;
use crate::domain::directory::Record;

/// PostgreSQL warehouse backend
pub struct PostgresWarehouse {
    pool: PgPool,
}

impl PostgresWarehouse {
    /// Initialize a connection pool from a database URL
    pub async fn init(url: &str) -> Result<Self, DataError> {
        let options: PgConnectOptions = url
            .parse()
            .map_err(|e| DataError::Config(format!("Invalid PostgreSQL URL: {e}")))?;

        let pool = PgPoolOptions::new()
            .max_connections(POSTGRES_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(POSTGRES_ACQUIRE_TIMEOUT_SECS))
            .connect_with(options)
            .await
            .map_err(DataError::from_postgres)?;

        tracing::debug!("PostgresWarehouse initialized");
        Ok(Self { pool })
    }

    /// Fetch every row of the source table in storage order
    pub async fn fetch_rows(&self, table: &str) -> Result<Vec<Record>, DataError> {
        let query = format!("SELECT * FROM \"{table}\"");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(DataError::from_postgres)?;

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
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_name = $1",
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await
        .map_err(DataError::from_postgres)?;
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
            .map_err(DataError::from_postgres)?;
        Ok(())
    }

    async fn insert_rows(&self, table: &str, rows: &[&Record]) -> Result<(), DataError> {
        let mut tx = self.pool.begin().await.map_err(DataError::from_postgres)?;
        let column_list = Record::COLUMNS.join(", ");
        for chunk in rows.chunks(SAVE_INSERT_BATCH) {
            let mut builder: QueryBuilder<sqlx::Postgres> =
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
                .map_err(DataError::from_postgres)?;
        }
        tx.commit().await.map_err(DataError::from_postgres)?;
        Ok(())
    }

    /// Close the connection pool gracefully
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::debug!("PostgreSQL warehouse pool closed");
    }
}

fn record_from_row(row: &PgRow) -> Result<Record, DataError> {
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

fn get_column(row: &PgRow, column: &str) -> Result<Option<String>, DataError> {
    match row.try_get::<Option<String>, _>(column) {
        Ok(value) => Ok(value),
        Err(sqlx::Error::ColumnNotFound(_)) => Err(DataError::schema_mismatch(column)),
        Err(e) => Err(DataError::from_postgres(e)),
    }
}
