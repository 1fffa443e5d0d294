//! SQLite executor over sqlx

use std::str::FromStr;

use async_trait::async_trait;
use faultline_core::AdapterError;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row, Sqlite, TypeInfo, ValueRef};
use tracing::info;

use super::dialect::SqlDialect;
use super::schema::migration_sql;
use super::value::{SqlExecutor, SqlRow, SqlValue, format_timestamp};

fn db_err(e: sqlx::Error) -> AdapterError {
    AdapterError::Database(e.to_string())
}

/// [`SqlExecutor`] backed by a sqlx `SqlitePool`
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    pool: SqlitePool,
}

impl SqliteExecutor {
    /// Connect to `url`, creating the database file if missing
    pub async fn connect(url: &str) -> Result<Self, AdapterError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_err)?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(db_err)?;

        info!(url, "Connected to SQLite");
        Ok(Self { pool })
    }

    /// Private in-memory database
    ///
    /// Every SQLite in-memory connection is its own database, so the pool
    /// holds exactly one connection and never retires it.
    pub async fn in_memory() -> Result<Self, AdapterError> {
        let pool = in_memory_pool_options()
            .connect("sqlite::memory:")
            .await
            .map_err(db_err)?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create `table` and its indexes if missing
    pub async fn migrate(&self, table: &str) -> Result<(), AdapterError> {
        for statement in migration_sql(SqlDialect::Sqlite, table) {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(db_err)?;
        }
        Ok(())
    }
}

fn in_memory_pool_options() -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
}

fn bind_params<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &'q [SqlValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            SqlValue::Null => query.bind(None::<String>),
            SqlValue::Text(text) => query.bind(text.as_str()),
            SqlValue::Integer(i) => query.bind(*i),
            SqlValue::Timestamp(t) => query.bind(format_timestamp(t)),
            SqlValue::Json(value) => query.bind(value.to_string()),
        };
    }
    query
}

fn read_row(row: &SqliteRow) -> Result<SqlRow, AdapterError> {
    let mut out = SqlRow::new();
    for (index, column) in row.columns().iter().enumerate() {
        let storage_class = {
            let raw = row.try_get_raw(index).map_err(db_err)?;
            if raw.is_null() {
                None
            } else {
                Some(raw.type_info().name().to_string())
            }
        };

        let value = match storage_class.as_deref() {
            None => SqlValue::Null,
            Some("INTEGER") => SqlValue::Integer(row.try_get(index).map_err(db_err)?),
            Some("REAL") => {
                SqlValue::Text(row.try_get::<f64, _>(index).map_err(db_err)?.to_string())
            }
            Some(_) => SqlValue::Text(row.try_get(index).map_err(db_err)?),
        };
        out.push(column.name(), value);
    }
    Ok(out)
}

#[async_trait]
impl SqlExecutor for SqliteExecutor {
    async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqlRow>, AdapterError> {
        let rows = bind_params(sqlx::query(sql), params)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;
        rows.iter().map(read_row).collect()
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, AdapterError> {
        let result = bind_params(sqlx::query(sql), params)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected())
    }
}
