//! Raw SQL storage
//!
//! [`SqlLogAdapter`] turns the [`LogAdapter`] contract into SQL text for a
//! configured [`SqlDialect`] and runs it through any [`SqlExecutor`]. The
//! adapter owns the camelCase/snake_case mapping in both directions.

pub mod columns;
pub mod dialect;
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod value;

use async_trait::async_trait;
use faultline_core::{
    AdapterError, DeleteFilter, LogAdapter, LogEntry, LogPage, NewLogEntry, OrderBy,
    QueryOptions, SortOrder, generate_entry_id, timestamp_now,
};
use tracing::{debug, instrument, trace};

pub use columns::{column_list, entry_to_params, row_to_entry, to_camel_case, to_snake_case};
pub use dialect::{Placeholders, SqlDialect, UnknownDialect};
pub use schema::{DEFAULT_TABLE, create_index_sql, create_table_sql, migration_sql};
pub use value::{SqlExecutor, SqlRow, SqlValue, format_timestamp};

/// Text columns covered by `search`
const SEARCH_COLUMNS: [&str; 4] = ["message", "stack", "path", "user_email"];

/// Statement text plus its positional parameters
#[derive(Debug, Default)]
struct Statement {
    clauses: Vec<String>,
    params: Vec<SqlValue>,
}

impl Statement {
    fn push(&mut self, clause: String, value: SqlValue) {
        self.clauses.push(clause);
        self.params.push(value);
    }

    fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// [`LogAdapter`] over a raw SQL executor
#[derive(Debug, Clone)]
pub struct SqlLogAdapter<E> {
    executor: E,
    dialect: SqlDialect,
    table: String,
}

impl<E: SqlExecutor> SqlLogAdapter<E> {
    /// Adapter over the default `error_logs` table
    pub fn new(executor: E, dialect: SqlDialect) -> Self {
        Self {
            executor,
            dialect,
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// Use a different table; the name must be a plain SQL identifier
    pub fn with_table(mut self, table: impl Into<String>) -> Result<Self, AdapterError> {
        let table = table.into();
        if !is_valid_identifier(&table) {
            return Err(AdapterError::database(format!("invalid table name {table:?}")));
        }
        self.table = table;
        Ok(self)
    }

    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Create the table and its indexes if missing
    pub async fn migrate(&self) -> Result<(), AdapterError> {
        for statement in migration_sql(self.dialect, &self.table) {
            self.executor.execute(&statement, &[]).await?;
        }
        debug!(table = %self.table, dialect = %self.dialect, "Applied log table schema");
        Ok(())
    }

    fn filter_statement(&self, options: &QueryOptions, ph: &mut Placeholders) -> Statement {
        let mut stmt = Statement::default();

        if let Some(level) = options.level {
            stmt.push(format!("level = {}", ph.bind()), SqlValue::from(level.as_str()));
        }
        if let Some(user_id) = &options.user_id {
            stmt.push(format!("user_id = {}", ph.bind()), SqlValue::from(user_id.as_str()));
        }
        if let Some(start) = options.start_date {
            stmt.push(format!("created_at >= {}", ph.bind()), SqlValue::Timestamp(start));
        }
        if let Some(end) = options.end_date {
            stmt.push(format!("created_at <= {}", ph.bind()), SqlValue::Timestamp(end));
        }
        if let Some(term) = options.search_term() {
            let pattern = self.dialect.search_pattern(term);
            let alternatives: Vec<String> = SEARCH_COLUMNS
                .iter()
                .map(|column| {
                    stmt.params.push(SqlValue::Text(pattern.clone()));
                    self.dialect.case_insensitive_like(column, &ph.bind())
                })
                .collect();
            stmt.clauses.push(format!("({})", alternatives.join(" OR ")));
        }

        stmt
    }

    fn select_by_id_sql(&self) -> String {
        let mut ph = self.dialect.placeholders();
        format!(
            "SELECT {} FROM {} WHERE id = {}",
            column_list(),
            self.table,
            ph.bind()
        )
    }
}

#[async_trait]
impl<E: SqlExecutor> LogAdapter for SqlLogAdapter<E> {
    #[instrument(skip(self, entry), fields(dialect = %self.dialect, level = %entry.level))]
    async fn create(&self, entry: NewLogEntry) -> Result<LogEntry, AdapterError> {
        let entry = entry.into_entry(generate_entry_id(), timestamp_now());
        let (columns, params): (Vec<String>, Vec<SqlValue>) =
            entry_to_params(&entry).into_iter().unzip();

        let mut ph = self.dialect.placeholders();
        let insert = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            ph.bind_list(params.len())
        );

        if self.dialect.supports_returning() {
            let sql = format!("{insert} RETURNING {}", column_list());
            let rows = self.executor.query(&sql, &params).await?;
            let row = rows
                .first()
                .ok_or_else(|| AdapterError::MissingRow(entry.id.clone()))?;
            return row_to_entry(row);
        }

        // No RETURNING: insert, then read the row back by id
        self.executor.execute(&insert, &params).await?;
        self.find_by_id(&entry.id)
            .await?
            .ok_or(AdapterError::MissingRow(entry.id))
    }

    async fn find_many(&self, options: &QueryOptions) -> Result<LogPage, AdapterError> {
        let mut ph = self.dialect.placeholders();
        let mut stmt = self.filter_statement(options, &mut ph);
        let where_sql = stmt.where_sql();

        let count_sql = format!("SELECT COUNT(*) AS total FROM {}{}", self.table, where_sql);
        let total = self
            .executor
            .query(&count_sql, &stmt.params)
            .await?
            .first()
            .and_then(|row| row.get("total").and_then(SqlValue::as_i64))
            .ok_or_else(|| AdapterError::invalid_row("count query returned no total"))?;
        let total = u64::try_from(total).unwrap_or(0);

        if options.count_only() {
            return Ok(LogPage::new(Vec::new(), total));
        }

        let order_column = match options.order_by {
            OrderBy::CreatedAt => "created_at",
            OrderBy::Level => "level",
        };
        let direction = match options.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        let offset = i64::try_from(options.offset()).unwrap_or(i64::MAX);
        let limit_token = ph.bind();
        let offset_token = ph.bind();
        stmt.params.push(SqlValue::Integer(i64::from(options.limit)));
        stmt.params.push(SqlValue::Integer(offset));

        let rows_sql = format!(
            "SELECT {} FROM {}{} ORDER BY {order_column} {direction}, id {direction} \
             LIMIT {limit_token} OFFSET {offset_token}",
            column_list(),
            self.table,
            where_sql,
        );
        trace!(sql = %rows_sql, "Querying log page");

        let logs = self
            .executor
            .query(&rows_sql, &stmt.params)
            .await?
            .iter()
            .map(row_to_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LogPage::new(logs, total))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<LogEntry>, AdapterError> {
        let rows = self
            .executor
            .query(&self.select_by_id_sql(), &[SqlValue::from(id)])
            .await?;
        rows.first().map(row_to_entry).transpose()
    }

    async fn delete(&self, id: &str) -> Result<(), AdapterError> {
        let mut ph = self.dialect.placeholders();
        let sql = format!("DELETE FROM {} WHERE id = {}", self.table, ph.bind());
        self.executor.execute(&sql, &[SqlValue::from(id)]).await?;
        Ok(())
    }

    async fn delete_many(&self, filter: &DeleteFilter) -> Result<u64, AdapterError> {
        if filter.is_empty() {
            return Ok(0);
        }

        let mut ph = self.dialect.placeholders();
        let mut stmt = Statement::default();
        if let Some(before) = filter.before {
            stmt.push(format!("created_at < {}", ph.bind()), SqlValue::Timestamp(before));
        }
        if let Some(level) = filter.level {
            stmt.push(format!("level = {}", ph.bind()), SqlValue::from(level.as_str()));
        }

        let sql = format!("DELETE FROM {}{}", self.table, stmt.where_sql());
        let deleted = self.executor.execute(&sql, &stmt.params).await?;
        debug!(deleted, table = %self.table, "Deleted log entries");
        Ok(deleted)
    }
}
