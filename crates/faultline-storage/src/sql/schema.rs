//! DDL for the log table

use super::dialect::SqlDialect;

/// Default table name
pub const DEFAULT_TABLE: &str = "error_logs";

/// `CREATE TABLE IF NOT EXISTS` for `table`
pub fn create_table_sql(dialect: SqlDialect, table: &str) -> String {
    match dialect {
        SqlDialect::Postgres => format!(
            "CREATE TABLE IF NOT EXISTS {table} (\
             id TEXT PRIMARY KEY, \
             level TEXT NOT NULL, \
             message TEXT NOT NULL, \
             stack TEXT, \
             user_id TEXT, \
             user_email TEXT, \
             user_name TEXT, \
             path TEXT, \
             method TEXT, \
             user_agent TEXT, \
             ip TEXT, \
             metadata JSONB, \
             created_at TIMESTAMPTZ NOT NULL DEFAULT NOW())"
        ),
        // MySQL has no CREATE INDEX IF NOT EXISTS, so indexes live inline
        SqlDialect::Mysql => format!(
            "CREATE TABLE IF NOT EXISTS {table} (\
             id VARCHAR(36) PRIMARY KEY, \
             level VARCHAR(10) NOT NULL, \
             message TEXT NOT NULL, \
             stack TEXT, \
             user_id VARCHAR(255), \
             user_email VARCHAR(255), \
             user_name VARCHAR(255), \
             path TEXT, \
             method VARCHAR(16), \
             user_agent TEXT, \
             ip VARCHAR(64), \
             metadata JSON, \
             created_at DATETIME(6) NOT NULL, \
             INDEX idx_{table}_level (level), \
             INDEX idx_{table}_user_id (user_id), \
             INDEX idx_{table}_created_at (created_at))"
        ),
        SqlDialect::Sqlite => format!(
            "CREATE TABLE IF NOT EXISTS {table} (\
             id TEXT PRIMARY KEY NOT NULL, \
             level TEXT NOT NULL, \
             message TEXT NOT NULL, \
             stack TEXT, \
             user_id TEXT, \
             user_email TEXT, \
             user_name TEXT, \
             path TEXT, \
             method TEXT, \
             user_agent TEXT, \
             ip TEXT, \
             metadata TEXT, \
             created_at TEXT NOT NULL)"
        ),
    }
}

/// Index statements for level, user_id and created_at
///
/// Empty for MySQL, whose indexes are part of [`create_table_sql`].
pub fn create_index_sql(dialect: SqlDialect, table: &str) -> Vec<String> {
    match dialect {
        SqlDialect::Mysql => Vec::new(),
        SqlDialect::Postgres | SqlDialect::Sqlite => ["level", "user_id", "created_at"]
            .iter()
            .map(|column| {
                format!("CREATE INDEX IF NOT EXISTS idx_{table}_{column} ON {table} ({column})")
            })
            .collect(),
    }
}

/// Table and index statements in execution order
pub fn migration_sql(dialect: SqlDialect, table: &str) -> Vec<String> {
    let mut statements = vec![create_table_sql(dialect, table)];
    statements.extend(create_index_sql(dialect, table));
    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_migration() {
        let statements = migration_sql(SqlDialect::Sqlite, DEFAULT_TABLE);
        assert_eq!(statements.len(), 4);
        assert!(statements[0].contains("created_at TEXT NOT NULL"));
        assert_eq!(
            statements[3],
            "CREATE INDEX IF NOT EXISTS idx_error_logs_created_at ON error_logs (created_at)"
        );
    }

    #[test]
    fn test_mysql_indexes_inline() {
        let statements = migration_sql(SqlDialect::Mysql, "app_logs");
        assert_eq!(statements.len(), 1);
        assert!(statements[0].contains("INDEX idx_app_logs_user_id (user_id)"));
    }

    #[test]
    fn test_postgres_uses_native_types() {
        let sql = create_table_sql(SqlDialect::Postgres, DEFAULT_TABLE);
        assert!(sql.contains("metadata JSONB"));
        assert!(sql.contains("TIMESTAMPTZ"));
    }
}
