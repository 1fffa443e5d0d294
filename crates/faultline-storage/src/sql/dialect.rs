//! SQL dialects and placeholder generation

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Backend family targeted by generated SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlDialect {
    /// Numbered placeholders (`$1`, `$2`, ...)
    Postgres,
    /// `?` placeholders, no `RETURNING`
    Mysql,
    /// `?` placeholders
    Sqlite,
}

/// Error returned when parsing an unknown dialect name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown SQL dialect: {0} (expected postgres, mysql or sqlite)")]
pub struct UnknownDialect(pub String);

impl SqlDialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SqlDialect::Postgres => "postgres",
            SqlDialect::Mysql => "mysql",
            SqlDialect::Sqlite => "sqlite",
        }
    }

    /// Fresh placeholder generator for one statement
    pub fn placeholders(&self) -> Placeholders {
        Placeholders::new(*self)
    }

    /// Whether `INSERT ... RETURNING` is available
    pub fn supports_returning(&self) -> bool {
        !matches!(self, SqlDialect::Mysql)
    }

    /// Case-insensitive `LIKE` predicate on `column`
    ///
    /// The bound pattern must already be lowercased for dialects without
    /// `ILIKE`; see [`SqlDialect::search_pattern`].
    pub fn case_insensitive_like(&self, column: &str, placeholder: &str) -> String {
        match self {
            SqlDialect::Postgres => format!("{column} ILIKE {placeholder} ESCAPE '\\'"),
            // MySQL treats backslash as an escape inside string literals
            SqlDialect::Mysql => format!("LOWER({column}) LIKE {placeholder} ESCAPE '\\\\'"),
            SqlDialect::Sqlite => format!("LOWER({column}) LIKE {placeholder} ESCAPE '\\'"),
        }
    }

    /// `%term%` pattern with LIKE metacharacters escaped
    pub fn search_pattern(&self, term: &str) -> String {
        let term = match self {
            SqlDialect::Postgres => term.to_string(),
            SqlDialect::Mysql | SqlDialect::Sqlite => term.to_lowercase(),
        };
        let mut pattern = String::with_capacity(term.len() + 2);
        pattern.push('%');
        for c in term.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    }
}

impl fmt::Display for SqlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SqlDialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(SqlDialect::Postgres),
            "mysql" => Ok(SqlDialect::Mysql),
            "sqlite" => Ok(SqlDialect::Sqlite),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}

/// Placeholder generator for a single statement
///
/// Every bound parameter in one statement must take its token from the same
/// generator so numbered placeholders line up with the parameter list.
#[derive(Debug, Clone)]
pub struct Placeholders {
    dialect: SqlDialect,
    issued: usize,
}

impl Placeholders {
    pub fn new(dialect: SqlDialect) -> Self {
        Self { dialect, issued: 0 }
    }

    /// Token for the next parameter
    pub fn bind(&mut self) -> String {
        self.issued += 1;
        match self.dialect {
            SqlDialect::Postgres => format!("${}", self.issued),
            SqlDialect::Mysql | SqlDialect::Sqlite => "?".to_string(),
        }
    }

    /// `n` comma-separated tokens
    pub fn bind_list(&mut self, n: usize) -> String {
        (0..n).map(|_| self.bind()).collect::<Vec<_>>().join(", ")
    }

    /// Number of tokens issued so far
    pub fn issued(&self) -> usize {
        self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dialect() {
        assert_eq!("postgresql".parse::<SqlDialect>().unwrap(), SqlDialect::Postgres);
        assert_eq!("MySQL".parse::<SqlDialect>().unwrap(), SqlDialect::Mysql);
        assert_eq!("sqlite".parse::<SqlDialect>().unwrap(), SqlDialect::Sqlite);
        assert!("oracle".parse::<SqlDialect>().is_err());
    }

    #[test]
    fn test_numbered_placeholders() {
        let mut ph = SqlDialect::Postgres.placeholders();
        assert_eq!(ph.bind(), "$1");
        assert_eq!(ph.bind_list(2), "$2, $3");
        assert_eq!(ph.issued(), 3);
    }

    #[test]
    fn test_wildcard_placeholders() {
        let mut ph = SqlDialect::Mysql.placeholders();
        assert_eq!(ph.bind_list(3), "?, ?, ?");
    }

    #[test]
    fn test_search_pattern_escapes_metacharacters() {
        assert_eq!(SqlDialect::Sqlite.search_pattern("50%_OFF"), "%50\\%\\_off%");
        assert_eq!(SqlDialect::Postgres.search_pattern("Timeout"), "%Timeout%");
        assert_eq!(SqlDialect::Sqlite.search_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn test_returning_support() {
        assert!(SqlDialect::Postgres.supports_returning());
        assert!(SqlDialect::Sqlite.supports_returning());
        assert!(!SqlDialect::Mysql.supports_returning());
    }
}
