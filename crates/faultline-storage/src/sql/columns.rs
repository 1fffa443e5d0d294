//! Mapping between entry fields and table columns
//!
//! Entries use camelCase field names on the wire; tables use snake_case
//! columns. Every write goes through [`entry_to_params`] and every read
//! through [`row_to_entry`].

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use faultline_core::{AdapterError, LogEntry, LogLevel};

use super::value::SqlValue;

/// Entry fields in column order
pub const ENTRY_FIELDS: [&str; 13] = [
    "id",
    "level",
    "message",
    "stack",
    "userId",
    "userEmail",
    "userName",
    "path",
    "method",
    "userAgent",
    "ip",
    "metadata",
    "createdAt",
];

/// `userAgent` -> `user_agent`
pub fn to_snake_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for c in field.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `user_agent` -> `userAgent`
pub fn to_camel_case(column: &str) -> String {
    let mut out = String::with_capacity(column.len());
    let mut upper_next = false;
    for c in column.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

/// Comma-separated column list in [`ENTRY_FIELDS`] order
pub fn column_list() -> String {
    ENTRY_FIELDS
        .iter()
        .map(|field| to_snake_case(field))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Column name and bound value for every field of `entry`
pub fn entry_to_params(entry: &LogEntry) -> Vec<(String, SqlValue)> {
    let values = [
        SqlValue::from(entry.id.as_str()),
        SqlValue::from(entry.level.as_str()),
        SqlValue::from(entry.message.as_str()),
        SqlValue::from(entry.stack.clone()),
        SqlValue::from(entry.user_id.clone()),
        SqlValue::from(entry.user_email.clone()),
        SqlValue::from(entry.user_name.clone()),
        SqlValue::from(entry.path.clone()),
        SqlValue::from(entry.method.clone()),
        SqlValue::from(entry.user_agent.clone()),
        SqlValue::from(entry.ip.clone()),
        entry
            .metadata
            .clone()
            .map_or(SqlValue::Null, SqlValue::Json),
        SqlValue::Timestamp(entry.created_at),
    ];

    ENTRY_FIELDS
        .iter()
        .zip(values)
        .map(|(field, value)| (to_snake_case(field), value))
        .collect()
}

/// Row values keyed by camelCase field name
struct Fields<'a> {
    values: HashMap<String, &'a SqlValue>,
}

impl<'a> Fields<'a> {
    fn new(row: &'a super::SqlRow) -> Self {
        Self {
            values: row
                .iter()
                .map(|(column, value)| (to_camel_case(column), value))
                .collect(),
        }
    }

    fn optional_text(&self, field: &str) -> Option<String> {
        self.values.get(field).and_then(|value| value.to_text())
    }

    fn required_text(&self, field: &str) -> Result<String, AdapterError> {
        self.optional_text(field)
            .ok_or_else(|| {
                AdapterError::invalid_row(format!("missing column {}", to_snake_case(field)))
            })
    }

    fn metadata(&self) -> Result<Option<serde_json::Value>, AdapterError> {
        match self.values.get("metadata") {
            None | Some(SqlValue::Null) => Ok(None),
            Some(SqlValue::Json(value)) => Ok(Some(value.clone())),
            Some(SqlValue::Text(text)) => Ok(Some(serde_json::from_str(text)?)),
            Some(other) => Err(AdapterError::invalid_row(format!(
                "unexpected metadata value {other:?}"
            ))),
        }
    }

    fn created_at(&self) -> Result<DateTime<Utc>, AdapterError> {
        match self.values.get("createdAt") {
            Some(SqlValue::Timestamp(t)) => Ok(*t),
            Some(SqlValue::Text(text)) => parse_timestamp(text),
            _ => Err(AdapterError::invalid_row("missing column created_at")),
        }
    }
}

/// Parse RFC 3339 or `YYYY-MM-DD HH:MM:SS[.f]` (assumed UTC)
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, AdapterError> {
    let text = text.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| AdapterError::invalid_row(format!("bad timestamp {text:?}: {e}")))
}

/// Build an entry from a row, mapping column names back to field names
pub fn row_to_entry(row: &super::SqlRow) -> Result<LogEntry, AdapterError> {
    let fields = Fields::new(row);

    let level_text = fields.required_text("level")?;
    let level: LogLevel = level_text
        .parse()
        .map_err(|e| AdapterError::invalid_row(format!("{e}")))?;

    Ok(LogEntry {
        id: fields.required_text("id")?,
        level,
        message: fields.required_text("message")?,
        stack: fields.optional_text("stack"),
        user_id: fields.optional_text("userId"),
        user_email: fields.optional_text("userEmail"),
        user_name: fields.optional_text("userName"),
        path: fields.optional_text("path"),
        method: fields.optional_text("method"),
        user_agent: fields.optional_text("userAgent"),
        ip: fields.optional_text("ip"),
        metadata: fields.metadata()?,
        created_at: fields.created_at()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::SqlRow;
    use faultline_core::NewLogEntry;
    use serde_json::json;

    #[test]
    fn test_case_conversion() {
        assert_eq!(to_snake_case("userAgent"), "user_agent");
        assert_eq!(to_snake_case("createdAt"), "created_at");
        assert_eq!(to_snake_case("id"), "id");
        assert_eq!(to_camel_case("user_agent"), "userAgent");
        assert_eq!(to_camel_case("CREATED_AT"), "createdAt");
        assert_eq!(to_camel_case("message"), "message");
    }

    #[test]
    fn test_column_list_is_snake_case() {
        let list = column_list();
        assert!(list.starts_with("id, level, message, stack, user_id"));
        assert!(list.ends_with("metadata, created_at"));
    }

    #[test]
    fn test_params_then_row_rebuilds_entry() {
        let entry = NewLogEntry::new(LogLevel::Warn, "slow")
            .with_user("u1", Some("a@example.com".into()), None)
            .with_metadata(json!({"ms": 900}))
            .into_entry("id-1".to_string(), faultline_core::timestamp_now());

        let params = entry_to_params(&entry);
        assert_eq!(params[4].0, "user_id");
        assert_eq!(params[6].1, SqlValue::Null);

        // A text-only store hands back strings for every column
        let row: SqlRow = params
            .into_iter()
            .map(|(column, value)| {
                let value = value.to_text().map_or(SqlValue::Null, SqlValue::Text);
                (column, value)
            })
            .collect();
        assert_eq!(row_to_entry(&row).unwrap(), entry);
    }

    #[test]
    fn test_row_missing_required_column() {
        let row = SqlRow::new().with("id", "x").with("level", "error");
        let err = row_to_entry(&row).unwrap_err();
        assert!(matches!(err, AdapterError::InvalidRow(_)));
    }

    #[test]
    fn test_parse_space_separated_timestamp() {
        let t = parse_timestamp("2024-05-01 12:00:00.250").unwrap();
        assert_eq!(t.timestamp_subsec_millis(), 250);
    }
}
