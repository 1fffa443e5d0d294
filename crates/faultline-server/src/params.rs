//! Lenient parsing of query strings and request bodies
//!
//! List values that do not parse fall back to their defaults instead of
//! failing the request. Delete filters only ever narrow: an unreadable field
//! empties the whole filter.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use faultline_core::{
    DEFAULT_PAGE_LIMIT, DeleteFilter, LogLevel, MAX_PAGE_LIMIT, OrderBy, QueryOptions, SortOrder,
};
use serde::Deserialize;

/// Raw list query parameters
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub level: Option<String>,
    pub user_id: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub order_by: Option<String>,
    pub order: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ListParams {
    pub fn into_options(self) -> QueryOptions {
        let page = self
            .page
            .and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(1)
            .max(1);
        let limit = self
            .limit
            .and_then(|l| l.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(MAX_PAGE_LIMIT);

        let order_by = match self.order_by.as_deref().map(str::trim) {
            Some("level") => OrderBy::Level,
            _ => OrderBy::CreatedAt,
        };
        let order = match self.order.as_deref().map(str::trim) {
            Some(o) if o.eq_ignore_ascii_case("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        };

        QueryOptions {
            page,
            limit,
            level: self.level.and_then(|l| l.parse::<LogLevel>().ok()),
            user_id: non_empty(self.user_id),
            search: non_empty(self.search),
            start_date: self.start_date.as_deref().and_then(|d| parse_date(d, false)),
            end_date: self.end_date.as_deref().and_then(|d| parse_date(d, true)),
            order_by,
            order,
        }
    }
}

/// Delete-many body; any unreadable body or field is treated as empty
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteBody {
    #[serde(default)]
    pub before: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

impl DeleteBody {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// Both fields must parse when present; dropping one would widen the delete
    pub fn into_filter(self) -> DeleteFilter {
        let before = self.before.as_deref().map(|d| parse_date(d, false));
        let level = self.level.as_deref().map(|l| l.parse::<LogLevel>().ok());
        match (before, level) {
            (Some(None), _) | (_, Some(None)) => DeleteFilter::default(),
            (before, level) => DeleteFilter {
                before: before.flatten(),
                level: level.flatten(),
            },
        }
    }
}

/// Parse RFC 3339 or a bare `YYYY-MM-DD`
///
/// A bare date means the start of that day (UTC), or its last microsecond
/// when `end_of_day` is set, so an end date includes the whole day.
pub fn parse_date(value: &str, end_of_day: bool) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    // A '+' offset arrives as a space when the client did not encode it
    let candidates = [value.to_string(), value.replace(' ', "+")];
    for candidate in &candidates {
        if let Ok(t) = DateTime::parse_from_rfc3339(candidate) {
            return Some(t.with_timezone(&Utc));
        }
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    let time = if end_of_day {
        NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)?
    } else {
        NaiveTime::MIN
    };
    Some(date.and_time(time).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let mut p = ListParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "page" => p.page = value,
                "limit" => p.limit = value,
                "level" => p.level = value,
                "userId" => p.user_id = value,
                "search" => p.search = value,
                "startDate" => p.start_date = value,
                "endDate" => p.end_date = value,
                "orderBy" => p.order_by = value,
                "order" => p.order = value,
                _ => {}
            }
        }
        p
    }

    #[test]
    fn test_defaults() {
        let options = ListParams::default().into_options();
        assert_eq!(options, QueryOptions::default());
    }

    #[test]
    fn test_limit_is_capped() {
        let options = params(&[("limit", "500")]).into_options();
        assert_eq!(options.limit, MAX_PAGE_LIMIT);

        let options = params(&[("limit", "0")]).into_options();
        assert!(options.count_only());
    }

    #[test]
    fn test_bad_values_fall_back() {
        let options = params(&[
            ("page", "-3"),
            ("limit", "lots"),
            ("level", "fatal"),
            ("startDate", "yesterday"),
            ("search", "   "),
        ])
        .into_options();

        assert_eq!(options.page, 1);
        assert_eq!(options.limit, DEFAULT_PAGE_LIMIT);
        assert!(options.level.is_none());
        assert!(options.start_date.is_none());
        assert!(options.search.is_none());
    }

    #[test]
    fn test_filters_and_order() {
        let options = params(&[
            ("page", "2"),
            ("level", "WARN"),
            ("userId", "u1"),
            ("orderBy", "level"),
            ("order", "asc"),
        ])
        .into_options();

        assert_eq!(options.page, 2);
        assert_eq!(options.level, Some(LogLevel::Warn));
        assert_eq!(options.user_id.as_deref(), Some("u1"));
        assert_eq!(options.order_by, OrderBy::Level);
        assert_eq!(options.order, SortOrder::Asc);
    }

    #[test]
    fn test_parse_date_forms() {
        let start = parse_date("2024-05-01", false).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-05-01T00:00:00+00:00");

        let end = parse_date("2024-05-01", true).unwrap();
        assert_eq!(end.timestamp_subsec_micros(), 999_999);

        let offset = parse_date("2024-05-01T12:00:00 02:00", false).unwrap();
        assert_eq!(offset.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_delete_body_is_lenient() {
        assert!(DeleteBody::from_bytes(b"").into_filter().is_empty());
        assert!(DeleteBody::from_bytes(b"{not json").into_filter().is_empty());

        let filter =
            DeleteBody::from_bytes(br#"{"before":"2024-01-01","level":"debug"}"#).into_filter();
        assert_eq!(filter.level, Some(LogLevel::Debug));
        assert!(filter.before.is_some());

        let filter = DeleteBody::from_bytes(br#"{"level":"warn"}"#).into_filter();
        assert_eq!(filter, DeleteFilter::default().with_level(LogLevel::Warn));
    }

    #[test]
    fn test_unreadable_delete_field_empties_filter() {
        let filter =
            DeleteBody::from_bytes(br#"{"before":"01/01/2000","level":"debug"}"#).into_filter();
        assert!(filter.is_empty());

        let filter =
            DeleteBody::from_bytes(br#"{"before":"2024-01-01","level":"fatal"}"#).into_filter();
        assert!(filter.is_empty());

        let filter = DeleteBody::from_bytes(br#"{"before":"","level":"info"}"#).into_filter();
        assert!(filter.is_empty());
    }
}
