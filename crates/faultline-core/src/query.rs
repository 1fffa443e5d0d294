//! Query and delete options shared by every storage adapter
//!
//! Backends that cannot push filtering down to a query engine (the in-memory
//! and redb adapters) use [`QueryOptions::matches`] and
//! [`QueryOptions::compare`] directly, so every adapter agrees on the same
//! filter and ordering semantics as the SQL adapter.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::entry::LogEntry;
use crate::level::LogLevel;

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Largest page size the HTTP layer will serve
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Column used for ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderBy {
    #[default]
    CreatedAt,
    Level,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Options for [`LogAdapter::find_many`](crate::LogAdapter::find_many)
///
/// `limit == 0` asks for the matching count only; no rows are returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryOptions {
    pub page: u32,
    pub limit: u32,
    pub level: Option<LogLevel>,
    pub user_id: Option<String>,
    pub search: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub order_by: OrderBy,
    pub order: SortOrder,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
            level: None,
            user_id: None,
            search: None,
            start_date: None,
            end_date: None,
            order_by: OrderBy::default(),
            order: SortOrder::default(),
        }
    }
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count-only query with the same filters
    pub fn count_of(&self) -> Self {
        Self {
            page: 1,
            limit: 0,
            ..self.clone()
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_date_range(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_order(mut self, order_by: OrderBy, order: SortOrder) -> Self {
        self.order_by = order_by;
        self.order = order;
        self
    }

    /// Number of matching rows to skip; may exceed the row count
    pub fn offset(&self) -> u64 {
        u64::from(self.page.max(1) - 1) * u64::from(self.limit)
    }

    pub fn count_only(&self) -> bool {
        self.limit == 0
    }

    /// Non-empty search term, if any
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Whether an entry passes every filter (pagination ignored)
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(level) = self.level {
            if entry.level != level {
                return false;
            }
        }
        if let Some(user_id) = &self.user_id {
            if entry.user_id.as_deref() != Some(user_id.as_str()) {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if entry.created_at < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if entry.created_at > end {
                return false;
            }
        }
        if let Some(term) = self.search_term() {
            let needle = term.to_lowercase();
            let hit = |field: Option<&str>| {
                field
                    .map(|value| value.to_lowercase().contains(&needle))
                    .unwrap_or(false)
            };
            if !(hit(Some(entry.message.as_str()))
                || hit(entry.stack.as_deref())
                || hit(entry.path.as_deref())
                || hit(entry.user_email.as_deref()))
            {
                return false;
            }
        }
        true
    }

    /// Ordering of two entries under this query, `id` as tie-breaker
    pub fn compare(&self, a: &LogEntry, b: &LogEntry) -> Ordering {
        let primary = match self.order_by {
            OrderBy::CreatedAt => a.created_at.cmp(&b.created_at),
            OrderBy::Level => a.level.as_str().cmp(b.level.as_str()),
        };
        self.order.apply(primary.then_with(|| a.id.cmp(&b.id)))
    }

    /// Filter, sort and paginate an in-memory set of entries
    pub fn apply<I>(&self, entries: I) -> LogPage
    where
        I: IntoIterator<Item = LogEntry>,
    {
        let mut matching: Vec<LogEntry> = entries.into_iter().filter(|e| self.matches(e)).collect();
        let total = matching.len() as u64;
        if self.count_only() {
            return LogPage::new(Vec::new(), total);
        }

        matching.sort_by(|a, b| self.compare(a, b));
        let offset = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let logs = matching
            .into_iter()
            .skip(offset)
            .take(self.limit as usize)
            .collect();
        LogPage::new(logs, total)
    }
}

/// One page of results plus the total matching count
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LogPage {
    pub logs: Vec<LogEntry>,
    /// Count matching the filters, independent of `page` and `limit`
    pub total: u64,
}

impl LogPage {
    pub fn new(logs: Vec<LogEntry>, total: u64) -> Self {
        Self { logs, total }
    }
}

/// Filter for [`LogAdapter::delete_many`](crate::LogAdapter::delete_many)
///
/// An empty filter deletes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteFilter {
    /// Delete entries created strictly before this instant
    pub before: Option<DateTime<Utc>>,
    pub level: Option<LogLevel>,
}

impl DeleteFilter {
    pub fn before(before: DateTime<Utc>) -> Self {
        Self {
            before: Some(before),
            level: None,
        }
    }

    /// Entries older than `days` days from now
    pub fn older_than_days(days: u32) -> Self {
        Self::before(Utc::now() - Duration::days(i64::from(days)))
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.before.is_none() && self.level.is_none()
    }

    /// Whether an entry would be deleted; always false for an empty filter
    pub fn matches(&self, entry: &LogEntry) -> bool {
        self.covers(entry.level, entry.created_at)
    }

    /// [`matches`](Self::matches) on the two fields a filter reads
    pub fn covers(&self, level: LogLevel, created_at: DateTime<Utc>) -> bool {
        if self.is_empty() {
            return false;
        }
        self.before.is_none_or(|before| created_at < before)
            && self.level.is_none_or(|wanted| level == wanted)
    }
}
