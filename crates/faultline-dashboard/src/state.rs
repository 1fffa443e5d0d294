//! Client-side state for the log table
//!
//! Kept free of any UI types so the transitions can be tested directly.

use faultline_core::{DEFAULT_PAGE_LIMIT, LogEntry, LogLevel, LogPage, QueryOptions};

/// Filters and page position for the list request
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub page: u32,
    pub limit: u32,
    pub level: Option<LogLevel>,
    pub search: String,
    pub user_id: String,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_LIMIT)
    }
}

impl QueryState {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            level: None,
            search: String::new(),
            user_id: String::new(),
        }
    }

    // Every filter change goes back to the first page

    pub fn set_level(&mut self, level: Option<LogLevel>) {
        self.level = level;
        self.page = 1;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_user_id(&mut self, user_id: impl Into<String>) {
        self.user_id = user_id.into();
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.level = None;
        self.search.clear();
        self.user_id.clear();
        self.page = 1;
    }

    pub fn has_filters(&self) -> bool {
        self.level.is_some() || !self.search.trim().is_empty() || !self.user_id.trim().is_empty()
    }

    /// Number of pages needed for `total` rows (at least one)
    pub fn total_pages(&self, total: u64) -> u32 {
        let pages = total.div_ceil(u64::from(self.limit)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Move to `page`, clamped to `1..=total_pages`
    pub fn go_to(&mut self, page: u32, total: u64) {
        self.page = page.clamp(1, self.total_pages(total));
    }

    pub fn has_next(&self, total: u64) -> bool {
        self.page < self.total_pages(total)
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn to_options(&self) -> QueryOptions {
        let mut options = QueryOptions::new()
            .with_page(self.page)
            .with_limit(self.limit);
        options.level = self.level;
        let search = self.search.trim();
        if !search.is_empty() {
            options.search = Some(search.to_string());
        }
        let user_id = self.user_id.trim();
        if !user_id.is_empty() {
            options.user_id = Some(user_id.to_string());
        }
        options
    }
}

/// Rows currently shown plus selection, pending delete and load status
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableState {
    pub logs: Vec<LogEntry>,
    pub total: u64,
    pub selected: Option<String>,
    pub pending_delete: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    generation: u64,
}

impl TableState {
    /// Mark a fetch as started; the returned ticket must accompany its result
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    /// Apply a fetched page unless a newer fetch has started since
    pub fn finish_load(&mut self, ticket: u64, page: LogPage) -> bool {
        if ticket != self.generation {
            return false;
        }
        self.loading = false;
        self.error = None;
        self.logs = page.logs;
        self.total = page.total;
        if let Some(selected) = &self.selected {
            if !self.logs.iter().any(|entry| &entry.id == selected) {
                self.selected = None;
            }
        }
        true
    }

    pub fn fail_load(&mut self, ticket: u64, message: impl Into<String>) -> bool {
        if ticket != self.generation {
            return false;
        }
        self.loading = false;
        self.error = Some(message.into());
        true
    }

    /// Select a row, or clear the selection if it is already selected
    pub fn toggle_selected(&mut self, id: &str) {
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        } else {
            self.selected = Some(id.to_string());
        }
    }

    pub fn selected_entry(&self) -> Option<&LogEntry> {
        let id = self.selected.as_deref()?;
        self.logs.iter().find(|entry| entry.id == id)
    }

    /// Ask for confirmation before deleting `id`
    pub fn request_delete(&mut self, id: impl Into<String>) {
        self.pending_delete = Some(id.into());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Take the confirmed id; `None` if nothing was pending
    pub fn confirm_delete(&mut self) -> Option<String> {
        self.pending_delete.take()
    }

    /// Drop a deleted row locally without refetching
    pub fn remove_entry(&mut self, id: &str) -> bool {
        let before = self.logs.len();
        self.logs.retain(|entry| entry.id != id);
        let removed = self.logs.len() != before;
        if removed {
            self.total = self.total.saturating_sub(1);
        }
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        removed
    }
}
