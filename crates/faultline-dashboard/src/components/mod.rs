//! Dashboard components
//!
//! [`ErrorLogDashboard`] owns all state and talks to the API; the other
//! components only render what they are given and report events upward.

use std::time::Duration;

use dioxus::prelude::*;
use faultline_core::{DeleteFilter, LogLevel, LogStats};

use crate::client::{ClientError, LogsClient};
use crate::state::{QueryState, TableState};

mod filter_bar;
mod log_detail;
mod log_table;
mod pagination;
mod stats_bar;

pub use filter_bar::FilterBar;
pub use log_detail::LogDetail;
pub use log_table::{LevelBadge, LogRow, LogTable};
pub use pagination::Pagination;
pub use stats_bar::StatsBar;

/// Rows per page unless the host asks otherwise
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Age threshold for the "Purge old" action
pub const PURGE_AFTER_DAYS: u32 = 30;

/// Full error log browser for one logs API
///
/// - `api_base`: mount point of the logs API, e.g. `http://localhost:8080/api/logs`
/// - `token`: bearer token, if the API requires one
/// - `auto_refresh_secs`: refetch on this interval when set
/// - `page_size`: rows per page
#[component]
pub fn ErrorLogDashboard(
    api_base: String,
    token: Option<String>,
    auto_refresh_secs: Option<u64>,
    #[props(default = DEFAULT_PAGE_SIZE)] page_size: u32,
) -> Element {
    let client = use_hook(|| LogsClient::new(api_base.clone()).with_token(token.clone()));

    let mut query = use_signal(|| QueryState::new(page_size));
    let mut table = use_signal(TableState::default);
    let mut stats = use_signal(|| None::<LogStats>);
    let mut reload = use_signal(|| 0u64);
    let mut stats_reload = use_signal(|| 0u64);
    let mut confirm_purge = use_signal(|| false);
    let mut notice = use_signal(|| None::<String>);

    // Refetch the current page whenever the query or the reload counter changes
    let list_client = client.clone();
    use_effect(move || {
        let options = query.read().to_options();
        let _generation = reload();
        let client = list_client.clone();
        let ticket = table.write().begin_load();
        spawn(async move {
            match client.list(&options).await {
                Ok(page) => {
                    table.write().finish_load(ticket, page);
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to load logs");
                    table.write().fail_load(ticket, e.to_string());
                }
            }
        });
    });

    let stats_client = client.clone();
    use_effect(move || {
        let _generation = (reload(), stats_reload());
        let client = stats_client.clone();
        spawn(async move {
            match client.stats().await {
                Ok(fresh) => stats.set(Some(fresh)),
                Err(e) => tracing::warn!(error = %e, "Failed to load log stats"),
            }
        });
    });

    use_future(move || async move {
        let Some(secs) = auto_refresh_secs.filter(|secs| *secs > 0) else {
            return;
        };
        loop {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            *reload.write() += 1;
        }
    });

    let delete_client = client.clone();
    let confirm_delete = move |_: ()| {
        let Some(id) = table.write().confirm_delete() else {
            return;
        };
        let client = delete_client.clone();
        spawn(async move {
            match client.delete(&id).await {
                // Already gone is as good as deleted
                Ok(()) | Err(ClientError::NotFound) => {
                    table.write().remove_entry(&id);
                    *stats_reload.write() += 1;
                }
                Err(e) => notice.set(Some(format!("Delete failed: {e}"))),
            }
        });
    };

    let purge_client = client.clone();
    let confirm_purge_action = move |_: ()| {
        confirm_purge.set(false);
        let mut filter = DeleteFilter::older_than_days(PURGE_AFTER_DAYS);
        if let Some(level) = query.read().level {
            filter = filter.with_level(level);
        }
        let client = purge_client.clone();
        spawn(async move {
            match client.delete_many(&filter).await {
                Ok(deleted) => {
                    notice.set(Some(format!("Deleted {deleted} old entries")));
                    *reload.write() += 1;
                }
                Err(e) => notice.set(Some(format!("Purge failed: {e}"))),
            }
        });
    };

    let request_delete = move |id: String| table.write().request_delete(id);
    let set_level = move |level: Option<LogLevel>| query.write().set_level(level);

    let source = client.base_url().to_string();
    let current_query = query.read().clone();
    let snapshot = table.read().clone();
    let total_pages = current_query.total_pages(snapshot.total);
    let selected_entry = snapshot.selected_entry().cloned();
    let purge_scope = match current_query.level {
        Some(level) => format!("{level} entries"),
        None => "entries".to_string(),
    };

    rsx! {
        div { class: "faultline-dashboard",
            header { class: "dashboard-header",
                h1 { "Error Logs" }
                span { class: "dashboard-source", "{source}" }
            }

            StatsBar {
                stats: stats(),
                active_level: current_query.level,
                on_level: set_level,
            }

            FilterBar {
                query: current_query.clone(),
                auto_refresh: auto_refresh_secs.is_some_and(|secs| secs > 0),
                on_level: set_level,
                on_search: move |search: String| query.write().set_search(search),
                on_user_id: move |user_id: String| query.write().set_user_id(user_id),
                on_clear: move |_| query.write().clear_filters(),
                on_refresh: move |_| *reload.write() += 1,
                on_purge: move |_| confirm_purge.set(true),
            }

            if let Some(message) = notice() {
                div { class: "notice",
                    span { "{message}" }
                    button { class: "btn btn-icon", onclick: move |_| notice.set(None), "✕" }
                }
            }

            if let Some(error) = snapshot.error.clone() {
                div { class: "error-banner", "Could not load logs: {error}" }
            }

            if snapshot.pending_delete.is_some() {
                ConfirmBar {
                    message: "Delete this log entry? This cannot be undone.",
                    confirm_label: "Delete",
                    on_confirm: confirm_delete,
                    on_cancel: move |_| table.write().cancel_delete(),
                }
            }

            if confirm_purge() {
                ConfirmBar {
                    message: "Delete all {purge_scope} older than {PURGE_AFTER_DAYS} days?",
                    confirm_label: "Purge",
                    on_confirm: confirm_purge_action,
                    on_cancel: move |_| confirm_purge.set(false),
                }
            }

            div { class: "dashboard-body",
                div { class: "table-pane",
                    LogTable {
                        logs: snapshot.logs.clone(),
                        selected: snapshot.selected.clone(),
                        pending_delete: snapshot.pending_delete.clone(),
                        loading: snapshot.loading,
                        on_select: move |id: String| table.write().toggle_selected(&id),
                        on_delete: request_delete,
                    }
                    Pagination {
                        page: current_query.page,
                        total_pages,
                        total: snapshot.total,
                        on_page: move |page: u32| {
                            let total = table.read().total;
                            query.write().go_to(page, total);
                        },
                    }
                }
                if let Some(entry) = selected_entry {
                    LogDetail {
                        entry,
                        on_close: move |_| table.write().selected = None,
                        on_delete: request_delete,
                    }
                }
            }
        }
    }
}

/// Inline confirmation prompt for destructive actions
#[component]
fn ConfirmBar(
    message: String,
    confirm_label: String,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "confirm-bar",
            span { class: "confirm-message", "{message}" }
            button {
                class: "btn btn-danger",
                onclick: move |_| on_confirm.call(()),
                "{confirm_label}"
            }
            button {
                class: "btn btn-secondary",
                onclick: move |_| on_cancel.call(()),
                "Cancel"
            }
        }
    }
}
