//! The log table: one row per entry

use chrono::Utc;
use dioxus::prelude::*;
use faultline_core::{LogEntry, LogLevel};

use crate::format::{format_age, format_time, level_class, truncate};

const MESSAGE_PREVIEW_CHARS: usize = 120;

#[component]
pub fn LevelBadge(level: LogLevel) -> Element {
    rsx! {
        span { class: level_class(level), "{level}" }
    }
}

#[component]
pub fn LogTable(
    logs: Vec<LogEntry>,
    selected: Option<String>,
    pending_delete: Option<String>,
    loading: bool,
    on_select: EventHandler<String>,
    on_delete: EventHandler<String>,
) -> Element {
    if logs.is_empty() {
        return rsx! {
            div { class: "log-table-empty",
                if loading { "Loading…" } else { "No log entries match these filters" }
            }
        };
    }

    let rows: Vec<(LogEntry, bool, bool)> = logs
        .into_iter()
        .map(|entry| {
            let is_selected = selected.as_deref() == Some(entry.id.as_str());
            let is_pending = pending_delete.as_deref() == Some(entry.id.as_str());
            (entry, is_selected, is_pending)
        })
        .collect();

    rsx! {
        table { class: if loading { "log-table loading" } else { "log-table" },
            thead {
                tr {
                    th { "Level" }
                    th { "Message" }
                    th { "User" }
                    th { "Path" }
                    th { "When" }
                    th {}
                }
            }
            tbody {
                for (entry, is_selected, is_pending) in rows {
                    LogRow {
                        key: "{entry.id}",
                        selected: is_selected,
                        pending_delete: is_pending,
                        entry,
                        on_select,
                        on_delete,
                    }
                }
            }
        }
    }
}

#[component]
pub fn LogRow(
    entry: LogEntry,
    selected: bool,
    pending_delete: bool,
    on_select: EventHandler<String>,
    on_delete: EventHandler<String>,
) -> Element {
    let message = truncate(&entry.message, MESSAGE_PREVIEW_CHARS);
    let user = entry
        .user_email
        .clone()
        .or_else(|| entry.user_id.clone())
        .unwrap_or_else(|| "anonymous".to_string());
    let path = match (&entry.method, &entry.path) {
        (Some(method), Some(path)) => format!("{method} {path}"),
        (None, Some(path)) => path.clone(),
        _ => String::new(),
    };
    let age = format_age(&entry.created_at, &Utc::now());
    let time = format_time(&entry.created_at);
    let select_id = entry.id.clone();
    let delete_id = entry.id.clone();

    let mut class = String::from("log-row");
    if selected {
        class.push_str(" selected");
    }
    if pending_delete {
        class.push_str(" pending-delete");
    }

    rsx! {
        tr {
            class: "{class}",
            onclick: move |_| on_select.call(select_id.clone()),
            td { LevelBadge { level: entry.level } }
            td { class: "log-message", title: "{entry.message}", "{message}" }
            td { class: "log-user", "{user}" }
            td { class: "log-path", "{path}" }
            td { class: "log-time", title: "{time}", "{age}" }
            td {
                button {
                    class: "btn btn-icon btn-danger",
                    title: "Delete entry",
                    onclick: move |evt: MouseEvent| {
                        evt.stop_propagation();
                        on_delete.call(delete_id.clone());
                    },
                    "✕"
                }
            }
        }
    }
}
