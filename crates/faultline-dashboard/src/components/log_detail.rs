//! Side panel with every field of the selected entry

use dioxus::prelude::*;
use faultline_core::LogEntry;

use super::log_table::LevelBadge;
use crate::format::format_time;

#[component]
pub fn LogDetail(
    entry: LogEntry,
    on_close: EventHandler<()>,
    on_delete: EventHandler<String>,
) -> Element {
    let fields: Vec<(&'static str, String)> = [
        ("ID", Some(entry.id.clone())),
        ("Time", Some(format_time(&entry.created_at))),
        ("User ID", entry.user_id.clone()),
        ("Email", entry.user_email.clone()),
        ("Name", entry.user_name.clone()),
        ("Method", entry.method.clone()),
        ("Path", entry.path.clone()),
        ("IP", entry.ip.clone()),
        ("User agent", entry.user_agent.clone()),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.map(|v| (label, v)))
    .collect();

    let metadata = entry
        .metadata
        .as_ref()
        .and_then(|m| serde_json::to_string_pretty(m).ok());
    let delete_id = entry.id.clone();

    rsx! {
        aside { class: "log-detail",
            div { class: "log-detail-header",
                LevelBadge { level: entry.level }
                div { class: "log-detail-actions",
                    button {
                        class: "btn btn-danger",
                        onclick: move |_| on_delete.call(delete_id.clone()),
                        "Delete"
                    }
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| on_close.call(()),
                        "Close"
                    }
                }
            }
            p { class: "log-detail-message", "{entry.message}" }
            dl { class: "log-detail-fields",
                for (label, value) in fields {
                    dt { "{label}" }
                    dd { "{value}" }
                }
            }
            if let Some(stack) = &entry.stack {
                h4 { "Stack" }
                pre { class: "log-detail-stack", "{stack}" }
            }
            if let Some(metadata) = metadata {
                h4 { "Metadata" }
                pre { class: "log-detail-metadata", "{metadata}" }
            }
        }
    }
}
