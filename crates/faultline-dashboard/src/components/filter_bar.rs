//! Level, search and user filters above the table

use dioxus::prelude::*;
use faultline_core::LogLevel;

use crate::state::QueryState;

#[component]
pub fn FilterBar(
    query: QueryState,
    auto_refresh: bool,
    on_level: EventHandler<Option<LogLevel>>,
    on_search: EventHandler<String>,
    on_user_id: EventHandler<String>,
    on_clear: EventHandler<()>,
    on_refresh: EventHandler<()>,
    on_purge: EventHandler<()>,
) -> Element {
    let selected_level = query.level.map(|l| l.as_str()).unwrap_or("");

    rsx! {
        div { class: "filter-bar",
            select {
                class: "filter-level",
                value: "{selected_level}",
                onchange: move |evt: FormEvent| {
                    on_level.call(evt.value().parse::<LogLevel>().ok());
                },
                option { value: "", "All levels" }
                for level in LogLevel::ALL {
                    option { key: "{level}", value: "{level}", "{level}" }
                }
            }
            input {
                class: "filter-search",
                r#type: "search",
                placeholder: "Search message or stack…",
                value: "{query.search}",
                oninput: move |evt: FormEvent| on_search.call(evt.value()),
            }
            input {
                class: "filter-user",
                r#type: "text",
                placeholder: "User id",
                value: "{query.user_id}",
                oninput: move |evt: FormEvent| on_user_id.call(evt.value()),
            }
            button {
                class: "btn btn-secondary",
                disabled: !query.has_filters(),
                onclick: move |_| on_clear.call(()),
                "Clear"
            }
            div { class: "filter-actions",
                if auto_refresh {
                    span { class: "auto-refresh-indicator", title: "Auto-refresh is on", "●" }
                }
                button {
                    class: "btn btn-secondary",
                    onclick: move |_| on_refresh.call(()),
                    "Refresh"
                }
                button {
                    class: "btn btn-danger",
                    title: "Delete entries older than 30 days",
                    onclick: move |_| on_purge.call(()),
                    "Purge old"
                }
            }
        }
    }
}
