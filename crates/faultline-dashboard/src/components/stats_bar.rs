//! Totals across the top of the dashboard

use dioxus::prelude::*;
use faultline_core::{LogLevel, LogStats};

/// Total, per-level and last-24-hours counts
///
/// Clicking a level card filters the table to that level.
#[component]
pub fn StatsBar(
    stats: Option<LogStats>,
    active_level: Option<LogLevel>,
    on_level: EventHandler<Option<LogLevel>>,
) -> Element {
    let Some(stats) = stats else {
        return rsx! {
            div { class: "stats-bar stats-loading", "Loading stats…" }
        };
    };

    let levels: Vec<(LogLevel, u64)> = LogLevel::ALL
        .iter()
        .map(|level| (*level, stats.by_level.get(*level)))
        .collect();

    rsx! {
        div { class: "stats-bar",
            div {
                class: if active_level.is_none() { "stat-card active" } else { "stat-card" },
                onclick: move |_| on_level.call(None),
                span { class: "stat-value", "{stats.total}" }
                span { class: "stat-label", "Total" }
            }
            for (level, count) in levels {
                div {
                    key: "{level}",
                    class: if active_level == Some(level) {
                        format!("stat-card stat-{level} active")
                    } else {
                        format!("stat-card stat-{level}")
                    },
                    onclick: move |_| on_level.call(Some(level)),
                    span { class: "stat-value", "{count}" }
                    span { class: "stat-label", "{level}" }
                }
            }
            div { class: "stat-card stat-recent",
                span { class: "stat-value", "{stats.last_24_hours}" }
                span { class: "stat-label", "Last 24h" }
            }
        }
    }
}
