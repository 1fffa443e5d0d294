//! Display helpers for log rows

use chrono::{DateTime, Local, Utc};
use faultline_core::LogLevel;

/// Local wall-clock time, e.g. `2024-05-01 14:03:22`
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Short age such as `42s ago`, `5m ago`, `3h ago`, `2d ago`
pub fn format_age(time: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let secs = (*now - *time).num_seconds().max(0);
    match secs {
        0..=59 => format!("{secs}s ago"),
        60..=3_599 => format!("{}m ago", secs / 60),
        3_600..=86_399 => format!("{}h ago", secs / 3_600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

/// First line of `text`, cut to `max_chars` with an ellipsis
pub fn truncate(text: &str, max_chars: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() <= max_chars && line.len() == text.len() {
        return line.to_string();
    }
    let cut: String = line.chars().take(max_chars).collect();
    format!("{cut}…")
}

pub fn level_class(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "level-badge level-error",
        LogLevel::Warn => "level-badge level-warn",
        LogLevel::Info => "level-badge level-info",
        LogLevel::Debug => "level-badge level-debug",
    }
}
