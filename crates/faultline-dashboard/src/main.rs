//! Faultline dashboard desktop binary
//!
//! Reads `FAULTLINE_API` (default `http://127.0.0.1:8080/api/logs`) and an
//! optional `FAULTLINE_TOKEN`, `FAULTLINE_REFRESH_SECS`.

use std::sync::OnceLock;

use dioxus::prelude::*;
use faultline_dashboard::{DASHBOARD_CSS, ErrorLogDashboard, LogErrorBoundary};

const DEFAULT_API: &str = "http://127.0.0.1:8080/api/logs";
const DEFAULT_REFRESH_SECS: u64 = 30;

/// Endpoint settings read before launch
static ENDPOINT: OnceLock<Endpoint> = OnceLock::new();

#[derive(Debug, Clone, PartialEq)]
struct Endpoint {
    api_base: String,
    token: Option<String>,
    refresh_secs: Option<u64>,
}

impl Endpoint {
    fn from_env() -> Self {
        let refresh_secs = match std::env::var("FAULTLINE_REFRESH_SECS") {
            Ok(value) => value.trim().parse().ok(),
            Err(_) => Some(DEFAULT_REFRESH_SECS),
        };
        Self {
            api_base: std::env::var("FAULTLINE_API").unwrap_or_else(|_| DEFAULT_API.to_string()),
            token: std::env::var("FAULTLINE_TOKEN").ok().filter(|t| !t.is_empty()),
            refresh_secs,
        }
    }
}

fn main() {
    if let Err(e) = faultline_logging::init_development() {
        eprintln!("Tracing already initialized: {e}");
    }

    let endpoint = ENDPOINT.get_or_init(Endpoint::from_env);
    tracing::info!(api = %endpoint.api_base, "Starting Faultline dashboard");

    LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(
                    dioxus::desktop::WindowBuilder::new()
                        .with_title("Faultline Error Logs")
                        .with_inner_size(dioxus::desktop::LogicalSize::new(1280.0, 820.0)),
                )
                .with_custom_head(format!(r#"<style>{DASHBOARD_CSS}</style>"#)),
        )
        .launch(App);
}

#[component]
fn App() -> Element {
    let endpoint = ENDPOINT.get_or_init(Endpoint::from_env).clone();

    rsx! {
        LogErrorBoundary { name: "Dashboard",
            ErrorLogDashboard {
                api_base: endpoint.api_base,
                token: endpoint.token,
                auto_refresh_secs: endpoint.refresh_secs,
            }
        }
    }
}
