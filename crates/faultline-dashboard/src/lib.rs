//! # Faultline Dashboard
//!
//! Dioxus components for browsing Faultline error logs, plus an error
//! boundary that reports render errors through the logger facade.
//!
//! ## Example
//!
//! ```rust,ignore
//! use dioxus::prelude::*;
//! use faultline_dashboard::{ErrorLogDashboard, LogErrorBoundary};
//!
//! fn Admin() -> Element {
//!     rsx! {
//!         LogErrorBoundary { name: "Admin",
//!             ErrorLogDashboard {
//!                 api_base: "http://localhost:8080/api/logs",
//!                 auto_refresh_secs: 30,
//!             }
//!         }
//!     }
//! }
//! ```

pub mod boundary;
pub mod client;
pub mod components;
pub mod format;
pub mod state;

pub use boundary::{
    BoundaryError, BoundaryState, LogErrorBoundary, forward_to_logger, report_boundary_error,
};
pub use client::{ClientError, LogsClient};
pub use components::{
    DEFAULT_PAGE_SIZE, ErrorLogDashboard, FilterBar, LevelBadge, LogDetail, LogRow, LogTable,
    Pagination, StatsBar,
};
pub use state::{QueryState, TableState};

/// Dashboard stylesheet, for hosts embedding the components
pub const DASHBOARD_CSS: &str = include_str!("../assets/dashboard.css");
