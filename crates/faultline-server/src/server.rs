//! HTTP server for the logs API

use std::sync::Arc;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use faultline_core::LogAdapter;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{AllowAll, Authorize, BearerToken};
use crate::config::HttpSettings;
use crate::handlers::ApiState;
use crate::router::api_router;

/// HTTP server wrapping one storage adapter
pub struct LogServer {
    adapter: Arc<dyn LogAdapter>,
    authorize: Arc<dyn Authorize>,
    settings: HttpSettings,
}

impl LogServer {
    /// Create a server; requests need a bearer token iff `settings.api_token` is set
    pub fn new(adapter: Arc<dyn LogAdapter>, settings: HttpSettings) -> Self {
        let authorize: Arc<dyn Authorize> = match &settings.api_token {
            Some(token) => Arc::new(BearerToken::new(token.clone())),
            None => Arc::new(AllowAll),
        };
        Self {
            adapter,
            authorize,
            settings,
        }
    }

    /// Replace the authorization check
    pub fn with_authorize(mut self, authorize: impl Authorize) -> Self {
        self.authorize = Arc::new(authorize);
        self
    }

    /// The full application: logs API, health check, CORS and request tracing
    pub fn app(&self) -> Router {
        let state = ApiState {
            adapter: self.adapter.clone(),
            authorize: self.authorize.clone(),
        };

        api_router(state, &self.settings.base_path)
            .route("/-/healthy", get(handle_healthy))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    /// Run until SIGINT or SIGTERM
    pub async fn run(self) -> std::io::Result<()> {
        let app = self.app();
        let addr = self.settings.bind_address();

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!(
            addr = %listener.local_addr()?,
            base_path = %self.settings.base_path,
            auth = self.settings.api_token.is_some(),
            "Starting Faultline HTTP server"
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shut down gracefully");
        Ok(())
    }
}

async fn handle_healthy() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Listen for SIGTERM and SIGINT (Ctrl+C)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
