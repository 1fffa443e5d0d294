//! Faultline HTTP server binary entry point

use anyhow::Context;
use clap::Parser;

use faultline_logging::FaultlineSubscriberBuilder;
use faultline_server::{CliArgs, LogServer, ServerSettings, open_adapter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let settings = ServerSettings::load(&args)?;

    // Keep the guard alive so buffered file output is flushed on exit
    let _guard = FaultlineSubscriberBuilder::new()
        .with_config(settings.logging.clone())
        .try_init()?;

    tracing::info!(backend = ?settings.storage.backend, "Opening log storage");
    let adapter = open_adapter(&settings.storage)
        .await
        .context("failed to open log storage")?;

    LogServer::new(adapter, settings.server)
        .run()
        .await
        .context("HTTP server failed")?;
    Ok(())
}
