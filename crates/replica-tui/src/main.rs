mod app;
mod editor;
mod ui;

use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use replica_agent::GeminiBackend;
use replica_core::config::Config;
use replica_core::DraftBackend;
use tracing::info;

use crate::app::App;

// ── main ──────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Logs go to a file: stdout is owned by the terminal UI.
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "replica=info,replica_core=info,replica_agent=info".into()),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    info!(model = %config.model, "starting");

    let backend: Arc<dyn DraftBackend> = Arc::new(GeminiBackend::from_config(&config));
    App::new(backend).run().await
}
