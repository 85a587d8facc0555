//! Todo app entry point
//!
//! Loads the task store from the data directory and prints every screen.
//! Set `TODO_OUTPUT=json` for a machine-readable snapshot.

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_app::{AppConfig, AppSnapshot};
use todo_core::haptics::{Haptics, NoopHaptics, TracingHaptics};
use todo_core::storage::FileKeyValueStore;
use todo_core::task::TaskStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the rendered screens
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_app=info,todo_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env();

    let haptics: Arc<dyn Haptics> = if config.haptics {
        Arc::new(TracingHaptics)
    } else {
        Arc::new(NoopHaptics)
    };
    let storage = Arc::new(FileKeyValueStore::new(&config.data_dir));
    tracing::info!("Using data directory: {:?}", storage.dir());
    let store = TaskStore::load(storage, haptics).await;

    let snapshot = AppSnapshot::capture(&store).await;
    if config.json_output {
        let json = serde_json::to_string_pretty(&snapshot).context("Failed to encode snapshot")?;
        println!("{}", json);
    } else {
        print!("{}", snapshot.render_text());
    }

    Ok(())
}
