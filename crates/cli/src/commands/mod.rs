//! CLI command implementations.

pub mod generate;
pub mod history;
pub mod init;

use copymill_config::AppConfig;
use copymill_core::HistoryStore;
use copymill_history::{InMemoryHistoryStore, SqliteHistoryStore};
use std::sync::Arc;

/// Open the history store named by the config.
pub async fn open_history_store(
    config: &AppConfig,
) -> Result<Arc<dyn HistoryStore>, Box<dyn std::error::Error>> {
    match config.history.backend.as_str() {
        "in_memory" => Ok(Arc::new(InMemoryHistoryStore::new())),
        _ => {
            if let Some(parent) = std::path::Path::new(&config.history.path).parent() {
                std::fs::create_dir_all(parent)?;
            }
            let path = format!("sqlite://{}", config.history.path);
            let store = SqliteHistoryStore::new(&path)
                .await
                .map_err(|e| format!("Failed to open history store: {e}"))?;
            Ok(Arc::new(store))
        }
    }
}
