//! HistoryStore trait — persistence of completed runs.
//!
//! Records are immutable once saved, except for deletion. The store is
//! an explicit handle injected where it is needed, opened once at
//! process start — never a process-wide singleton.

use crate::error::HistoryError;
use crate::state::{Channel, PipelineState};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fields persisted for one completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContentRecord {
    pub business_name: String,
    pub target_customer: String,
    pub channel: Channel,
    pub tone: String,
    pub strategy: String,
    pub final_content: String,
    pub trend_docs: Vec<String>,
    pub best_practice_docs: Vec<String>,
}

impl NewContentRecord {
    /// Build the save payload from a completed pipeline state.
    ///
    /// Call only after the run finished; an incomplete state saves an
    /// empty `final_content`, which the store rejects.
    pub fn from_state(state: &PipelineState) -> Self {
        Self {
            business_name: state.business_name.clone(),
            target_customer: state.target_customer.clone(),
            channel: state.channel,
            tone: state.tone.clone(),
            strategy: state.strategy.clone().unwrap_or_default(),
            final_content: state.final_content.clone().unwrap_or_default(),
            trend_docs: state.trend_docs.clone(),
            best_practice_docs: state.best_practice_docs.clone(),
        }
    }
}

/// A saved run, as returned by queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: i64,
    pub business_name: String,
    pub target_customer: String,
    pub channel: Channel,
    pub tone: String,
    pub created_at: DateTime<Utc>,
    pub strategy: String,
    pub final_content: String,
    pub trend_docs: Vec<String>,
    pub best_practice_docs: Vec<String>,
}

/// The record store contract.
///
/// Implementations: SQLite (production), in-memory (tests).
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "in_memory").
    fn name(&self) -> &str;

    /// Persist a completed run. Returns the new record's id.
    async fn save(&self, record: NewContentRecord) -> std::result::Result<i64, HistoryError>;

    /// List saved runs, newest first.
    async fn list_recent(
        &self,
        limit: usize,
    ) -> std::result::Result<Vec<ContentRecord>, HistoryError>;

    /// Fetch one record by id.
    async fn find_by_id(
        &self,
        id: i64,
    ) -> std::result::Result<Option<ContentRecord>, HistoryError>;

    /// Case-insensitive substring search over business names, newest first.
    async fn search_by_business_name(
        &self,
        substring: &str,
    ) -> std::result::Result<Vec<ContentRecord>, HistoryError>;

    /// Delete a record. Returns false (not an error) when the id is absent.
    async fn delete(&self, id: i64) -> std::result::Result<bool, HistoryError>;
}
