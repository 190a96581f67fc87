//! SQLite history backend.
//!
//! One table, `content_history`, holds every saved run. Document lists
//! are stored as JSON text columns; timestamps as RFC 3339 strings.

use async_trait::async_trait;
use chrono::Utc;
use copymill_core::error::HistoryError;
use copymill_core::{Channel, ContentRecord, HistoryStore, NewContentRecord};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

/// The production history backend.
pub struct SqliteHistoryStore {
    pool: SqlitePool,
}

impl SqliteHistoryStore {
    /// Open (or create) the database at `path` and run migrations.
    ///
    /// Pass `"sqlite::memory:"` for an in-process ephemeral database.
    pub async fn new(path: &str) -> Result<Self, HistoryError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| HistoryError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| HistoryError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite history store initialized at {path}");
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), HistoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS content_history (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                business_name       TEXT NOT NULL,
                target_customer     TEXT NOT NULL,
                channel             TEXT NOT NULL,
                tone                TEXT NOT NULL,
                created_at          TEXT NOT NULL,
                strategy            TEXT NOT NULL DEFAULT '',
                final_content       TEXT NOT NULL,
                trend_docs          TEXT NOT NULL DEFAULT '[]',
                best_practice_docs  TEXT NOT NULL DEFAULT '[]'
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::MigrationFailed(format!("content_history table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_history_created_at \
             ON content_history(created_at DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::MigrationFailed(format!("created_at index: {e}")))?;

        debug!("History migrations complete");
        Ok(())
    }

    fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<ContentRecord, HistoryError> {
        let id: i64 = row
            .try_get("id")
            .map_err(|e| HistoryError::QueryFailed(format!("id column: {e}")))?;
        let business_name: String = row
            .try_get("business_name")
            .map_err(|e| HistoryError::QueryFailed(format!("business_name column: {e}")))?;
        let target_customer: String = row
            .try_get("target_customer")
            .map_err(|e| HistoryError::QueryFailed(format!("target_customer column: {e}")))?;
        let channel_str: String = row
            .try_get("channel")
            .map_err(|e| HistoryError::QueryFailed(format!("channel column: {e}")))?;
        let tone: String = row
            .try_get("tone")
            .map_err(|e| HistoryError::QueryFailed(format!("tone column: {e}")))?;
        let created_at_str: String = row
            .try_get("created_at")
            .map_err(|e| HistoryError::QueryFailed(format!("created_at column: {e}")))?;
        let strategy: String = row
            .try_get("strategy")
            .map_err(|e| HistoryError::QueryFailed(format!("strategy column: {e}")))?;
        let final_content: String = row
            .try_get("final_content")
            .map_err(|e| HistoryError::QueryFailed(format!("final_content column: {e}")))?;
        let trend_json: String = row
            .try_get("trend_docs")
            .map_err(|e| HistoryError::QueryFailed(format!("trend_docs column: {e}")))?;
        let practice_json: String = row
            .try_get("best_practice_docs")
            .map_err(|e| HistoryError::QueryFailed(format!("best_practice_docs column: {e}")))?;

        let channel = Channel::from_str(&channel_str)
            .map_err(|e| HistoryError::QueryFailed(format!("channel value: {e}")))?;

        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| HistoryError::QueryFailed(format!("created_at value: {e}")))?;

        let trend_docs: Vec<String> = serde_json::from_str(&trend_json).unwrap_or_default();
        let best_practice_docs: Vec<String> =
            serde_json::from_str(&practice_json).unwrap_or_default();

        Ok(ContentRecord {
            id,
            business_name,
            target_customer,
            channel,
            tone,
            created_at,
            strategy,
            final_content,
            trend_docs,
            best_practice_docs,
        })
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn save(&self, record: NewContentRecord) -> Result<i64, HistoryError> {
        if record.final_content.trim().is_empty() {
            return Err(HistoryError::Storage(
                "Refusing to save a record with empty final content".into(),
            ));
        }

        let trend_json = serde_json::to_string(&record.trend_docs)
            .map_err(|e| HistoryError::Storage(format!("trend_docs serialization: {e}")))?;
        let practice_json = serde_json::to_string(&record.best_practice_docs)
            .map_err(|e| HistoryError::Storage(format!("best_practice_docs serialization: {e}")))?;
        let created_at = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO content_history
                (business_name, target_customer, channel, tone, created_at,
                 strategy, final_content, trend_docs, best_practice_docs)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&record.business_name)
        .bind(&record.target_customer)
        .bind(record.channel.as_str())
        .bind(&record.tone)
        .bind(&created_at)
        .bind(&record.strategy)
        .bind(&record.final_content)
        .bind(&trend_json)
        .bind(&practice_json)
        .execute(&self.pool)
        .await
        .map_err(|e| HistoryError::Storage(format!("INSERT failed: {e}")))?;

        let id = result.last_insert_rowid();
        debug!(id, business = %record.business_name, "Saved content record");
        Ok(id)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<ContentRecord>, HistoryError> {
        let rows = sqlx::query(
            "SELECT * FROM content_history ORDER BY created_at DESC, id DESC LIMIT ?1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HistoryError::QueryFailed(format!("list_recent: {e}")))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ContentRecord>, HistoryError> {
        let row = sqlx::query("SELECT * FROM content_history WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| HistoryError::QueryFailed(format!("find_by_id: {e}")))?;

        match row {
            Some(ref r) => Ok(Some(Self::row_to_record(r)?)),
            None => Ok(None),
        }
    }

    async fn search_by_business_name(
        &self,
        substring: &str,
    ) -> Result<Vec<ContentRecord>, HistoryError> {
        // Escape LIKE wildcards so user input matches literally
        let escaped = substring.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
        let pattern = format!("%{escaped}%");

        // SQLite's LIKE is already case-insensitive for ASCII
        let rows = sqlx::query(
            "SELECT * FROM content_history \
             WHERE business_name LIKE ?1 ESCAPE '\\' \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| HistoryError::QueryFailed(format!("search_by_business_name: {e}")))?;

        rows.iter().map(Self::row_to_record).collect()
    }

    async fn delete(&self, id: i64) -> Result<bool, HistoryError> {
        let result = sqlx::query("DELETE FROM content_history WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| HistoryError::Storage(format!("DELETE failed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteHistoryStore {
        SqliteHistoryStore::new("sqlite::memory:").await.unwrap()
    }

    fn record(business: &str) -> NewContentRecord {
        NewContentRecord {
            business_name: business.into(),
            target_customer: "women 20-30".into(),
            channel: Channel::Instagram,
            tone: "friendly".into(),
            strategy: "lead with sustainability".into(),
            final_content: "final caption".into(),
            trend_docs: vec!["trend text".into()],
            best_practice_docs: vec![],
        }
    }

    #[tokio::test]
    async fn save_and_find() {
        let store = test_store().await;
        let id = store.save(record("GreenSoap")).await.unwrap();
        assert!(id > 0);

        let fetched = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.business_name, "GreenSoap");
        assert_eq!(fetched.target_customer, "women 20-30");
        assert_eq!(fetched.channel, Channel::Instagram);
        assert_eq!(fetched.tone, "friendly");
        assert_eq!(fetched.final_content, "final caption");
        assert_eq!(fetched.trend_docs, vec!["trend text".to_string()]);
        assert!(fetched.best_practice_docs.is_empty());
    }

    #[tokio::test]
    async fn ids_are_monotonic() {
        let store = test_store().await;
        let a = store.save(record("A")).await.unwrap();
        let b = store.save(record("B")).await.unwrap();
        assert!(b > a);
    }

    #[tokio::test]
    async fn empty_final_content_is_rejected() {
        let store = test_store().await;
        let mut r = record("GreenSoap");
        r.final_content = "  ".into();
        let result = store.save(r).await;
        assert!(matches!(result, Err(HistoryError::Storage(_))));
        assert!(store.list_recent(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_recent_is_newest_first_and_limited() {
        let store = test_store().await;
        for name in ["First", "Second", "Third"] {
            store.save(record(name)).await.unwrap();
        }

        let recent = store.list_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].business_name, "Third");
        assert_eq!(recent[1].business_name, "Second");
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring() {
        let store = test_store().await;
        store.save(record("GreenSoap")).await.unwrap();
        store.save(record("BlueSoap")).await.unwrap();
        store.save(record("RedCandle")).await.unwrap();

        let hits = store.search_by_business_name("soap").await.unwrap();
        assert_eq!(hits.len(), 2);

        let hits = store.search_by_business_name("GREEN").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].business_name, "GreenSoap");
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let store = test_store().await;
        store.save(record("100% Natural")).await.unwrap();
        store.save(record("GreenSoap")).await.unwrap();

        let hits = store.search_by_business_name("%").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].business_name, "100% Natural");
    }

    #[tokio::test]
    async fn delete_existing_and_missing() {
        let store = test_store().await;
        let id = store.save(record("GreenSoap")).await.unwrap();

        assert!(store.delete(id).await.unwrap());
        assert!(store.find_by_id(id).await.unwrap().is_none());
        assert!(!store.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = format!("sqlite://{}/history.db", dir.path().display());

        let id = {
            let store = SqliteHistoryStore::new(&path).await.unwrap();
            store.save(record("GreenSoap")).await.unwrap()
        };

        let store = SqliteHistoryStore::new(&path).await.unwrap();
        let fetched = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.business_name, "GreenSoap");
    }

    #[tokio::test]
    async fn store_name() {
        let store = test_store().await;
        assert_eq!(store.name(), "sqlite");
    }
}
