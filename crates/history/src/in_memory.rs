//! In-memory history backend for tests and ephemeral runs.

use async_trait::async_trait;
use chrono::Utc;
use copymill_core::error::HistoryError;
use copymill_core::{ContentRecord, HistoryStore, NewContentRecord};
use std::sync::Mutex;

/// A `Mutex<Vec>` store with the same contract as the SQLite backend.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    records: Mutex<Vec<ContentRecord>>,
    next_id: Mutex<i64>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_records(&self) -> Result<std::sync::MutexGuard<'_, Vec<ContentRecord>>, HistoryError> {
        self.records
            .lock()
            .map_err(|_| HistoryError::Storage("History store lock poisoned".into()))
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn save(&self, record: NewContentRecord) -> Result<i64, HistoryError> {
        if record.final_content.trim().is_empty() {
            return Err(HistoryError::Storage(
                "Refusing to save a record with empty final content".into(),
            ));
        }

        let id = {
            let mut next = self
                .next_id
                .lock()
                .map_err(|_| HistoryError::Storage("History store lock poisoned".into()))?;
            *next += 1;
            *next
        };

        let mut records = self.lock_records()?;
        records.push(ContentRecord {
            id,
            business_name: record.business_name,
            target_customer: record.target_customer,
            channel: record.channel,
            tone: record.tone,
            created_at: Utc::now(),
            strategy: record.strategy,
            final_content: record.final_content,
            trend_docs: record.trend_docs,
            best_practice_docs: record.best_practice_docs,
        });
        Ok(id)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<ContentRecord>, HistoryError> {
        let records = self.lock_records()?;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ContentRecord>, HistoryError> {
        let records = self.lock_records()?;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn search_by_business_name(
        &self,
        substring: &str,
    ) -> Result<Vec<ContentRecord>, HistoryError> {
        let needle = substring.to_lowercase();
        let records = self.lock_records()?;
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.business_name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: i64) -> Result<bool, HistoryError> {
        let mut records = self.lock_records()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        Ok(records.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use copymill_core::Channel;

    fn record(business: &str) -> NewContentRecord {
        NewContentRecord {
            business_name: business.into(),
            target_customer: "women 20-30".into(),
            channel: Channel::Blog,
            tone: "expert".into(),
            strategy: "strategy text".into(),
            final_content: "final text".into(),
            trend_docs: vec![],
            best_practice_docs: vec![],
        }
    }

    #[tokio::test]
    async fn save_assigns_increasing_ids() {
        let store = InMemoryHistoryStore::new();
        let a = store.save(record("A")).await.unwrap();
        let b = store.save(record("B")).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[tokio::test]
    async fn list_recent_newest_first() {
        let store = InMemoryHistoryStore::new();
        store.save(record("First")).await.unwrap();
        store.save(record("Second")).await.unwrap();

        let recent = store.list_recent(10).await.unwrap();
        assert_eq!(recent[0].business_name, "Second");
        assert_eq!(recent[1].business_name, "First");
    }

    #[tokio::test]
    async fn search_and_delete() {
        let store = InMemoryHistoryStore::new();
        let id = store.save(record("GreenSoap")).await.unwrap();
        store.save(record("RedCandle")).await.unwrap();

        let hits = store.search_by_business_name("green").await.unwrap();
        assert_eq!(hits.len(), 1);

        assert!(store.delete(id).await.unwrap());
        assert!(!store.delete(id).await.unwrap());
        assert!(store.find_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_final_content_is_rejected() {
        let store = InMemoryHistoryStore::new();
        let mut r = record("GreenSoap");
        r.final_content = String::new();
        assert!(store.save(r).await.is_err());
    }
}
