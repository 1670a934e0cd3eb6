use std::collections::HashMap;

use async_trait::async_trait;
use followpulse_core::{Handle, HistorySnapshot, LatestSummary};
use tokio::sync::RwLock;

use crate::{HistoryStore, StoreError};

#[derive(Debug, Default)]
struct Entry {
    latest: Option<LatestSummary>,
    history: Vec<HistorySnapshot>,
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<Handle, Entry>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn latest(&self, handle: &Handle) -> Result<Option<LatestSummary>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(handle).and_then(|e| e.latest.clone()))
    }

    async fn append_snapshot(
        &self,
        handle: &Handle,
        snapshot: &HistorySnapshot,
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries
            .entry(handle.clone())
            .or_default()
            .history
            .push(snapshot.clone());
        Ok(())
    }

    async fn put_latest(&self, handle: &Handle, summary: &LatestSummary) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.entry(handle.clone()).or_default().latest = Some(summary.clone());
        Ok(())
    }

    async fn history(&self, handle: &Handle) -> Result<Vec<HistorySnapshot>, StoreError> {
        let entries = self.entries.read().await;
        let mut history = entries
            .get(handle)
            .map(|e| e.history.clone())
            .unwrap_or_default();
        history.sort_by_key(|s| s.timestamp);
        Ok(history)
    }
}
