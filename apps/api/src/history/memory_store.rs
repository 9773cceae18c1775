use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::history::{HistoryResult, HistoryStore, ScoreRecord};

/// Process-local history. Used as the `memory` backend and as a test double.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    records: Mutex<HashMap<String, Vec<ScoreRecord>>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(
        &self,
        candidate: &str,
        score: f64,
        timestamp: &str,
    ) -> HistoryResult<Vec<ScoreRecord>> {
        let mut records = self.records.lock().await;
        let history = records.entry(candidate.to_string()).or_default();
        history.push(ScoreRecord {
            timestamp: timestamp.to_string(),
            score,
        });
        Ok(history.clone())
    }

    async fn load(&self, candidate: &str) -> HistoryResult<Vec<ScoreRecord>> {
        let records = self.records.lock().await;
        Ok(records.get(candidate).cloned().unwrap_or_default())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
