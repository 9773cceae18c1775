//! Score History — append-only, per-candidate sequence of timestamped scores.
//!
//! Candidate names are used verbatim as keys. Two people who type the same name
//! share one history; there is no disambiguation.
//!
//! `AppState` holds an `Arc<dyn HistoryStore>`, chosen at startup via `HISTORY_BACKEND`.

pub mod file_store;
pub mod memory_store;
pub mod pg_store;
pub mod trend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use file_store::FileHistoryStore;
pub use memory_store::InMemoryHistoryStore;
pub use pg_store::PgHistoryStore;
pub use trend::ScoreTrend;

/// One timestamped score observation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub timestamp: String,
    pub score: f64,
}

#[derive(Debug, Error)]
pub enum HistoryError {
    /// The stored document exists but is not a valid record sequence.
    #[error("score history for '{candidate}' is corrupt: {reason}")]
    Corrupt { candidate: String, reason: String },

    #[error("history I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("history task failed: {0}")]
    Task(String),
}

pub type HistoryResult<T> = Result<T, HistoryError>;

/// Storage seam for score history. Implementations must serialize appends for
/// the same candidate so concurrent writers never drop records.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Appends a record and returns the full updated sequence.
    async fn append(
        &self,
        candidate: &str,
        score: f64,
        timestamp: &str,
    ) -> HistoryResult<Vec<ScoreRecord>>;

    /// Returns the stored sequence, or an empty one if the candidate is unknown.
    async fn load(&self, candidate: &str) -> HistoryResult<Vec<ScoreRecord>>;

    /// Backend label for logs.
    fn backend(&self) -> &'static str;
}

/// Decodes a stored JSON document into records, validating shape and score range.
pub(crate) fn decode_records(
    candidate: &str,
    document: serde_json::Value,
) -> HistoryResult<Vec<ScoreRecord>> {
    let records: Vec<ScoreRecord> =
        serde_json::from_value(document).map_err(|e| corrupt(candidate, e))?;
    validate_records(candidate, &records)?;
    Ok(records)
}

/// Decodes raw bytes (file contents) into records.
pub(crate) fn decode_records_bytes(candidate: &str, raw: &[u8]) -> HistoryResult<Vec<ScoreRecord>> {
    let document: serde_json::Value =
        serde_json::from_slice(raw).map_err(|e| corrupt(candidate, e))?;
    decode_records(candidate, document)
}

fn validate_records(candidate: &str, records: &[ScoreRecord]) -> HistoryResult<()> {
    for (idx, record) in records.iter().enumerate() {
        if !record.score.is_finite() || !(0.0..=100.0).contains(&record.score) {
            return Err(corrupt(
                candidate,
                format!("record {idx} has out-of-range score {}", record.score),
            ));
        }
    }
    Ok(())
}

fn corrupt(candidate: &str, reason: impl ToString) -> HistoryError {
    HistoryError::Corrupt {
        candidate: candidate.to_string(),
        reason: reason.to_string(),
    }
}
