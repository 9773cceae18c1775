use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::history::{decode_records, HistoryError, HistoryResult, HistoryStore, ScoreRecord};

/// Postgres-backed history: one JSONB array per candidate row.
///
/// Append seeds the row if missing, then takes a row lock (`FOR UPDATE`) inside a
/// transaction before the read-modify-write, so concurrent writers for the same
/// candidate queue up instead of overwriting each other.
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn append(
        &self,
        candidate: &str,
        score: f64,
        timestamp: &str,
    ) -> HistoryResult<Vec<ScoreRecord>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO score_history (candidate_name, records) VALUES ($1, '[]'::jsonb) \
             ON CONFLICT (candidate_name) DO NOTHING",
        )
        .bind(candidate)
        .execute(&mut *tx)
        .await?;

        let document: serde_json::Value = sqlx::query_scalar(
            "SELECT records FROM score_history WHERE candidate_name = $1 FOR UPDATE",
        )
        .bind(candidate)
        .fetch_one(&mut *tx)
        .await?;

        // Dropping `tx` on the error path rolls back and leaves the row as it was.
        let mut records = decode_records(candidate, document)?;
        records.push(ScoreRecord {
            timestamp: timestamp.to_string(),
            score,
        });

        let updated = serde_json::to_value(&records)
            .map_err(|e| HistoryError::Task(format!("failed to encode history: {e}")))?;

        sqlx::query("UPDATE score_history SET records = $2 WHERE candidate_name = $1")
            .bind(candidate)
            .bind(updated)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Appended score {score} for candidate '{candidate}' ({} records)",
            records.len()
        );
        Ok(records)
    }

    async fn load(&self, candidate: &str) -> HistoryResult<Vec<ScoreRecord>> {
        let document: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT records FROM score_history WHERE candidate_name = $1")
                .bind(candidate)
                .fetch_optional(&self.pool)
                .await?;

        match document {
            Some(document) => decode_records(candidate, document),
            None => Ok(Vec::new()),
        }
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
