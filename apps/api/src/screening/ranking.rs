//! Recruiter-mode ranking.
//!
//! # Batch scoring
//! Each resume is extracted (for PDF uploads) and scored independently on
//! tokio's blocking pool, at most `workers` at a time (semaphore permits).
//! Results are put back in upload order before the stable sort, so ties always
//! resolve to upload order no matter which task finished first. Nothing here
//! touches score history.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::errors::AppError;
use crate::screening::ats_score::ats_score;
use crate::screening::extraction::{candidate_name_from_file, extract_pdf_text};
use crate::screening::suggestions::suggest;

/// Separator used when flattening a suggestion list into one table cell.
pub const SUGGESTION_SEPARATOR: &str = " | ";

/// One uploaded resume, already reduced to text.
#[derive(Debug, Clone, Deserialize)]
pub struct ResumeInput {
    pub name: String,
    pub resume_text: String,
}

/// A resume as it arrives in a recruiter batch.
#[derive(Debug, Clone)]
pub enum ResumeSource {
    Text(ResumeInput),
    /// Uploaded PDF; the candidate is named after the file.
    Pdf { file_name: String, bytes: Bytes },
}

impl ResumeSource {
    async fn into_input(self) -> Result<ResumeInput, AppError> {
        match self {
            ResumeSource::Text(input) => Ok(input),
            ResumeSource::Pdf { file_name, bytes } => Ok(ResumeInput {
                name: candidate_name_from_file(&file_name),
                resume_text: extract_pdf_text(&file_name, bytes).await?,
            }),
        }
    }
}

impl From<ResumeInput> for ResumeSource {
    fn from(input: ResumeInput) -> Self {
        ResumeSource::Text(input)
    }
}

/// One row of the recruiter table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateResult {
    pub name: String,
    pub score: f64,
    pub suggestions: String,
}

/// Scores and annotates a single resume.
pub fn evaluate(name: &str, resume_text: &str, job_text: &str) -> CandidateResult {
    CandidateResult {
        name: name.to_string(),
        score: ats_score(resume_text, job_text),
        suggestions: suggest(resume_text, job_text).join(SUGGESTION_SEPARATOR),
    }
}

/// Sorts by score descending. Stable: equal scores keep input order.
pub fn rank_candidates(mut results: Vec<CandidateResult>) -> Vec<CandidateResult> {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results
}

/// Scores every resume against `job_text` with bounded parallelism, then ranks.
/// The first unreadable upload fails the whole batch.
pub async fn score_batch<S>(
    job_text: &str,
    resumes: Vec<S>,
    workers: usize,
) -> Result<Vec<CandidateResult>, AppError>
where
    S: Into<ResumeSource>,
{
    let total = resumes.len();
    let permits = Arc::new(Semaphore::new(workers.max(1)));
    let job_text: Arc<str> = Arc::from(job_text);
    let mut tasks = JoinSet::new();

    for (idx, resume) in resumes.into_iter().enumerate() {
        let source: ResumeSource = resume.into();
        let permits = Arc::clone(&permits);
        let job_text = Arc::clone(&job_text);
        tasks.spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| AppError::Internal(anyhow::anyhow!("scoring pool closed: {e}")))?;
            let resume = source.into_input().await?;
            let result = tokio::task::spawn_blocking(move || {
                evaluate(&resume.name, &resume.resume_text, &job_text)
            })
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in batch scoring: {e}")))?;
            Ok::<_, AppError>((idx, result))
        });
    }

    let mut slots: Vec<Option<CandidateResult>> = vec![None; total];
    while let Some(joined) = tasks.join_next().await {
        let (idx, result) = joined
            .map_err(|e| AppError::Internal(anyhow::anyhow!("batch scoring task failed: {e}")))??;
        slots[idx] = Some(result);
    }

    let in_upload_order: Vec<CandidateResult> = slots.into_iter().flatten().collect();
    Ok(rank_candidates(in_upload_order))
}
