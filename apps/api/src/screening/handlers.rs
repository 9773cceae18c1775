//! Axum route handlers for the Screening API.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::history::{ScoreRecord, ScoreTrend};
use crate::screening::ats_score::ats_score;
use crate::screening::extraction::extract_pdf_text;
use crate::screening::ranking::{score_batch, CandidateResult, ResumeInput, ResumeSource};
use crate::screening::suggestions::suggest;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CandidateScoreRequest {
    pub name: String,
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct CandidateScoreResponse {
    pub name: String,
    pub score: f64,
    pub suggestions: Vec<String>,
    pub history: Vec<ScoreRecord>,
    pub trend: Option<ScoreTrend>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub name: String,
    pub records: Vec<ScoreRecord>,
    pub trend: Option<ScoreTrend>,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub job_description: String,
    pub resumes: Vec<ResumeInput>,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub rows: Vec<CandidateResult>,
}

// ────────────────────────────────────────────────────────────────────────────
// Candidate mode
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/candidates/score
///
/// Scores one resume, records the score in the candidate's history, and returns
/// suggestions plus the updated history.
pub async fn handle_candidate_score(
    State(state): State<AppState>,
    Json(request): Json<CandidateScoreRequest>,
) -> Result<Json<CandidateScoreResponse>, AppError> {
    let response = screen_candidate(
        &state,
        request.name,
        &request.resume_text,
        &request.job_description,
    )
    .await?;
    Ok(Json(response))
}

/// POST /api/v1/candidates/score/upload
///
/// Multipart form: `name`, `job_description`, `resume` (PDF).
pub async fn handle_candidate_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<CandidateScoreResponse>, AppError> {
    let mut name = None;
    let mut job_description = String::new();
    let mut resume: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => name = Some(field.text().await.map_err(bad_multipart)?),
            "job_description" => job_description = field.text().await.map_err(bad_multipart)?,
            "resume" => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                resume = Some((file_name, bytes));
            }
            _ => {}
        }
    }

    let name = name.ok_or_else(|| AppError::Validation("name is required".to_string()))?;
    let (file_name, bytes) =
        resume.ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let resume_text = extract_pdf_text(&file_name, bytes).await?;

    let response = screen_candidate(&state, name, &resume_text, &job_description).await?;
    Ok(Json(response))
}

/// GET /api/v1/candidates/:name/history
pub async fn handle_candidate_history(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let records = state.history.load(&name).await?;
    let trend = ScoreTrend::from_records(&records);
    Ok(Json(HistoryResponse {
        name,
        records,
        trend,
    }))
}

async fn screen_candidate(
    state: &AppState,
    name: String,
    resume_text: &str,
    job_description: &str,
) -> Result<CandidateScoreResponse, AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }

    let score = ats_score(resume_text, job_description);
    let suggestions = suggest(resume_text, job_description);

    let history = state.history.append(&name, score, &now_timestamp()).await?;
    let trend = ScoreTrend::from_records(&history);

    Ok(CandidateScoreResponse {
        name,
        score,
        suggestions,
        history,
        trend,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Recruiter mode (display only, never written to history)
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/recruiter/rank
pub async fn handle_recruiter_rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankResponse>, AppError> {
    let rows = score_batch(
        &request.job_description,
        request.resumes,
        state.config.scoring_workers,
    )
    .await?;
    Ok(Json(RankResponse { rows }))
}

/// POST /api/v1/recruiter/rank/upload
///
/// Multipart form: `job_description` plus one or more `resumes` PDF files.
/// Each candidate is named after its file, minus the extension.
pub async fn handle_recruiter_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RankResponse>, AppError> {
    let mut job_description = String::new();
    let mut files: Vec<ResumeSource> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "job_description" => job_description = field.text().await.map_err(bad_multipart)?,
            "resumes" => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| {
                        AppError::Validation("resume upload is missing a file name".to_string())
                    })?;
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                files.push(ResumeSource::Pdf { file_name, bytes });
            }
            _ => {}
        }
    }

    if files.is_empty() {
        return Err(AppError::Validation(
            "at least one resume file is required".to_string(),
        ));
    }

    info!("Ranking {} uploaded resumes", files.len());
    let rows = score_batch(&job_description, files, state.config.scoring_workers).await?;
    Ok(Json(RankResponse { rows }))
}

fn bad_multipart(err: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("invalid multipart body: {err}"))
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
