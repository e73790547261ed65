use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::pipeline::{run_match, MatchReport};
use crate::analysis::upload::{read_analysis_upload, require_text};
use crate::errors::AppError;
use crate::extraction::JobRequirements;
use crate::narrative::{generate_narrative, NarrativeOutcome};
use crate::state::AppState;

const JOB_REQUIREMENTS_FIELD: &str = "job_requirements";
const JOB_POST_FIELD: &str = "job_post";

// ────────────────────────────────────────────────────────────────────────────
// Request / response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalyzeResumeResponse {
    pub analysis: MatchReport,
}

#[derive(Debug, Serialize)]
pub struct AiAnalysisResponse {
    pub analysis: MatchReport,
    #[serde(flatten)]
    pub narrative: NarrativeOutcome,
}

#[derive(Debug, Deserialize)]
pub struct JobTextRequest {
    pub job_text: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/analyze-resume
/// Multipart: `resume` (PDF) and `job_requirements` (text).
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResumeResponse>, AppError> {
    let upload = read_analysis_upload(
        multipart,
        JOB_REQUIREMENTS_FIELD,
        state.config.max_upload_bytes,
    )
    .await?;
    info!(
        file = upload.file_name.as_deref().unwrap_or("unknown"),
        bytes = upload.resume.len(),
        job_chars = upload.job_text.len(),
        "POST /api/analyze-resume"
    );

    let analysis = run_match(&state, upload).await?;
    Ok(Json(AnalyzeResumeResponse { analysis }))
}

/// POST /api/ai-analysis
/// Multipart: `resume` (PDF) and `job_post` (text). The narrative step never
/// fails the request; its failure payload is returned alongside the analysis.
pub async fn handle_ai_analysis(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AiAnalysisResponse>, AppError> {
    let upload =
        read_analysis_upload(multipart, JOB_POST_FIELD, state.config.max_upload_bytes).await?;
    info!(
        file = upload.file_name.as_deref().unwrap_or("unknown"),
        bytes = upload.resume.len(),
        job_chars = upload.job_text.len(),
        "POST /api/ai-analysis"
    );

    let job_text = upload.job_text.clone();
    let analysis = run_match(&state, upload).await?;
    let narrative = generate_narrative(
        state.narrator.as_ref(),
        state.extractor.rules(),
        &job_text,
        &analysis.resume_analysis,
        &analysis.comparison,
    )
    .await;

    info!(
        analysis_id = %analysis.analysis_id,
        narrative = narrative.ai_analysis.is_completed(),
        "AI analysis complete"
    );
    Ok(Json(AiAnalysisResponse {
        analysis,
        narrative,
    }))
}

/// POST /api/job-requirements
pub async fn handle_job_requirements(
    State(state): State<AppState>,
    payload: Result<Json<JobTextRequest>, JsonRejection>,
) -> Result<Json<JobRequirements>, AppError> {
    let Json(req) = payload?;
    let job_text = require_text(req.job_text, "job_text")?;
    let extractor = state.extractor.clone();

    let requirements =
        tokio::task::spawn_blocking(move || extractor.analyze_job_requirements(&job_text))
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!(
                    "spawn_blocking failed in job requirements: {e}"
                ))
            })?;

    Ok(Json(requirements))
}
