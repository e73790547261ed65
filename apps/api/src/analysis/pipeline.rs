//! Résumé-versus-job matching pipeline.
//!
//! PDF spooling, text extraction, field extraction, comparison, similarity
//! and the gap report are all synchronous and CPU-bound, so the whole chain
//! runs inside one `spawn_blocking` task per request.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::upload::{spool, AnalysisUpload};
use crate::errors::AppError;
use crate::extraction::pdf::{self, DocumentQuality, PdfError};
use crate::extraction::{Extractor, JobRequirements, ResumeAnalysis};
use crate::matching::{compare_requirements, ComparisonResult, GapReport, SimilarityScorer};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub analysis_id: Uuid,
    pub resume_analysis: ResumeAnalysis,
    pub job_requirements: JobRequirements,
    pub comparison: ComparisonResult,
    pub semantic_similarity: f32,
    pub similarity_backend: &'static str,
    pub document_quality: DocumentQuality,
    pub gap_report: GapReport,
}

/// Runs the full match for one upload.
pub async fn run_match(state: &AppState, upload: AnalysisUpload) -> Result<MatchReport, AppError> {
    let analysis_id = Uuid::new_v4();
    let extractor = Arc::clone(&state.extractor);
    let similarity = Arc::clone(&state.similarity);
    let upload_dir = state.config.upload_dir.clone();

    let report = tokio::task::spawn_blocking(move || {
        let resume_text = read_resume(&upload_dir, analysis_id, &upload.resume)?;
        Ok::<_, AppError>(analyse_texts(
            &extractor,
            similarity.as_ref(),
            analysis_id,
            &resume_text,
            &upload.job_text,
        ))
    })
    .await
    .map_err(|e| {
        if e.is_panic() {
            // pdf-extract panics on some malformed files.
            AppError::UnprocessableEntity("The uploaded PDF could not be parsed".to_string())
        } else {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in analysis: {e}"))
        }
    })??;

    info!(
        %analysis_id,
        score = report.comparison.overall_match.score,
        qualified = report.comparison.overall_match.qualified,
        similarity = report.semantic_similarity,
        "Match analysis complete"
    );
    Ok(report)
}

/// Spools the upload to disk and extracts its text. The temp file is gone
/// when this returns, on success or failure.
fn read_resume(upload_dir: &Path, analysis_id: Uuid, data: &[u8]) -> Result<String, AppError> {
    let file = spool(upload_dir, analysis_id, data).map_err(|e| {
        AppError::Internal(anyhow::anyhow!(
            "Failed to write upload to {}: {e}",
            upload_dir.display()
        ))
    })?;

    pdf::extract_text(file.path()).map_err(|err| match err {
        PdfError::Io { .. } => AppError::Internal(err.into()),
        PdfError::Extraction(_) | PdfError::Empty => {
            warn!(%analysis_id, "Resume text extraction failed: {err}");
            AppError::UnprocessableEntity(err.to_string())
        }
    })
}

/// Everything after text extraction. Pure and deterministic apart from
/// the current year used for open-ended date ranges.
pub fn analyse_texts(
    extractor: &Extractor,
    similarity: &dyn SimilarityScorer,
    analysis_id: Uuid,
    resume_text: &str,
    job_text: &str,
) -> MatchReport {
    let resume_analysis = extractor.perform_resume_analysis(resume_text);
    let job_requirements = extractor.analyze_job_requirements(job_text);
    let comparison = compare_requirements(&job_requirements, &resume_analysis);
    let gap_report = GapReport::build(
        extractor.rules(),
        job_text,
        resume_text,
        &job_requirements,
        &resume_analysis,
    );

    MatchReport {
        analysis_id,
        semantic_similarity: similarity.similarity(job_text, resume_text),
        similarity_backend: similarity.backend(),
        document_quality: DocumentQuality::assess(resume_text),
        resume_analysis,
        job_requirements,
        comparison,
        gap_report,
    }
}
