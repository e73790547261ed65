use std::io::Write;
use std::path::Path;

use axum::extract::Multipart;
use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;

pub const RESUME_FIELD: &str = "resume";
const PDF_MAGIC: &[u8] = b"%PDF";

/// A résumé PDF and its accompanying job text, read from one multipart body.
#[derive(Debug)]
pub struct AnalysisUpload {
    pub file_name: Option<String>,
    pub resume: Bytes,
    pub job_text: String,
}

/// Reads the `resume` file part and the `job_field` text part.
/// Unknown parts are drained and ignored.
pub async fn read_analysis_upload(
    mut multipart: Multipart,
    job_field: &'static str,
    max_bytes: usize,
) -> Result<AnalysisUpload, AppError> {
    let mut resume: Option<(Option<String>, Bytes)> = None;
    let mut job_text: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            RESUME_FIELD => {
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await?;
                check_resume(&data, max_bytes)?;
                resume = Some((file_name, data));
            }
            n if n == job_field => {
                job_text = Some(field.text().await?);
            }
            _ => {
                field.bytes().await?;
            }
        }
    }

    let (file_name, resume) = resume
        .ok_or_else(|| AppError::Validation(format!("Missing '{RESUME_FIELD}' file field")))?;
    let job_text = require_text(job_text, job_field)?;

    debug!(
        file_name = file_name.as_deref().unwrap_or("unknown"),
        bytes = resume.len(),
        job_chars = job_text.len(),
        "Read analysis upload"
    );

    Ok(AnalysisUpload {
        file_name,
        resume,
        job_text,
    })
}

/// Size and `%PDF` signature check. The file extension is not trusted.
pub fn check_resume(data: &[u8], max_bytes: usize) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::Validation("Resume file is empty".to_string()));
    }
    if data.len() > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "Resume is {} bytes; maximum is {max_bytes} bytes",
            data.len()
        )));
    }
    if !data.starts_with(PDF_MAGIC) {
        return Err(AppError::Validation(
            "Invalid file type. Only PDF resumes are accepted".to_string(),
        ));
    }
    Ok(())
}

pub fn require_text(text: Option<String>, field: &str) -> Result<String, AppError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t),
        Some(_) => Err(AppError::Validation(format!("'{field}' must not be empty"))),
        None => Err(AppError::Validation(format!("Missing '{field}' field"))),
    }
}

/// Writes the upload to a uniquely named file in `dir`. The file is removed
/// when the handle drops.
pub fn spool(dir: &Path, analysis_id: Uuid, data: &[u8]) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix(&format!("resume-{analysis_id}-"))
        .suffix(".pdf")
        .tempfile_in(dir)?;
    file.write_all(data)?;
    file.flush()?;
    Ok(file)
}
