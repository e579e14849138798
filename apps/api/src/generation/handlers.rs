//! Axum route handlers for the optimization API.

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{extract_pdf_segments, segment_text};
use crate::generation::cover_letter::write_cover_letter;
use crate::generation::overlap::{analyze, OverlapMetrics};
use crate::generation::pipeline::{optimize, OptimizationReport, OptimizeRequest};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OptimizeTextRequest {
    pub job_description: String,
    pub resume_text: String,
    #[serde(default)]
    pub include_cover_letter: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub job_description: String,
    pub candidate_text: String,
}

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    pub job_description: String,
    pub optimized_resume: String,
}

#[derive(Debug, Serialize)]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub content: String,
}

/// Fields collected from the multipart upload form.
#[derive(Debug, Default)]
struct UploadForm {
    job_description: Option<String>,
    resume: Option<Bytes>,
    cover_letter: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/optimize
///
/// Multipart upload: `job_description`, `resume` (PDF) and an optional
/// `cover_letter` flag. Extracts, chunks and runs the full pipeline.
pub async fn handle_optimize_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<OptimizationReport>, AppError> {
    let form = read_upload_form(multipart).await?;

    let job_description = require_text("job_description", form.job_description)?;
    let resume = form
        .resume
        .filter(|data| !data.is_empty())
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;

    let request_id = Uuid::new_v4();
    info!(%request_id, "Received resume upload ({} bytes)", resume.len());

    let segments = extract_pdf_segments(&resume, state.config.chunking).await?;

    let report = optimize(
        state.llm.as_ref(),
        request_id,
        OptimizeRequest {
            job_description,
            segments,
            include_cover_letter: form.cover_letter,
        },
    )
    .await?;

    Ok(Json(report))
}

/// POST /api/v1/optimize/text
///
/// Same pipeline for resumes that are already plain text.
pub async fn handle_optimize_text(
    State(state): State<AppState>,
    Json(request): Json<OptimizeTextRequest>,
) -> Result<Json<OptimizationReport>, AppError> {
    let job_description = require_text("job_description", Some(request.job_description))?;
    let segments = segment_text(&request.resume_text, state.config.chunking);

    let report = optimize(
        state.llm.as_ref(),
        Uuid::new_v4(),
        OptimizeRequest {
            job_description,
            segments,
            include_cover_letter: request.include_cover_letter,
        },
    )
    .await?;

    Ok(Json(report))
}

/// POST /api/v1/analyze
///
/// Keyword overlap of arbitrary text against a job description. No LLM call.
pub async fn handle_analyze(
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<OverlapMetrics>, AppError> {
    let job_description = require_text("job_description", Some(request.job_description))?;
    Ok(Json(analyze(&job_description, &request.candidate_text)))
}

/// POST /api/v1/cover-letter
///
/// Cover letter for a resume that was optimized by an earlier request.
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<CoverLetterResponse>, AppError> {
    let job_description = require_text("job_description", Some(request.job_description))?;
    let optimized_resume = require_text("optimized_resume", Some(request.optimized_resume))?;

    let cover_letter = write_cover_letter(
        state.llm.as_ref(),
        &job_description,
        &optimized_resume,
        Utc::now().date_naive(),
    )
    .await?;

    Ok(Json(CoverLetterResponse { cover_letter }))
}

/// POST /api/v1/export/:kind
///
/// Returns `content` as a downloadable plain-text file.
pub async fn handle_export(
    Path(kind): Path<String>,
    Json(request): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let file_name = match kind.as_str() {
        "resume" => "optimized_resume.txt",
        "cover-letter" => "cover_letter.txt",
        other => {
            return Err(AppError::Validation(format!(
                "Unknown export kind '{other}' (expected 'resume' or 'cover-letter')"
            )))
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        request.content,
    )
        .into_response())
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "job_description" => {
                form.job_description = Some(field.text().await.map_err(invalid_field)?);
            }
            "resume" => {
                form.resume = Some(field.bytes().await.map_err(invalid_field)?);
            }
            "cover_letter" => {
                let raw = field.text().await.map_err(invalid_field)?;
                form.cover_letter = parse_flag(&raw)?;
            }
            // Unknown fields are ignored.
            _ => {}
        }
    }

    Ok(form)
}

fn invalid_field(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart field: {e}"))
}

fn parse_flag(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        other => Err(AppError::Validation(format!(
            "cover_letter must be 'true' or 'false', got '{other}'"
        ))),
    }
}

fn require_text(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(AppError::Validation(format!("{field} cannot be empty"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepts_common_spellings() {
        assert!(parse_flag("true").unwrap());
        assert!(parse_flag(" TRUE ").unwrap());
        assert!(parse_flag("on").unwrap());
        assert!(!parse_flag("false").unwrap());
        assert!(!parse_flag("").unwrap());
        assert!(matches!(parse_flag("maybe"), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_require_text_rejects_missing_and_blank() {
        assert!(matches!(
            require_text("job_description", None),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            require_text("job_description", Some(" \n".to_string())),
            Err(AppError::Validation(_))
        ));
        assert_eq!(
            require_text("job_description", Some("Rust".to_string())).unwrap(),
            "Rust"
        );
    }
}
