//! Orchestrator: segments → resume text → synthesis → optional cover letter.
//!
//! Strictly sequential; each stage feeds the next. The only branches are
//! "was anything extracted" and "was a cover letter requested".

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::assemble_resume_text;
use crate::generation::cover_letter::write_cover_letter;
use crate::generation::generator::{synthesize, CombinedAnalysis};
use crate::llm_client::CompletionProvider;

/// Input to one optimization run.
#[derive(Debug, Clone)]
pub struct OptimizeRequest {
    pub job_description: String,
    pub segments: Vec<String>,
    pub include_cover_letter: bool,
}

/// Everything a run produces.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationReport {
    pub request_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub optimized_resume: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    pub analysis: CombinedAnalysis,
    /// Non-fatal problems, e.g. a requested cover letter that could not be written.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[instrument(skip_all, fields(request_id = %request_id))]
pub async fn optimize(
    llm: &dyn CompletionProvider,
    request_id: Uuid,
    request: OptimizeRequest,
) -> Result<OptimizationReport, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let resume_text = assemble_resume_text(&request.segments);
    if resume_text.trim().is_empty() {
        return Err(AppError::ExtractionEmpty);
    }

    info!(
        "Optimizing resume ({} segments, {} chars, cover letter: {})",
        request.segments.len(),
        resume_text.chars().count(),
        request.include_cover_letter
    );

    let synthesized = synthesize(llm, &request.job_description, &resume_text).await?;

    // A failed cover letter degrades to a warning; the resume is still returned.
    let generated_at = Utc::now();
    let mut warnings = Vec::new();
    let cover_letter = if request.include_cover_letter {
        match write_cover_letter(
            llm,
            &request.job_description,
            &synthesized.optimized_resume,
            generated_at.date_naive(),
        )
        .await
        {
            Ok(letter) => Some(letter),
            Err(e) => {
                warn!("Returning resume without cover letter: {e}");
                warnings.push(
                    "The cover letter could not be generated. Request it again via /api/v1/cover-letter."
                        .to_string(),
                );
                None
            }
        }
    } else {
        None
    };

    Ok(OptimizationReport {
        request_id,
        generated_at,
        optimized_resume: synthesized.optimized_resume,
        cover_letter,
        analysis: synthesized.analysis,
        warnings,
    })
}
