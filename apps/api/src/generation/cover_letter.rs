//! Cover Letter: optional single call over the already-optimized resume.

use chrono::NaiveDate;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::generation::prompts::{
    fill_template, COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM_TEMPLATE,
};
use crate::llm_client::prompts::{PLAIN_TEXT_OUTPUT, TRUTHFULNESS_INSTRUCTION};
use crate::llm_client::CompletionProvider;

/// Writes a cover letter dated `today`. The reply is returned verbatim.
#[instrument(skip_all, fields(stage = "cover_letter"))]
pub async fn write_cover_letter(
    llm: &dyn CompletionProvider,
    job_description: &str,
    optimized_resume: &str,
    today: NaiveDate,
) -> Result<String, AppError> {
    let dated = today.format("%B %-d, %Y").to_string();
    let system = fill_template(
        COVER_LETTER_SYSTEM_TEMPLATE,
        &[
            ("today", dated.as_str()),
            ("truthfulness_instruction", TRUTHFULNESS_INSTRUCTION),
            ("plain_text_output", PLAIN_TEXT_OUTPUT),
        ],
    );
    let prompt = fill_template(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description),
            ("optimized_resume", optimized_resume),
        ],
    );

    let letter = llm
        .complete(&system, &prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Cover letter generation failed: {e}")))?
        .text;

    info!(
        "Cover letter generated ({} words)",
        letter.split_whitespace().count()
    );
    Ok(letter)
}
