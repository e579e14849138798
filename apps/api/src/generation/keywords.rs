//! Keyword Suggestion: asks the LLM which job-description terms the resume is
//! missing and parses its two-list reply.
//!
//! The parser is intentionally literal. The reply is split on blank lines and
//! each section is searched for the two fixed headings; anything else is a
//! parse failure. This stage never fails: parse and invocation errors both
//! degrade to single-element marker lists with zeroed metrics, so callers
//! always get well-shaped keyword sets.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::generation::overlap::{analyze, OverlapMetrics};
use crate::generation::prompts::{
    fill_template, ADDITIONAL_KEYWORDS_HEADING, KEYWORD_PROMPT_TEMPLATE, KEYWORD_SYSTEM,
    TOP_KEYWORDS_HEADING,
};
use crate::llm_client::CompletionProvider;

/// Expected size of the top keyword list. Displayed, not enforced.
pub const TOP_KEYWORD_COUNT: usize = 22;
/// Expected size of the additional keyword list. Displayed, not enforced.
pub const ADDITIONAL_KEYWORD_COUNT: usize = 10;

/// Marker placed in both keyword lists when the reply cannot be used.
pub const PARSE_ERROR_MARKER: &str = "Error parsing keywords";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeywordParseError {
    #[error("reply has no section containing '{0}'")]
    MissingHeading(&'static str),
}

/// Output of the suggestion stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSuggestions {
    pub top_keywords: Vec<String>,
    pub additional_keywords: Vec<String>,
    /// Overlap of the untouched resume; all zero when the reply was unusable.
    pub original_metrics: OverlapMetrics,
}

impl KeywordSuggestions {
    fn fallback(marker: String) -> Self {
        Self {
            top_keywords: vec![marker.clone()],
            additional_keywords: vec![marker],
            original_metrics: OverlapMetrics::zero(),
        }
    }

    /// Top then additional keywords, comma-joined, for injection into the resume prompt.
    pub fn steering_string(&self) -> String {
        self.top_keywords
            .iter()
            .chain(&self.additional_keywords)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Runs the suggestion stage. Infallible by contract; see module docs.
#[instrument(skip_all, fields(stage = "keywords"))]
pub async fn suggest(
    llm: &dyn CompletionProvider,
    job_description: &str,
    resume_text: &str,
) -> KeywordSuggestions {
    let prompt = fill_template(
        KEYWORD_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description),
            ("resume_text", resume_text),
        ],
    );

    let reply = match llm.complete(KEYWORD_SYSTEM, &prompt).await {
        Ok(completion) => completion.text,
        Err(e) => {
            warn!("Keyword suggestion call failed, using fallback keywords: {e}");
            return KeywordSuggestions::fallback(format!("{PARSE_ERROR_MARKER}: {e}"));
        }
    };

    let (top_keywords, additional_keywords) = match parse_keyword_reply(&reply) {
        Ok(lists) => lists,
        Err(e) => {
            warn!("Keyword reply did not match the expected format: {e}");
            return KeywordSuggestions::fallback(PARSE_ERROR_MARKER.to_string());
        }
    };

    if top_keywords.len() != TOP_KEYWORD_COUNT
        || additional_keywords.len() != ADDITIONAL_KEYWORD_COUNT
    {
        warn!(
            "Keyword reply had {} top / {} additional entries (expected {}/{})",
            top_keywords.len(),
            additional_keywords.len(),
            TOP_KEYWORD_COUNT,
            ADDITIONAL_KEYWORD_COUNT
        );
    }

    let original_metrics = analyze(job_description, resume_text);
    info!(
        "Original keyword match: {}/{} ({}%)",
        original_metrics.matched_keywords,
        original_metrics.total_keywords,
        original_metrics.match_percentage
    );

    KeywordSuggestions {
        top_keywords,
        additional_keywords,
        original_metrics,
    }
}

/// Parses the two-heading reply into (top, additional) keyword lists.
///
/// Sections are separated by a blank line. A section containing the top
/// heading is the top section; otherwise one containing the additional
/// heading is the additional section. Later sections overwrite earlier ones.
pub fn parse_keyword_reply(reply: &str) -> Result<(Vec<String>, Vec<String>), KeywordParseError> {
    let mut top_section = None;
    let mut additional_section = None;

    for section in reply.trim().split("\n\n") {
        if section.contains(TOP_KEYWORDS_HEADING) {
            top_section = Some(section);
        } else if section.contains(ADDITIONAL_KEYWORDS_HEADING) {
            additional_section = Some(section);
        }
    }

    let top_section = top_section.ok_or(KeywordParseError::MissingHeading(TOP_KEYWORDS_HEADING))?;
    let additional_section = additional_section
        .ok_or(KeywordParseError::MissingHeading(ADDITIONAL_KEYWORDS_HEADING))?;

    Ok((
        split_keywords(after_heading(top_section, TOP_KEYWORDS_HEADING)),
        split_keywords(after_heading(additional_section, ADDITIONAL_KEYWORDS_HEADING)),
    ))
}

/// Everything after the first colon of the line holding `heading`, to the end of the section.
fn after_heading<'a>(section: &'a str, heading: &str) -> &'a str {
    let Some(heading_at) = section.find(heading) else {
        return "";
    };
    let line_start = section[..heading_at].rfind('\n').map_or(0, |i| i + 1);
    match section[line_start..].find(':') {
        Some(colon) => &section[line_start + colon + 1..],
        None => "",
    }
}

fn split_keywords(list: &str) -> Vec<String> {
    list.trim()
        .split(", ")
        .map(|k| k.trim().to_lowercase())
        .collect()
}
