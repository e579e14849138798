//! Resume Synthesis: keyword suggestion → steered rewrite → re-score.
//!
//! The rewritten resume is returned exactly as the model produced it. The
//! truthfulness rule lives only in the prompt; nothing here verifies it.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::generation::keywords::{suggest, KeywordSuggestions};
use crate::generation::overlap::{analyze, OverlapMetrics};
use crate::generation::prompts::{fill_template, RESUME_PROMPT_TEMPLATE, RESUME_SYSTEM_TEMPLATE};
use crate::llm_client::prompts::{PLAIN_TEXT_OUTPUT, TRUTHFULNESS_INSTRUCTION};
use crate::llm_client::CompletionProvider;

/// Before/after metrics plus the keywords used to steer the rewrite.
/// Field names are part of the public report format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedAnalysis {
    pub original_metrics: OverlapMetrics,
    pub final_metrics: OverlapMetrics,
    #[serde(rename = "top_22_keywords")]
    pub top_keywords: Vec<String>,
    #[serde(rename = "additional_10_keywords")]
    pub additional_keywords: Vec<String>,
}

impl CombinedAnalysis {
    /// Percentage points gained by the rewrite. Usually positive, never guaranteed.
    pub fn improvement(&self) -> f64 {
        self.final_metrics.match_percentage - self.original_metrics.match_percentage
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SynthesizedResume {
    pub optimized_resume: String,
    pub analysis: CombinedAnalysis,
}

/// Runs suggestion then synthesis. A failed synthesis call is terminal for the request.
#[instrument(skip_all, fields(stage = "synthesis"))]
pub async fn synthesize(
    llm: &dyn CompletionProvider,
    job_description: &str,
    resume_text: &str,
) -> Result<SynthesizedResume, AppError> {
    let suggestions = suggest(llm, job_description, resume_text).await;

    let system = build_resume_system(&suggestions);
    let prompt = fill_template(
        RESUME_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description),
            ("resume_text", resume_text),
        ],
    );

    let optimized_resume = llm
        .complete(&system, &prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Resume synthesis failed: {e}")))?
        .text;

    let final_metrics = analyze(job_description, &optimized_resume);
    let analysis = CombinedAnalysis {
        original_metrics: suggestions.original_metrics,
        final_metrics,
        top_keywords: suggestions.top_keywords,
        additional_keywords: suggestions.additional_keywords,
    };

    info!(
        "Resume synthesized: match {}% → {}% ({:+.2} pts)",
        analysis.original_metrics.match_percentage,
        analysis.final_metrics.match_percentage,
        analysis.improvement()
    );

    Ok(SynthesizedResume {
        optimized_resume,
        analysis,
    })
}

fn build_resume_system(suggestions: &KeywordSuggestions) -> String {
    let keywords = suggestions.steering_string();
    fill_template(
        RESUME_SYSTEM_TEMPLATE,
        &[
            ("suggested_keywords", keywords.as_str()),
            ("truthfulness_instruction", TRUTHFULNESS_INSTRUCTION),
            ("plain_text_output", PLAIN_TEXT_OUTPUT),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::keywords::PARSE_ERROR_MARKER;
    use crate::llm_client::testing::ScriptedProvider;
    use crate::llm_client::LlmError;

    const JD: &str = "Requires Python, AWS, and Docker experience for backend development";
    const RESUME: &str = "I have years of experience with backend development";
    const KEYWORD_REPLY: &str =
        "Top 22 Keywords:\nPython, Docker\n\nAdditional 10 Keywords:\nKubernetes, CI/CD";
    const OPTIMIZED: &str = "Summary\nBackend engineer. Requires nothing; Python and Docker \
        experience across backend development.\n\nExperience\n...";

    #[tokio::test]
    async fn test_synthesize_returns_reply_verbatim_and_rescores() {
        let llm = ScriptedProvider::replying(&[KEYWORD_REPLY, OPTIMIZED]);
        let result = synthesize(&llm, JD, RESUME).await.unwrap();

        assert_eq!(result.optimized_resume, OPTIMIZED);
        assert_eq!(result.analysis.original_metrics.match_percentage, 50.0);
        assert_eq!(result.analysis.final_metrics.total_keywords, 6);
        assert_eq!(result.analysis.final_metrics.matched_keywords, 6);
        assert_eq!(result.analysis.final_metrics.match_percentage, 100.0);
        assert!(result.analysis.improvement() > 0.0);
        assert_eq!(result.analysis.top_keywords, vec!["python", "docker"]);
        assert_eq!(result.analysis.additional_keywords, vec!["kubernetes", "ci/cd"]);
    }

    #[tokio::test]
    async fn test_synthesis_prompt_carries_steering_keywords() {
        let llm = ScriptedProvider::replying(&[KEYWORD_REPLY, OPTIMIZED]);
        synthesize(&llm, JD, RESUME).await.unwrap();

        let calls = llm.calls();
        assert_eq!(calls.len(), 2);
        let synthesis = &calls[1];
        assert!(synthesis.system.contains("python, docker, kubernetes, ci/cd"));
        assert!(synthesis.system.contains("Summary"));
        assert!(synthesis.system.contains(TRUTHFULNESS_INSTRUCTION));
        assert!(synthesis.prompt.contains(JD));
        assert!(synthesis.prompt.contains(RESUME));
        assert!(!synthesis.system.contains("{suggested_keywords}"));
    }

    #[tokio::test]
    async fn test_placeholder_text_in_inputs_is_not_expanded() {
        let reply = "Top 22 Keywords:\nPython, {truthfulness_instruction}\n\n\
            Additional 10 Keywords:\nKubernetes";
        let jd = format!("{JD}. Paste {{resume_text}} below.");
        let llm = ScriptedProvider::replying(&[reply, OPTIMIZED]);
        synthesize(&llm, &jd, RESUME).await.unwrap();

        let synthesis = &llm.calls()[1];
        assert!(synthesis.system.contains("python, {truthfulness_instruction}"));
        assert_eq!(synthesis.system.matches(TRUTHFULNESS_INSTRUCTION).count(), 1);
        assert!(synthesis.prompt.contains("Paste {resume_text} below."));
        assert_eq!(synthesis.prompt.matches(RESUME).count(), 1);
    }

    #[tokio::test]
    async fn test_synthesis_continues_with_fallback_keywords() {
        let llm = ScriptedProvider::replying(&["no headings here", OPTIMIZED]);
        let result = synthesize(&llm, JD, RESUME).await.unwrap();

        assert_eq!(result.analysis.top_keywords, vec![PARSE_ERROR_MARKER]);
        assert_eq!(result.analysis.original_metrics, OverlapMetrics::zero());
        assert_eq!(result.optimized_resume, OPTIMIZED);
    }

    #[tokio::test]
    async fn test_synthesis_call_failure_is_terminal() {
        let llm = ScriptedProvider::new(vec![
            Ok(KEYWORD_REPLY.to_string()),
            Err(LlmError::Timeout(120)),
        ]);
        let err = synthesize(&llm, JD, RESUME).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(msg) if msg.contains("timed out")));
    }

    #[test]
    fn test_combined_analysis_serializes_report_field_names() {
        let analysis = CombinedAnalysis {
            original_metrics: OverlapMetrics::zero(),
            final_metrics: OverlapMetrics {
                total_keywords: 4,
                matched_keywords: 3,
                match_percentage: 75.0,
            },
            top_keywords: vec!["rust".into()],
            additional_keywords: vec!["tokio".into()],
        };
        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["original_metrics"]["total_keywords"], 0);
        assert_eq!(value["final_metrics"]["match_percentage"], 75.0);
        assert_eq!(value["top_22_keywords"][0], "rust");
        assert_eq!(value["additional_10_keywords"][0], "tokio");
    }
}
