//! Keyword overlap analyzer: how many distinct job-description terms show up
//! in a candidate text.
//!
//! Algorithm:
//! 1. Lower-case both texts.
//! 2. Split the job description on whitespace, trim punctuation off each
//!    token's edges, keep tokens longer than 3 characters (a length-only
//!    stop-word filter: "and", "the", "for" fall out).
//! 3. Deduplicate.
//! 4. A token matches when it occurs as a substring anywhere in the candidate
//!    text. This is containment, not whole-word matching: "java" matches
//!    "javascript". Kept for compatibility with existing scores.
//! 5. match_percentage = round(matched / total * 100, 2), or 0 when total is 0.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Tokens must be strictly longer than this many characters to count.
const MIN_TOKEN_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlapMetrics {
    pub total_keywords: usize,
    pub matched_keywords: usize,
    /// 0.0 to 100.0, two decimals.
    pub match_percentage: f64,
}

impl OverlapMetrics {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Scores `candidate_text` against the distinct long terms of `job_description`.
pub fn analyze(job_description: &str, candidate_text: &str) -> OverlapMetrics {
    let candidate = candidate_text.to_lowercase();
    let terms = job_terms(job_description);

    let matched = terms
        .iter()
        .filter(|term| candidate.contains(term.as_str()))
        .count();

    OverlapMetrics {
        total_keywords: terms.len(),
        matched_keywords: matched,
        match_percentage: percentage(matched, terms.len()),
    }
}

/// Distinct lower-cased job-description tokens that pass the length filter.
fn job_terms(job_description: &str) -> HashSet<String> {
    job_description
        .to_lowercase()
        .split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|token| token.chars().count() > MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

fn percentage(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = matched as f64 / total as f64 * 100.0;
    // Exact halves go to the even neighbour: 1/32 = 3.125 → 3.12.
    (raw * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const JD: &str = "Requires Python, AWS, and Docker experience for backend development";
    const RESUME: &str = "I have years of experience with backend development";

    #[test]
    fn test_worked_example_scores_fifty_percent() {
        let metrics = analyze(JD, RESUME);
        // requires, python, docker, experience, backend, development ("aws" is 3 chars)
        assert_eq!(metrics.total_keywords, 6);
        assert_eq!(metrics.matched_keywords, 3);
        assert_eq!(metrics.match_percentage, 50.0);
    }

    #[test]
    fn test_empty_job_description_scores_zero() {
        let metrics = analyze("", RESUME);
        assert_eq!(metrics, OverlapMetrics::zero());

        let metrics = analyze("a an the for and", RESUME);
        assert_eq!(metrics.total_keywords, 0);
        assert_eq!(metrics.match_percentage, 0.0);
    }

    #[test]
    fn test_empty_candidate_matches_nothing() {
        let metrics = analyze(JD, "");
        assert_eq!(metrics.total_keywords, 6);
        assert_eq!(metrics.matched_keywords, 0);
        assert_eq!(metrics.match_percentage, 0.0);
    }

    #[test]
    fn test_percentage_rounded_to_two_decimals() {
        // 1 of 3 → 33.333… → 33.33
        let metrics = analyze("kubernetes terraform ansible", "Terraform modules");
        assert_eq!(metrics.total_keywords, 3);
        assert_eq!(metrics.matched_keywords, 1);
        assert_eq!(metrics.match_percentage, 33.33);

        // 2 of 3 → 66.666… → 66.67
        let metrics = analyze("kubernetes terraform ansible", "terraform and ansible");
        assert_eq!(metrics.match_percentage, 66.67);
    }

    #[test]
    fn test_exact_halves_round_to_even() {
        let jd = (0..32)
            .map(|i| format!("tok{i:02}x"))
            .collect::<Vec<_>>()
            .join(" ");

        // 1 of 32 → 3.125 → 3.12
        let metrics = analyze(&jd, "tok00x");
        assert_eq!(metrics.total_keywords, 32);
        assert_eq!(metrics.matched_keywords, 1);
        assert_eq!(metrics.match_percentage, 3.12);

        // 3 of 32 → 9.375 → 9.38
        let metrics = analyze(&jd, "tok00x tok01x tok02x");
        assert_eq!(metrics.match_percentage, 9.38);

        // 5 of 32 → 15.625 → 15.62
        let metrics = analyze(&jd, "tok00x tok01x tok02x tok03x tok04x");
        assert_eq!(metrics.match_percentage, 15.62);
    }

    #[test]
    fn test_case_insensitive_matching() {
        let metrics = analyze("KUBERNETES and Go", "kubernetes operators");
        assert_eq!(metrics.total_keywords, 1);
        assert_eq!(metrics.matched_keywords, 1);
        assert_eq!(metrics.match_percentage, 100.0);
    }

    #[test]
    fn test_duplicate_terms_count_once() {
        let metrics = analyze("python python PYTHON python.", "python");
        assert_eq!(metrics.total_keywords, 1);
        assert_eq!(metrics.matched_keywords, 1);
    }

    #[test]
    fn test_substring_containment_counts_as_match() {
        // "java" is inside "javascript"; containment is intentional.
        let metrics = analyze("java", "Senior JavaScript developer");
        assert_eq!(metrics.matched_keywords, 1);
    }

    #[test]
    fn test_length_filter_uses_characters_not_bytes() {
        // "café" is 4 chars (5 bytes) → kept; "été" is 3 chars → dropped.
        let metrics = analyze("café été", "café au lait");
        assert_eq!(metrics.total_keywords, 1);
        assert_eq!(metrics.matched_keywords, 1);
    }

    #[test]
    fn test_token_order_does_not_change_result() {
        let shuffled = "development backend for experience Docker and AWS, Python, Requires";
        assert_eq!(analyze(JD, RESUME), analyze(shuffled, RESUME));
    }

    #[test]
    fn test_percentage_always_within_bounds() {
        let cases = [
            ("", ""),
            ("rust rust rust", "rust"),
            (JD, RESUME),
            (JD, JD),
            ("   \n\t  ", "anything"),
        ];
        for (jd, text) in cases {
            let m = analyze(jd, text);
            assert!(m.matched_keywords <= m.total_keywords);
            assert!((0.0..=100.0).contains(&m.match_percentage), "{m:?}");
        }
        assert_eq!(analyze(JD, JD).match_percentage, 100.0);
    }
}
