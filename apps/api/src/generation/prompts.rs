// All LLM prompt constants for the generation stages.
// Placeholders are `{name}` and are filled by `fill_template` before sending.

/// Heading the keyword reply must use for the 22 most important missing terms.
pub const TOP_KEYWORDS_HEADING: &str = "Top 22 Keywords:";

/// Heading the keyword reply must use for the 10 generally relevant terms.
pub const ADDITIONAL_KEYWORDS_HEADING: &str = "Additional 10 Keywords:";

/// System prompt for keyword suggestion. The reply format is load-bearing:
/// `keywords::parse_keyword_reply` looks for the two headings verbatim,
/// separated by a blank line.
pub const KEYWORD_SYSTEM: &str = "\
You are a technical keyword optimization specialist for applicant tracking systems. \
Analyze the job description and the current resume, then produce two lists:
1. The 22 most important technical keywords that appear in the job description but are missing from the resume.
2. 10 additional highly relevant keywords based on industry standards for this kind of role.

Format your response EXACTLY as follows, including the headings and the blank line between the lists:

Top 22 Keywords:
keyword1, keyword2, keyword3, keyword4, keyword5, keyword6, keyword7, keyword8, keyword9, keyword10, keyword11, keyword12, keyword13, keyword14, keyword15, keyword16, keyword17, keyword18, keyword19, keyword20, keyword21, keyword22

Additional 10 Keywords:
keyword1, keyword2, keyword3, keyword4, keyword5, keyword6, keyword7, keyword8, keyword9, keyword10

Separate keywords with a comma followed by a single space. Do not number them. Do not add any other text.";

/// Keyword suggestion user message. Replace `{job_description}` and `{resume_text}`.
pub const KEYWORD_PROMPT_TEMPLATE: &str = r#"Job Description:
{job_description}

Current Resume:
{resume_text}

Generate the requested keywords."#;

/// System prompt for resume synthesis.
/// Replace: {suggested_keywords}, {truthfulness_instruction}, {plain_text_output}
pub const RESUME_SYSTEM_TEMPLATE: &str = r#"You are an expert resume writer who specializes in applicant tracking system (ATS) optimization.
Rewrite the candidate's resume so it scores highly against the job description while remaining an honest account of their background.

ACHIEVEMENT FORMAT:
- Rewrite every experience and project bullet in STAR form: situation or task, the action the candidate took, and the measurable result.
- Lead each bullet with a strong action verb (Architected, Automated, Delivered, Led, Optimized, Scaled).
- Quantify results only with figures present in, or directly derivable from, the source resume.

ATS OPTIMIZATION:
- Use the exact phrasing of the job description's requirements where it truthfully applies.
- Spell out acronyms once alongside the short form, e.g. "Continuous Integration (CI)".
- Plain text only: no tables, columns, or images.

SECTION ORDER (use exactly these headings, in this order):
1. Summary
2. Experience
3. Skills
4. Education
5. Projects

KEYWORDS: include each of the following keywords verbatim at least once, placed where the resume supports them:
{suggested_keywords}

{truthfulness_instruction}

{plain_text_output}"#;

/// Resume synthesis user message. Replace `{job_description}` and `{resume_text}`.
pub const RESUME_PROMPT_TEMPLATE: &str = r#"Job Description:
{job_description}

Current Resume:
{resume_text}

Generate the optimized resume."#;

/// System prompt for the cover letter.
/// Replace: {today}, {truthfulness_instruction}, {plain_text_output}
pub const COVER_LETTER_SYSTEM_TEMPLATE: &str = r#"You are an expert cover letter writer with deep experience in recruiting and professional writing.

STRUCTURE:
- Professional business letter format, dated {today}, with the recipient's details when the job description names them and a proper salutation.
- 3-4 concise paragraphs, 250-350 words in total.

CONTENT:
- Opening: enthusiasm for the specific role and company.
- Body: the 2-3 achievements from the resume that best match the job requirements, using the job description's own keywords.
- Closing: request an interview and restate contact details from the resume.

STYLE:
- Professional yet personable tone.
- Mention technical skills, certifications and projects only when they appear in the resume.

{truthfulness_instruction}

{plain_text_output}"#;

/// Cover letter user message. Replace `{job_description}` and `{optimized_resume}`.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Job Description:
{job_description}

Optimized Resume:
{optimized_resume}

Generate a compelling cover letter."#;


/// Substitutes `{name}` placeholders in one pass over the template.
/// Substituted values are never rescanned, so braces inside user or model text
/// stay literal. Unknown placeholders are left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (close, *value))
        });
        match value {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_replaces_known_placeholders() {
        let filled = fill_template(
            "JD: {job_description}\nResume: {resume_text}",
            &[("job_description", "Rust"), ("resume_text", "Jane")],
        );
        assert_eq!(filled, "JD: Rust\nResume: Jane");
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let filled = fill_template(
            "{job_description} / {resume_text}",
            &[
                ("job_description", "mentions {resume_text} literally"),
                ("resume_text", "Jane"),
            ],
        );
        assert_eq!(filled, "mentions {resume_text} literally / Jane");
    }

    #[test]
    fn test_fill_template_keeps_unknown_and_unclosed_braces() {
        let filled = fill_template("{unknown} {name} {", &[("name", "x")]);
        assert_eq!(filled, "{unknown} x {");
    }
}
