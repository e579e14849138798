// Shared prompt fragments.
// Each stage that calls the LLM keeps its own templates in generation/prompts.rs;
// this file holds the cross-cutting pieces they splice in.

/// Appended to every instruction that produces a document for the candidate.
pub const TRUTHFULNESS_INSTRUCTION: &str = "\
    CRITICAL: Only describe experience, skills, employers, dates and achievements \
    that the source resume supports. You may rephrase and quantify what is there, \
    but do NOT invent roles, certifications, metrics or projects. \
    Never attach a keyword to an achievement the resume does not support.";

/// Keeps replies as plain text so they can be exported verbatim.
pub const PLAIN_TEXT_OUTPUT: &str = "\
    Respond with the document text only. \
    Do NOT wrap it in code fences. \
    Do NOT add commentary before or after the document.";
