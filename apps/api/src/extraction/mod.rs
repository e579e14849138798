// Resume ingestion: PDF upload → text → ordered segments.
// The pipeline only ever sees the segments; nothing downstream knows about PDFs.

pub mod pdf;
pub mod splitter;

use bytes::Bytes;

use crate::config::ChunkingConfig;
use crate::errors::AppError;
use crate::extraction::pdf::{extract_text, StagedUpload};
use crate::extraction::splitter::TextSplitter;

/// Stages, parses and chunks an uploaded PDF. The temporary file is gone by
/// the time this returns, whatever the outcome.
pub async fn extract_pdf_segments(
    data: &Bytes,
    chunking: ChunkingConfig,
) -> Result<Vec<String>, AppError> {
    let upload = StagedUpload::stage(data)?;
    let text = extract_text(&upload).await;
    drop(upload);

    Ok(TextSplitter::new(chunking).split(&text?))
}

/// Chunks resume text that arrived as plain text, so both entry points feed
/// the pipeline the same shape.
pub fn segment_text(text: &str, chunking: ChunkingConfig) -> Vec<String> {
    TextSplitter::new(chunking).split(text)
}

/// Joins segments in source order, one per line.
pub fn assemble_resume_text(segments: &[String]) -> String {
    segments.join("\n")
}
