//! PDF text extraction.
//!
//! The upload is staged to a temporary `.pdf` file that is removed when the
//! `StagedUpload` is dropped, on every path including errors and panics.

use std::io::Write;
use std::path::Path;

use anyhow::Context;
use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::errors::AppError;

/// An uploaded document held in temporary storage for the life of a request.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
}

impl StagedUpload {
    pub fn stage(data: &Bytes) -> Result<Self, AppError> {
        let mut file = tempfile::Builder::new()
            .prefix("resume-")
            .suffix(".pdf")
            .tempfile()
            .context("Failed to create temporary file for upload")?;
        file.write_all(data)
            .context("Failed to write upload to temporary file")?;
        file.flush().context("Failed to flush temporary upload")?;

        debug!(
            "Staged {} byte upload at {}",
            data.len(),
            file.path().display()
        );
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Extracts the text of a staged PDF on the blocking pool.
/// Parser errors and parser panics both surface as `AppError::Extraction`.
pub async fn extract_text(upload: &StagedUpload) -> Result<String, AppError> {
    let path = upload.path().to_path_buf();

    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
        .await
        .map_err(|e| AppError::Extraction(format!("PDF parser aborted: {e}")))?
        .map_err(|e| AppError::Extraction(format!("PDF parsing failed: {e}")))?;

    info!("Extracted {} characters from PDF", text.chars().count());
    Ok(text)
}
