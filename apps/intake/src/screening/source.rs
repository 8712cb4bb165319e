//! Input loading for the screening batch: job description, template and CVs.

use std::io::{self, ErrorKind};
use std::path::Path;

use tracing::debug;

use crate::errors::AppError;

/// Reads a startup input. Missing, unreadable or blank files are
/// configuration errors: the batch cannot run without them.
pub async fn load_required_text(path: &Path, what: &str) -> Result<String, AppError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) if !text.trim().is_empty() => Ok(text),
        Ok(_) => Err(AppError::Configuration(format!(
            "{what} file {} is empty",
            path.display()
        ))),
        Err(e) => Err(AppError::Configuration(format!(
            "cannot read {what} file {}: {e}",
            path.display()
        ))),
    }
}

/// Reads one CV as plain text. `.pdf` files go through text extraction.
pub async fn load_cv_text(path: &Path) -> Result<String, AppError> {
    let shown = path.display().to_string();

    let text = if is_pdf(path) {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AppError::io(&shown, e))?;
        debug!("Extracting text from PDF {} ({} bytes)", path.display(), bytes.len());
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
            AppError::io(
                &shown,
                io::Error::new(ErrorKind::InvalidData, format!("PDF text extraction failed: {e}")),
            )
        })?
    } else {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::io(&shown, e))?
    };

    if text.trim().is_empty() {
        return Err(AppError::io(
            &shown,
            io::Error::new(ErrorKind::InvalidData, "file contains no text"),
        ));
    }
    Ok(text)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}
