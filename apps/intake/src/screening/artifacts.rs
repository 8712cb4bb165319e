//! Per-CV output artifacts: `<base>.json` and `<base>_report.md`.
//!
//! The two writes are independent. A failed report write leaves the JSON in
//! place and vice versa.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::errors::AppError;
use crate::pipeline::EnrichedRecord;
use crate::screening::models::ResumeAssessment;
use crate::screening::report::render_report;

/// Outcome of writing both artifacts for one CV.
#[derive(Debug)]
pub struct WrittenArtifacts {
    pub json: Result<PathBuf, AppError>,
    pub report: Result<PathBuf, AppError>,
}

impl WrittenArtifacts {
    pub fn all_written(&self) -> bool {
        self.json.is_ok() && self.report.is_ok()
    }
}

/// Base identifier for a CV path: the file name without its extension.
pub fn base_name(cv_path: &Path) -> String {
    cv_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cv".to_string())
}

/// Base names shared by more than one CV, in first-seen order. Their
/// artifacts overwrite each other within one output directory.
pub fn shared_base_names(cv_files: &[PathBuf]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut shared = Vec::new();
    for path in cv_files {
        let base = base_name(path);
        if !seen.insert(base.clone()) && !shared.contains(&base) {
            shared.push(base);
        }
    }
    shared
}

pub fn json_path(output_dir: &Path, base_name: &str) -> PathBuf {
    output_dir.join(format!("{base_name}.json"))
}

pub fn report_path(output_dir: &Path, base_name: &str) -> PathBuf {
    output_dir.join(format!("{base_name}_report.md"))
}

pub async fn write_artifacts(
    output_dir: &Path,
    cv_path: &Path,
    record: &EnrichedRecord<ResumeAssessment>,
) -> WrittenArtifacts {
    let base = base_name(cv_path);
    let cv_name = cv_path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| base.clone());

    let json = write_json(&json_path(output_dir, &base), record).await;
    match &json {
        Ok(path) => info!("   -> JSON result saved: {}", path.display()),
        Err(e) => error!("   -> JSON result not saved: {e}"),
    }

    let report = write_text(&report_path(output_dir, &base), &render_report(record, &cv_name)).await;
    match &report {
        Ok(path) => info!("   -> Markdown report saved: {}", path.display()),
        Err(e) => error!("   -> Markdown report not saved: {e}"),
    }

    WrittenArtifacts { json, report }
}

async fn write_json(
    path: &Path,
    record: &EnrichedRecord<ResumeAssessment>,
) -> Result<PathBuf, AppError> {
    let json = serde_json::to_string_pretty(record)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize record: {e}")))?;
    write_text(path, &json).await
}

async fn write_text(path: &Path, contents: &str) -> Result<PathBuf, AppError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| AppError::io(path.display().to_string(), e))?;
    Ok(path.to_path_buf())
}
