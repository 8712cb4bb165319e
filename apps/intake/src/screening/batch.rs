//! CV screening batch: scores every configured CV against one job description.
//!
//! Flow: load JD + template (fatal if missing) → for each CV: load text →
//! build prompt → model call → enrich → write JSON + Markdown artifacts.
//! A bad CV never stops the batch.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::ModelInvoker;
use crate::pipeline::{self, EnrichedRecord};
use crate::screening::artifacts::{json_path, shared_base_names, write_artifacts, WrittenArtifacts};
use crate::screening::models::ResumeAssessment;
use crate::screening::prompts;
use crate::screening::source::{load_cv_text, load_required_text};

/// Paths and model settings for one batch run.
#[derive(Debug, Clone)]
pub struct ScreeningSettings {
    pub jd_path: PathBuf,
    pub prompt_path: PathBuf,
    pub cv_files: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub temperature: f32,
}

impl ScreeningSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            jd_path: config.jd_path.clone(),
            prompt_path: config.prompt_path.clone(),
            cv_files: config.cv_files.clone(),
            output_dir: config.output_dir.clone(),
            temperature: config.screening_temperature,
        }
    }
}

/// Per-run tally reported to the operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Both artifacts written.
    pub processed: usize,
    /// CV file missing, unreadable or empty.
    pub skipped: usize,
    /// Model call failed, response unusable, or an artifact write failed.
    pub failed: usize,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} processed, {} skipped, {} failed",
            self.processed, self.skipped, self.failed
        )
    }
}

/// One CV that made it through the model.
#[derive(Debug)]
pub struct ScreenedCv {
    pub record: EnrichedRecord<ResumeAssessment>,
    pub artifacts: WrittenArtifacts,
}

pub struct Screener {
    invoker: Arc<dyn ModelInvoker>,
    settings: ScreeningSettings,
}

impl Screener {
    pub fn new(invoker: Arc<dyn ModelInvoker>, settings: ScreeningSettings) -> Self {
        Self { invoker, settings }
    }

    /// Runs the whole batch. Only startup problems (missing JD or template,
    /// unusable output directory) return `Err`.
    pub async fn run(&self) -> Result<BatchSummary, AppError> {
        let jd_text = load_required_text(&self.settings.jd_path, "job description").await?;
        let template = load_required_text(&self.settings.prompt_path, "instruction template").await?;

        let missing = prompts::missing_placeholders(&template);
        if !missing.is_empty() {
            return Err(AppError::Configuration(format!(
                "instruction template {} is missing placeholders: {}",
                self.settings.prompt_path.display(),
                missing.join(", ")
            )));
        }

        tokio::fs::create_dir_all(&self.settings.output_dir)
            .await
            .map_err(|e| AppError::io(self.settings.output_dir.display().to_string(), e))?;

        info!(
            "Screening {} CV(s) against {}",
            self.settings.cv_files.len(),
            self.settings.jd_path.display()
        );

        for base in shared_base_names(&self.settings.cv_files) {
            warn!(
                "Several CVs share the name '{base}'; later results overwrite {} and its report",
                json_path(&self.settings.output_dir, &base).display()
            );
        }

        let mut summary = BatchSummary::default();
        for cv_path in &self.settings.cv_files {
            match self.process_cv(cv_path, &jd_text, &template).await {
                Ok(screened) if screened.artifacts.all_written() => summary.processed += 1,
                Ok(_) => summary.failed += 1,
                Err(AppError::Io { path, source }) => {
                    warn!("Skipping {path}: {source}");
                    summary.skipped += 1;
                }
                Err(AppError::MalformedResponse(record)) => {
                    error!("{}: {}", cv_path.display(), record.error);
                    match serde_json::to_string_pretty(&record) {
                        Ok(json) => println!("{json}"),
                        Err(e) => error!("Failed to render error record: {e}"),
                    }
                    summary.failed += 1;
                }
                Err(e) => {
                    error!("Error while screening {}: {e}", cv_path.display());
                    summary.failed += 1;
                }
            }
        }

        info!("Screening finished: {summary}");
        Ok(summary)
    }

    /// Screens one CV and writes its artifacts.
    pub async fn process_cv(
        &self,
        cv_path: &Path,
        jd_text: &str,
        template: &str,
    ) -> Result<ScreenedCv, AppError> {
        info!("--- Processing: {} ---", cv_path.display());

        let cv_text = load_cv_text(cv_path).await?;
        let request = prompts::request(template, jd_text, &cv_text, self.settings.temperature);
        let record = pipeline::extract::<ResumeAssessment>(self.invoker.as_ref(), &request).await?;

        if let Some(score) = record.result.match_score {
            info!("   -> match score {score}/100");
        }

        let artifacts = write_artifacts(&self.settings.output_dir, cv_path, &record).await;
        Ok(ScreenedCv { record, artifacts })
    }
}
