//! Append log: the durable history of processed emails.
//!
//! The whole file is one JSON array. Every append reads the array, pushes one
//! entry and rewrites the file. Single writer only: two processes appending
//! concurrently can lose updates.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, warn};

use crate::email::models::LogEntry;
use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct AppendLog {
    path: PathBuf,
}

impl AppendLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the entries that match the current record shape. Entries written
    /// by older versions or edited by hand are skipped here but kept on disk.
    pub async fn load(&self) -> Result<Vec<LogEntry>, AppError> {
        let entries = self
            .load_raw()
            .await?
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping log entry #{index} in {}: {e}", self.path.display());
                    None
                }
            })
            .collect();
        Ok(entries)
    }

    /// Loads the array exactly as stored. A missing file is an empty log; so
    /// is a file that is not valid JSON or not an array, with a warning.
    pub async fn load_raw(&self) -> Result<Vec<Value>, AppError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::io(self.path.display().to_string(), e)),
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Array(entries)) => Ok(entries),
            Ok(other) => {
                warn!(
                    "{} does not hold a JSON array (found {}). Starting new log.",
                    self.path.display(),
                    json_kind(&other)
                );
                Ok(Vec::new())
            }
            Err(e) => {
                warn!(
                    "{} is corrupted or empty ({e}). Starting new log.",
                    self.path.display()
                );
                Ok(Vec::new())
            }
        }
    }

    /// Appends one entry and rewrites the file. Existing entries are written
    /// back untouched. Returns the new entry count.
    pub async fn append(&self, entry: LogEntry) -> Result<usize, AppError> {
        let entry = serde_json::to_value(&entry)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize log entry: {e}")))?;
        let mut entries = self.load_raw().await?;
        entries.push(entry);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::io(parent.display().to_string(), e))?;
        }

        let json = serde_json::to_vec_pretty(&entries)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize log: {e}")))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| AppError::io(self.path.display().to_string(), e))?;

        info!("Log updated successfully in {}.", self.path.display());
        Ok(entries.len())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
