use thiserror::Error;

use crate::llm_client::LlmError;
use crate::pipeline::ErrorRecord;

/// Application-level error type.
///
/// Everything except `Configuration` is scoped to a single input: orchestrators
/// report it and move on to the next email or CV.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Malformed response: {}", .0.error)]
    MalformedResponse(Box<ErrorRecord>),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for an error that ends the run.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                2
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                1
            }
            other => {
                tracing::error!("{other}");
                1
            }
        }
    }
}
