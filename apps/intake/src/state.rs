use std::sync::Arc;

use crate::config::Config;
use crate::email::desk::EmailDesk;
use crate::email::log::AppendLog;
use crate::errors::AppError;
use crate::llm_client::{LlmClient, ModelInvoker};
use crate::screening::batch::{ScreeningSettings, Screener};

/// Process-wide handles, built once in `main` and passed into each component.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: Arc<dyn ModelInvoker>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let llm = LlmClient::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.gemini_base_url.clone(),
        )?;
        Ok(Self {
            config,
            llm: Arc::new(llm),
        })
    }

    pub fn email_desk(&self) -> EmailDesk {
        EmailDesk::new(self.llm.clone(), AppendLog::new(&self.config.log_file))
    }

    pub fn screener(&self) -> Screener {
        Screener::new(self.llm.clone(), ScreeningSettings::from_config(&self.config))
    }
}
