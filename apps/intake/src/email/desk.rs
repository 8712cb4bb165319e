//! Email desk: the interactive classify-and-reply loop.
//!
//! Flow per email: build prompt → model call → enrich → print → append to log.
//! Only successful records reach the log. A failed log write never hides the
//! record from the operator.

use std::sync::Arc;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::email::log::AppendLog;
use crate::email::models::{EmailReply, LogEntry};
use crate::email::prompts;
use crate::errors::AppError;
use crate::llm_client::ModelInvoker;
use crate::pipeline::{self, EnrichedRecord};

const INPUT_PROMPT: &str = "\nPaste email body (or type 'quit' to exit): ";
const EXIT_COMMAND: &str = "quit";

pub struct EmailDesk {
    invoker: Arc<dyn ModelInvoker>,
    log: AppendLog,
}

/// One email that made it through the model.
#[derive(Debug)]
pub struct ClassifiedEmail {
    pub record: EnrichedRecord<EmailReply>,
    /// Entry count after the append, or why the append failed.
    pub logged: Result<usize, AppError>,
}

impl EmailDesk {
    pub fn new(invoker: Arc<dyn ModelInvoker>, log: AppendLog) -> Self {
        Self { invoker, log }
    }

    /// Classifies one email and appends it to the log on success. `Err` means
    /// the model produced nothing usable; log failures are reported in
    /// [`ClassifiedEmail::logged`].
    pub async fn process(&self, email_body: &str) -> Result<ClassifiedEmail, AppError> {
        let request = prompts::request(email_body);
        let record = pipeline::extract::<EmailReply>(self.invoker.as_ref(), &request).await?;

        let logged = self
            .log
            .append(LogEntry {
                original_email: email_body.to_string(),
                llm_response: record.clone(),
            })
            .await;

        Ok(ClassifiedEmail { record, logged })
    }

    /// Processes one email and prints the outcome. Never fails: every error is
    /// reported to the operator and the session continues.
    pub async fn handle(&self, email_body: &str) {
        println!("\n--- LLM Output (JSON) ---");
        match self.process(email_body).await {
            Ok(ClassifiedEmail { record, logged }) => {
                print_json(&record);
                if let Err(e) = logged {
                    error!("Failed to write log: {e}");
                    println!("The result above was not saved to the log: {e}");
                }
            }
            Err(AppError::MalformedResponse(record)) => print_json(&record),
            Err(e) => {
                error!("Email processing failed: {e}");
                println!("An error occurred during processing: {e}");
            }
        }
        println!("-------------------------\n");
    }

    /// Reads emails from the terminal until `quit`, Ctrl-C or end of input.
    pub async fn run_interactive(&self) -> Result<(), AppError> {
        info!(
            "Starting email classifier. Logs will be saved to {}.",
            self.log.path().display()
        );

        let mut editor = DefaultEditor::new().map_err(|e| AppError::Internal(e.into()))?;

        loop {
            match editor.readline(INPUT_PROMPT) {
                Ok(line) => {
                    if is_exit_command(&line) {
                        break;
                    }
                    if let Err(e) = editor.add_history_entry(line.as_str()) {
                        debug!("Failed to record input history: {e}");
                    }
                    self.handle(&line).await;
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => return Err(AppError::Internal(e.into())),
            }
        }

        info!("Email classifier stopped");
        Ok(())
    }
}

pub fn is_exit_command(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(EXIT_COMMAND)
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => error!("Failed to render output as JSON: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::models::Classification;
    use crate::llm_client::LlmError;
    use crate::pipeline::testing::ScriptedModel;
    use crate::pipeline::RejectReason;
    use chrono::Utc;

    const SUPPORT_REPLY: &str = r#"{
        "classification": "support",
        "subject": "Re: Order #123 status",
        "body": "Hello, we are checking on order #123 and will update you shortly.\n\nEasyAgents support team"
    }"#;

    fn desk(model: Arc<ScriptedModel>, dir: &tempfile::TempDir) -> EmailDesk {
        EmailDesk::new(model, AppendLog::new(dir.path().join("log.json")))
    }

    #[test]
    fn test_exit_command_is_case_insensitive() {
        assert!(is_exit_command("quit"));
        assert!(is_exit_command("  QUIT "));
        assert!(is_exit_command("Quit"));
        assert!(!is_exit_command("quite"));
        assert!(!is_exit_command(""));
    }

    #[tokio::test]
    async fn test_order_question_is_support_with_signature() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(ScriptedModel::new(vec![Ok(SUPPORT_REPLY)]));
        let desk = desk(model.clone(), &dir);

        let record = desk.process("Where is my order #123?").await.unwrap().record;

        assert_eq!(record.result.classification, Some(Classification::Support));
        assert!(!record.result.subject.as_deref().unwrap().is_empty());
        assert!(record.result.body.as_deref().unwrap().contains("EasyAgents support team"));

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].prompt.contains("Where is my order #123?"));
        assert_eq!(calls[0].temperature, None);
        assert_eq!(calls[0].required, vec!["classification", "subject", "body"]);
    }

    #[tokio::test]
    async fn test_timestamp_is_captured_before_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(ScriptedModel::new(vec![Ok(SUPPORT_REPLY)]));
        let desk = desk(model.clone(), &dir);

        let before = Utc::now();
        let record = desk.process("Where is my order #123?").await.unwrap().record;

        let invoked_at = model.calls()[0].invoked_at;
        assert!(record.timestamp >= before);
        assert!(record.timestamp <= invoked_at);
    }

    #[tokio::test]
    async fn test_first_success_creates_log_with_that_email() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(ScriptedModel::new(vec![Ok(SUPPORT_REPLY)]));
        let desk = desk(model, &dir);

        let record = desk.process("Where is my order #123?").await.unwrap().record;

        let entries = AppendLog::new(dir.path().join("log.json")).load().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].original_email, "Where is my order #123?");
        assert_eq!(entries[0].llm_response, record);
    }

    #[tokio::test]
    async fn test_malformed_response_is_not_logged() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(ScriptedModel::new(vec![Ok("I think this is support.")]));
        let desk = desk(model, &dir);

        let err = desk.process("Where is my order #123?").await.unwrap_err();
        match err {
            AppError::MalformedResponse(record) => {
                assert_eq!(record.reason, RejectReason::MalformedJson);
                assert_eq!(record.raw_output, "I think this is support.");
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
        assert!(!dir.path().join("log.json").exists());
    }

    #[tokio::test]
    async fn test_transport_error_is_not_logged_and_session_continues() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(ScriptedModel::new(vec![Err(503), Ok(SUPPORT_REPLY)]));
        let desk = desk(model, &dir);

        let err = desk.process("first").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(LlmError::Api { status: 503, .. })));

        desk.handle("second").await;

        let entries = AppendLog::new(dir.path().join("log.json")).load().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].original_email, "second");
    }

    #[tokio::test]
    async fn test_corrupt_log_plus_append_keeps_only_new_entry() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("log.json"), "{{{ definitely not json").unwrap();
        let model = Arc::new(ScriptedModel::new(vec![Ok(SUPPORT_REPLY)]));
        let desk = desk(model, &dir);

        let classified = desk.process("Where is my order #123?").await.unwrap();
        assert_eq!(classified.logged.unwrap(), 1);

        let entries = AppendLog::new(dir.path().join("log.json")).load().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].original_email, "Where is my order #123?");
    }

    #[tokio::test]
    async fn test_spam_reply_is_logged_with_dash_body() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(ScriptedModel::new(vec![Ok(
            r#"{"classification": "spam", "subject": "Re: You won!", "body": "Congratulations!"}"#,
        )]));
        let desk = desk(model, &dir);

        let record = desk.process("You won a free cruise!!!").await.unwrap().record;
        assert_eq!(record.result.classification, Some(Classification::Spam));
        assert_eq!(record.result.body.as_deref(), Some("-"));
    }

    #[tokio::test]
    async fn test_log_failure_still_returns_record() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("log.json")).unwrap();
        let model = Arc::new(ScriptedModel::new(vec![Ok(SUPPORT_REPLY)]));
        let desk = desk(model, &dir);

        let classified = desk.process("Where is my order #123?").await.unwrap();

        assert_eq!(classified.record.result.classification, Some(Classification::Support));
        assert!(matches!(classified.logged, Err(AppError::Io { .. })));
        assert!(dir.path().join("log.json").is_dir());
    }
}
