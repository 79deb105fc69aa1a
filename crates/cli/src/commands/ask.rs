//! Ask command handler.
//!
//! Answers one question through the full retrieval and grounding pipeline.

use aurora_core::{config::AppConfig, AppError, AppResult};
use aurora_knowledge::{AnswerReport, FaqAssistant};
use clap::Args;
use std::path::PathBuf;

/// Answer a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// Output as JSON (answer, outcome, citations and retrieved passages)
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let question = self.question_text()?;
        let assistant = FaqAssistant::from_config(config)?;
        let report = assistant.answer(&question).await?;

        if self.json {
            println!("{}", render_json(&report, config)?);
        } else {
            println!("{}", report.answer.answer);

            if tracing::enabled!(tracing::Level::DEBUG) {
                for passage in &report.passages {
                    tracing::debug!(
                        "Retrieved [FAQ:{}] score {:.3}: {}",
                        passage.record.id,
                        passage.score,
                        passage.record.question
                    );
                }
            }
        }

        Ok(())
    }

    /// Get the question text from the argument or the file.
    fn question_text(&self) -> AppResult<String> {
        let text = match (&self.question, &self.file) {
            (Some(question), _) => question.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)?,
            (None, None) => {
                return Err(AppError::Config("No question provided".to_string()));
            }
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Config("Question is empty".to_string()));
        }
        Ok(text.to_string())
    }
}

/// JSON document for `--json`: the report plus the model that produced it.
pub fn render_json(report: &AnswerReport, config: &AppConfig) -> AppResult<String> {
    let mut output = serde_json::to_value(report)?;
    if let Some(object) = output.as_object_mut() {
        object.insert("provider".to_string(), config.provider.clone().into());
        object.insert("model".to_string(), config.model.clone().into());
    }
    Ok(serde_json::to_string_pretty(&output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_knowledge::{AnswerOutcome, FaqRecord, GroundedAnswer, RetrievedPassage};
    use std::io::Write;

    fn command(question: Option<&str>, file: Option<PathBuf>) -> AskCommand {
        AskCommand {
            question: question.map(str::to_string),
            file,
            json: false,
        }
    }

    #[test]
    fn test_question_from_argument_is_trimmed() {
        let cmd = command(Some("  Can I get a refund?\n"), None);
        assert_eq!(cmd.question_text().unwrap(), "Can I get a refund?");
    }

    #[test]
    fn test_question_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Are taxes refundable?").unwrap();

        let cmd = command(None, Some(file.path().to_path_buf()));
        assert_eq!(cmd.question_text().unwrap(), "Are taxes refundable?");
    }

    #[test]
    fn test_missing_or_blank_question_fails() {
        assert!(command(None, None).question_text().is_err());
        assert!(command(Some("   "), None).question_text().is_err());
    }

    #[test]
    fn test_json_output_shape() {
        let report = AnswerReport {
            question: "refund?".to_string(),
            passages: vec![RetrievedPassage {
                record: FaqRecord::new(1, "Refund?", "Full refund.", Some("24-hour refund")),
                score: 0.42,
            }],
            answer: GroundedAnswer::new("Full refund. [FAQ:1]", AnswerOutcome::CitationRepaired, vec![1]),
        };
        let config = AppConfig {
            provider: "mock".to_string(),
            ..AppConfig::default()
        };

        let json: serde_json::Value =
            serde_json::from_str(&render_json(&report, &config).unwrap()).unwrap();
        assert_eq!(json["answer"], "Full refund. [FAQ:1]");
        assert_eq!(json["outcome"], "citation_repaired");
        assert_eq!(json["citations"][0], 1);
        assert_eq!(json["passages"][0]["source"], "24-hour refund");
        assert_eq!(json["provider"], "mock");
        assert_eq!(json["model"], "llama-3.1-8b-instant");
    }
}
