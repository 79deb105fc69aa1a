//! Corpus command handler.
//!
//! Lists the FAQ records the assistant answers from.

use aurora_core::{config::AppConfig, AppResult};
use aurora_knowledge::{load_corpus, FaqRecord};
use clap::Args;

/// List the loaded FAQ records
#[derive(Args, Debug)]
pub struct CorpusCommand {
    /// Print full answers instead of questions only
    #[arg(short, long)]
    pub detailed: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CorpusCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing corpus command");

        let path = config.corpus_path();
        let corpus = load_corpus(&path)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(corpus.records())?);
            return Ok(());
        }

        let origin = if path.exists() {
            path.display().to_string()
        } else {
            "built-in default set".to_string()
        };
        println!("{} FAQ record(s) from {}", corpus.len(), origin);

        for record in corpus.records() {
            println!("{}", self.render_record(record));
        }

        Ok(())
    }

    fn render_record(&self, record: &FaqRecord) -> String {
        let mut line = format!("{} {}", record.citation(), record.question);
        if let Some(ref source) = record.source {
            line.push_str(&format!(" ({})", source));
        }
        if self.detailed {
            line.push_str(&format!("\n    {}", record.answer));
        }
        line
    }
}
