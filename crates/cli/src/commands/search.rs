//! Search command handler.
//!
//! Retrieval only: shows which FAQ records a query would be grounded on,
//! without calling the model.

use aurora_core::{config::AppConfig, AppResult};
use aurora_knowledge::{KnowledgeBase, RetrievedPassage};
use clap::Args;

/// Show the passages retrieved for a query
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Query text
    pub query: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");
        config.validate()?;

        let knowledge = KnowledgeBase::load(&config.corpus_path())?;
        let passages = knowledge.retrieve(
            &self.query,
            config.retrieval.top_k,
            config.retrieval.min_score,
        )?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&passages)?);
        } else if passages.is_empty() {
            println!(
                "No FAQ entries scored at least {:.2}",
                config.retrieval.min_score
            );
        } else {
            for passage in &passages {
                println!("{}", render_passage(passage));
            }
        }

        Ok(())
    }
}

fn render_passage(passage: &RetrievedPassage) -> String {
    format!(
        "{:.3}  {} {}\n       {}",
        passage.score,
        passage.record.citation(),
        passage.record.question,
        passage.record.answer
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_knowledge::FaqRecord;

    #[test]
    fn test_render_passage() {
        let passage = RetrievedPassage {
            record: FaqRecord::new(3, "Are fares changeable?", "For a fee.", None),
            score: 0.5,
        };
        assert_eq!(
            render_passage(&passage),
            "0.500  [FAQ:3] Are fares changeable?\n       For a fee."
        );
    }
}
