//! Chat command handler.
//!
//! Interactive loop over stdin. Every question is answered independently;
//! earlier turns are never fed back into retrieval or the prompt.

use aurora_core::{config::AppConfig, AppResult};
use aurora_knowledge::{ConversationTurn, FaqAssistant};
use clap::Args;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const EXIT_COMMANDS: [&str; 3] = ["exit", "quit", ":q"];

/// Interactive question-answering session
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Append every turn to this JSONL file
    #[arg(long)]
    pub transcript: Option<PathBuf>,
}

impl ChatCommand {
    /// Execute the chat command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let assistant = FaqAssistant::from_config(config)?;
        let mut transcript = self
            .transcript
            .as_deref()
            .map(Transcript::open)
            .transpose()?;

        eprintln!("Aurora Skies FAQ assistant. Type 'exit' to quit.");

        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        let turns = run_session(&assistant, stdin, &mut stdout, transcript.as_mut()).await?;

        tracing::info!("Chat session ended after {} question(s)", turns);
        Ok(())
    }
}

/// Answer each non-empty input line until EOF or an exit command.
///
/// Returns the number of questions answered.
pub async fn run_session<R, W>(
    assistant: &FaqAssistant,
    input: R,
    output: &mut W,
    mut transcript: Option<&mut Transcript>,
) -> AppResult<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut answered = 0;

    loop {
        eprint!("> ");
        std::io::stderr().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if EXIT_COMMANDS.contains(&question.to_lowercase().as_str()) {
            break;
        }

        let report = assistant.answer(question).await?;
        writeln!(output, "{}", report.answer.answer)?;
        output.flush()?;
        answered += 1;

        if let Some(transcript) = transcript.as_deref_mut() {
            transcript.append(&ConversationTurn::user(question))?;
            transcript.append(&ConversationTurn::assistant(report.answer.answer))?;
        }
    }

    Ok(answered)
}

/// Append-only JSONL log of conversation turns.
pub struct Transcript {
    file: File,
}

impl Transcript {
    pub fn open(path: &Path) -> AppResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing::debug!("Writing chat transcript to {:?}", path);
        Ok(Self { file })
    }

    pub fn append(&mut self, turn: &ConversationTurn) -> AppResult<()> {
        let line = serde_json::to_string(turn)?;
        writeln!(self.file, "{}", line)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_knowledge::TurnRole;
    use tempfile::TempDir;

    fn mock_assistant(workspace: &Path) -> FaqAssistant {
        let config = AppConfig {
            workspace: workspace.to_path_buf(),
            provider: "mock".to_string(),
            ..AppConfig::default()
        };
        FaqAssistant::from_config(&config).unwrap()
    }

    #[tokio::test]
    async fn test_session_answers_until_exit() {
        let temp_dir = TempDir::new().unwrap();
        let assistant = mock_assistant(temp_dir.path());

        let input = "what is the capital of France\n\n   \nexit\nnever asked\n";
        let mut output = Vec::new();
        let answered = run_session(&assistant, input.as_bytes(), &mut output, None)
            .await
            .unwrap();

        assert_eq!(answered, 1);
        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.lines().count(), 1);
        assert!(printed.contains("Aurora Skies support"));
    }

    #[tokio::test]
    async fn test_session_writes_transcript() {
        let temp_dir = TempDir::new().unwrap();
        let assistant = mock_assistant(temp_dir.path());
        let path = temp_dir.path().join("logs").join("chat.jsonl");
        let mut transcript = Transcript::open(&path).unwrap();

        let input = "Are taxes refundable on unused tickets?\n";
        let mut output = Vec::new();
        run_session(&assistant, input.as_bytes(), &mut output, Some(&mut transcript))
            .await
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let turns: Vec<ConversationTurn> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, TurnRole::User);
        assert_eq!(turns[0].content, "Are taxes refundable on unused tickets?");
        assert_eq!(turns[1].role, TurnRole::Assistant);
        assert!(turns[1].content.ends_with("[FAQ:5]"));
    }
}
