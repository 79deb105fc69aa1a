//! Configuration management for the Aurora FAQ assistant.
//!
//! Configuration is merged from, in increasing precedence:
//! - Built-in defaults
//! - The workspace config file (`.aurora/config.yaml`)
//! - Environment variables (`AURORA_*`, `RUST_LOG`, `NO_COLOR`)
//! - Command-line flags
//!
//! Everything here is fixed at process start; nothing is mutable per request.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Name of the per-workspace state directory.
pub const STATE_DIR: &str = ".aurora";

/// Default CSV corpus file looked up in the workspace.
pub const DEFAULT_CORPUS_FILE: &str = "airline_faq.csv";

/// Providers the LLM factory knows how to build.
pub const KNOWN_PROVIDERS: [&str; 4] = ["groq", "openai", "ollama", "mock"];

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .aurora/ and the CSV corpus)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// LLM provider ("groq", "openai", "ollama", "mock")
    pub provider: String,

    /// Model identifier sent with every completion request
    pub model: String,

    /// Custom provider endpoint (base URL)
    pub endpoint: Option<String>,

    /// Explicit API key (takes precedence over `api_key_env`)
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Environment variable holding the provider API key
    pub api_key_env: String,

    /// Per-request timeout for completion calls, in seconds
    pub timeout_secs: Option<u64>,

    /// Retrieval parameters
    pub retrieval: RetrievalSettings,

    /// Explicit corpus CSV path (relative paths resolve against the workspace)
    pub corpus_path: Option<PathBuf>,

    /// Fixed user-facing messages
    pub messages: AssistantMessages,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Emit logs as JSON lines
    pub log_json: bool,
}

/// Retrieval parameters: result cap and similarity floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetrievalSettings {
    /// Maximum passages returned per query
    pub top_k: usize,

    /// Minimum cosine similarity for a passage to be kept, in [0, 1]
    pub min_score: f32,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 4,
            min_score: 0.15,
        }
    }
}

/// Fixed messages shown when the pipeline cannot produce a grounded answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessages {
    /// Returned when nothing in the FAQ matches and the input is not smalltalk
    pub refusal: String,

    /// Returned when the completion service fails
    pub unavailable: String,
}

impl Default for AssistantMessages {
    fn default() -> Self {
        Self {
            refusal: "I don\u{2019}t have enough info from the FAQ. Please contact Aurora Skies support."
                .to_string(),
            unavailable: "Sorry, the model service is temporarily unavailable.".to_string(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    retrieval: Option<RetrievalSection>,
    corpus: Option<CorpusSection>,
    assistant: Option<AssistantSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    api_key_env: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalSection {
    top_k: Option<usize>,
    min_score: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CorpusSection {
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssistantSection {
    refusal_message: Option<String>,
    unavailable_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
    json: Option<bool>,
}

/// Command-line overrides applied on top of file and environment settings.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub top_k: Option<usize>,
    pub min_score: Option<f32>,
    pub corpus: Option<PathBuf>,
    pub log_level: Option<String>,
    pub verbose: bool,
    pub no_color: bool,
    pub log_json: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "groq".to_string(),
            model: "llama-3.1-8b-instant".to_string(),
            endpoint: None,
            api_key: None,
            api_key_env: "GROQ_API_KEY".to_string(),
            timeout_secs: Some(30),
            retrieval: RetrievalSettings::default(),
            corpus_path: None,
            messages: AssistantMessages::default(),
            log_level: None,
            verbose: false,
            no_color: false,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the config file, and the environment.
    ///
    /// `workspace` and `config_file` come from the command line (clap also
    /// reads `AURORA_WORKSPACE` / `AURORA_CONFIG` for them). When no config
    /// file is given, `<workspace>/.aurora/config.yaml` is used if present.
    ///
    /// Environment variables:
    /// - `AURORA_PROVIDER`, `AURORA_MODEL`, `AURORA_ENDPOINT`
    /// - `AURORA_API_KEY`: explicit API key
    /// - `AURORA_TOP_K`, `AURORA_MIN_SCORE`: retrieval parameters
    /// - `RUST_LOG`: log level
    /// - `NO_COLOR`: disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use aurora_core::config::AppConfig;
    ///
    /// let config = AppConfig::load(None, None).expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) = workspace {
            config.workspace = workspace;
        }
        config.config_file = config_file;

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => {
                if !cf.exists() {
                    return Err(AppError::Config(format!(
                        "Config file does not exist: {:?}",
                        cf
                    )));
                }
                cf.clone()
            }
            None => config.aurora_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
            tracing::debug!("Merged config file {:?}", config_path);
        }

        config.apply_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Merge a YAML configuration file into a copy of this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        self.merge_yaml_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config file {:?}: {}", path, e)))
    }

    fn merge_yaml_str(&self, contents: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to null
        let config_file: ConfigFile =
            serde_yaml::from_str::<Option<ConfigFile>>(contents)?.unwrap_or_default();

        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if llm.endpoint.is_some() {
                result.endpoint = llm.endpoint;
            }
            if let Some(api_key_env) = llm.api_key_env {
                result.api_key_env = api_key_env;
            }
            if llm.timeout_secs.is_some() {
                result.timeout_secs = llm.timeout_secs;
            }
        }

        if let Some(retrieval) = config_file.retrieval {
            if let Some(top_k) = retrieval.top_k {
                result.retrieval.top_k = top_k;
            }
            if let Some(min_score) = retrieval.min_score {
                result.retrieval.min_score = min_score;
            }
        }

        if let Some(corpus) = config_file.corpus {
            if corpus.path.is_some() {
                result.corpus_path = corpus.path;
            }
        }

        if let Some(assistant) = config_file.assistant {
            if let Some(refusal) = assistant.refusal_message {
                result.messages.refusal = refusal;
            }
            if let Some(unavailable) = assistant.unavailable_message {
                result.messages.unavailable = unavailable;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
            if let Some(json) = logging.json {
                result.log_json = json;
            }
        }

        Ok(result)
    }

    /// Apply environment overrides through `lookup`.
    fn apply_env<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("AURORA_PROVIDER") {
            self.provider = provider;
        }

        if let Some(model) = lookup("AURORA_MODEL") {
            self.model = model;
        }

        if let Some(endpoint) = lookup("AURORA_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }

        if let Some(key) = lookup("AURORA_API_KEY") {
            self.api_key = Some(key);
        }

        if let Some(top_k) = lookup("AURORA_TOP_K") {
            self.retrieval.top_k = top_k.trim().parse().map_err(|e| {
                AppError::Config(format!("Invalid AURORA_TOP_K '{}': {}", top_k, e))
            })?;
        }

        if let Some(min_score) = lookup("AURORA_MIN_SCORE") {
            self.retrieval.min_score = min_score.trim().parse().map_err(|e| {
                AppError::Config(format!("Invalid AURORA_MIN_SCORE '{}': {}", min_score, e))
            })?;
        }

        if let Some(level) = lookup("RUST_LOG") {
            self.log_level = Some(level);
        }

        if lookup("NO_COLOR").is_some() {
            self.no_color = true;
        }

        Ok(())
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over the environment and the file.
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(provider) = overrides.provider {
            self.provider = provider;
        }

        if let Some(model) = overrides.model {
            self.model = model;
        }

        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = Some(endpoint);
        }

        if let Some(top_k) = overrides.top_k {
            self.retrieval.top_k = top_k;
        }

        if let Some(min_score) = overrides.min_score {
            self.retrieval.min_score = min_score;
        }

        if let Some(corpus) = overrides.corpus {
            self.corpus_path = Some(corpus);
        }

        if let Some(log_level) = overrides.log_level {
            self.log_level = Some(log_level);
        }

        if overrides.verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if overrides.no_color {
            self.no_color = true;
        }

        if overrides.log_json {
            self.log_json = true;
        }

        self
    }

    /// Get the path to the .aurora directory.
    pub fn aurora_dir(&self) -> PathBuf {
        self.workspace.join(STATE_DIR)
    }

    /// Directory holding prompt overrides.
    pub fn prompts_dir(&self) -> PathBuf {
        self.aurora_dir().join("prompts")
    }

    /// Resolve the corpus CSV path.
    pub fn corpus_path(&self) -> PathBuf {
        match self.corpus_path {
            Some(ref path) if path.is_absolute() => path.clone(),
            Some(ref path) => self.workspace.join(path),
            None => self.workspace.join(DEFAULT_CORPUS_FILE),
        }
    }

    /// Per-request completion timeout, if any.
    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(std::time::Duration::from_secs)
    }

    /// Whether the active provider needs an API key.
    pub fn provider_requires_api_key(&self) -> bool {
        matches!(self.provider.to_lowercase().as_str(), "groq" | "openai")
    }

    /// Resolve the API key: explicit key first, then `api_key_env`.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    /// Validate retrieval settings and the provider name.
    pub fn validate(&self) -> AppResult<()> {
        let provider = self.provider.to_lowercase();
        if !KNOWN_PROVIDERS.contains(&provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                KNOWN_PROVIDERS.join(", ")
            )));
        }

        if self.retrieval.top_k == 0 {
            return Err(AppError::Config("topK must be at least 1".to_string()));
        }

        let min_score = self.retrieval.min_score;
        if !min_score.is_finite() || !(0.0..=1.0).contains(&min_score) {
            return Err(AppError::Config(format!(
                "minScore must be within [0, 1], got {}",
                min_score
            )));
        }

        Ok(())
    }

    /// Validate that the active provider can actually be reached.
    ///
    /// Only commands that generate answers need this; `search` and `corpus`
    /// work without credentials.
    pub fn validate_for_generation(&self) -> AppResult<()> {
        self.validate()?;

        if self.provider_requires_api_key() && self.resolve_api_key().is_none() {
            return Err(AppError::Config(format!(
                "API key not found. Set AURORA_API_KEY or {}",
                self.api_key_env
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.provider, "groq");
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.retrieval.top_k, 4);
        assert!((config.retrieval.min_score - 0.15).abs() < f32::EPSILON);
        assert!(!config.verbose);
        assert!(!config.no_color);
    }

    #[test]
    fn test_corpus_path_resolution() {
        let mut config = AppConfig {
            workspace: PathBuf::from("/srv/faq"),
            ..AppConfig::default()
        };
        assert_eq!(config.corpus_path(), PathBuf::from("/srv/faq/airline_faq.csv"));

        config.corpus_path = Some(PathBuf::from("data/faq.csv"));
        assert_eq!(config.corpus_path(), PathBuf::from("/srv/faq/data/faq.csv"));

        config.corpus_path = Some(PathBuf::from("/tmp/other.csv"));
        assert_eq!(config.corpus_path(), PathBuf::from("/tmp/other.csv"));
    }

    #[test]
    fn test_merge_yaml() {
        let yaml = r#"
llm:
  provider: ollama
  model: llama3.2
  endpoint: http://localhost:11434
  timeoutSecs: 10
retrieval:
  topK: 2
  minScore: 0.3
corpus:
  path: faq.csv
assistant:
  refusalMessage: "Please call us."
logging:
  level: debug
  color: false
"#;
        let merged = AppConfig::default().merge_yaml_str(yaml).unwrap();
        assert_eq!(merged.provider, "ollama");
        assert_eq!(merged.model, "llama3.2");
        assert_eq!(merged.endpoint.as_deref(), Some("http://localhost:11434"));
        assert_eq!(merged.timeout_secs, Some(10));
        assert_eq!(merged.retrieval.top_k, 2);
        assert!((merged.retrieval.min_score - 0.3).abs() < f32::EPSILON);
        assert_eq!(merged.corpus_path, Some(PathBuf::from("faq.csv")));
        assert_eq!(merged.messages.refusal, "Please call us.");
        assert_eq!(
            merged.messages.unavailable,
            AssistantMessages::default().unavailable
        );
        assert_eq!(merged.log_level.as_deref(), Some("debug"));
        assert!(merged.no_color);
    }

    #[test]
    fn test_merge_empty_yaml_keeps_defaults() {
        let merged = AppConfig::default().merge_yaml_str("").unwrap();
        assert_eq!(merged.provider, "groq");
        assert_eq!(merged.retrieval, RetrievalSettings::default());
    }

    #[test]
    fn test_load_reads_workspace_config_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(STATE_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.yaml"), "retrieval:\n  topK: 7\n").unwrap();

        let config = AppConfig::load(Some(temp.path().to_path_buf()), None).unwrap();
        assert_eq!(config.retrieval.top_k, 7);
    }

    #[test]
    fn test_load_missing_workspace() {
        let result = AppConfig::load(Some(PathBuf::from("/definitely/not/here")), None);
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_apply_env() {
        let vars: HashMap<&str, &str> = [
            ("AURORA_PROVIDER", "mock"),
            ("AURORA_TOP_K", "3"),
            ("AURORA_MIN_SCORE", "0.25"),
            ("AURORA_API_KEY", "secret"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_env(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.provider, "mock");
        assert_eq!(config.retrieval.top_k, 3);
        assert!((config.retrieval.min_score - 0.25).abs() < f32::EPSILON);
        assert_eq!(config.resolve_api_key().as_deref(), Some("secret"));
    }

    #[test]
    fn test_apply_env_rejects_bad_number() {
        let mut config = AppConfig::default();
        let result = config.apply_env(|key| (key == "AURORA_TOP_K").then(|| "four".to_string()));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_with_overrides() {
        let config = AppConfig::default().with_overrides(ConfigOverrides {
            provider: Some("ollama".to_string()),
            model: Some("llama3.2".to_string()),
            top_k: Some(2),
            verbose: true,
            ..ConfigOverrides::default()
        });

        assert_eq!(config.provider, "ollama");
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.retrieval.top_k, 2);
        assert!(config.verbose);
        assert_eq!(config.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_validate_unknown_provider() {
        let config = AppConfig {
            provider: "unknown".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_retrieval_bounds() {
        let mut config = AppConfig::default();
        config.retrieval.min_score = 1.5;
        assert!(config.validate().is_err());

        config.retrieval.min_score = 0.15;
        config.retrieval.top_k = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mock_provider_needs_no_key() {
        let config = AppConfig {
            provider: "mock".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate_for_generation().is_ok());
    }

    #[test]
    fn test_groq_needs_key() {
        let config = AppConfig {
            api_key_env: "AURORA_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate_for_generation().is_err());
    }
}
