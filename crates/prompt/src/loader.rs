//! Prompt loader for YAML prompt definitions.
//!
//! Built-in definitions ship inside the binary; a file
//! `<prompts_dir>/<id>.yml` replaces the built-in with the same id.

use crate::types::PromptDefinition;
use aurora_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::path::Path;

/// Identifier of the grounded-answer prompt.
pub const GROUNDED_PROMPT_ID: &str = "faq.grounded";

/// Identifier of the smalltalk prompt.
pub const SMALLTALK_PROMPT_ID: &str = "faq.smalltalk";

const BUILTIN_PROMPTS: [(&str, &str); 2] = [
    (GROUNDED_PROMPT_ID, include_str!("../prompts/faq.grounded.yml")),
    (SMALLTALK_PROMPT_ID, include_str!("../prompts/faq.smalltalk.yml")),
];

/// Load a prompt definition by ID from `prompts_dir`.
///
/// # Example
/// ```no_run
/// use aurora_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new(".aurora/prompts"), "faq.grounded")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(prompts_dir: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir.join(format!("{}.yml", prompt_id));

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition = parse_prompt(&contents)
        .map_err(|e| AppError::Prompt(format!("{:?}: {}", prompt_file, e)))?;

    if definition.id != prompt_id {
        return Err(AppError::Prompt(format!(
            "Prompt file {:?} declares id '{}', expected '{}'",
            prompt_file, definition.id, prompt_id
        )));
    }

    tracing::info!("Loaded prompt override: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Return the built-in definition for `prompt_id`.
pub fn builtin_prompt(prompt_id: &str) -> AppResult<PromptDefinition> {
    let (_, source) = BUILTIN_PROMPTS
        .iter()
        .find(|(id, _)| *id == prompt_id)
        .ok_or_else(|| AppError::Prompt(format!("No built-in prompt '{}'", prompt_id)))?;

    parse_prompt(source)
}

/// Load `prompt_id` from `prompts_dir` if overridden there, else the built-in.
pub fn resolve_prompt(prompts_dir: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    if prompts_dir.join(format!("{}.yml", prompt_id)).exists() {
        load_prompt(prompts_dir, prompt_id)
    } else {
        builtin_prompt(prompt_id)
    }
}

/// List prompt IDs overridden in `prompts_dir`.
pub fn list_prompts(prompts_dir: &Path) -> AppResult<Vec<String>> {
    if !prompts_dir.exists() {
        return Ok(Vec::new());
    }

    let mut prompt_ids = Vec::new();

    for entry in walkdir::WalkDir::new(prompts_dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                prompt_ids.push(stem.to_string());
            }
        }
    }

    prompt_ids.sort();
    Ok(prompt_ids)
}

fn parse_prompt(contents: &str) -> AppResult<PromptDefinition> {
    let definition: PromptDefinition = serde_yaml::from_str(contents)
        .map_err(|e| AppError::Prompt(format!("Failed to parse prompt YAML: {}", e)))?;

    validate_prompt(&definition)?;
    Ok(definition)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    Handlebars::new()
        .register_template_string(&def.id, &def.template)
        .map_err(|e| AppError::Prompt(format!("Template for '{}' does not compile: {}", def.id, e)))?;

    Ok(())
}
