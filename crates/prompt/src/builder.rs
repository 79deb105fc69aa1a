//! Prompt builder for rendering templates.

use crate::loader::{
    builtin_prompt, list_prompts, resolve_prompt, GROUNDED_PROMPT_ID, SMALLTALK_PROMPT_ID,
};
use crate::types::{BuiltPrompt, PromptDefinition};
use aurora_core::{AppError, AppResult};
use handlebars::Handlebars;
use std::collections::HashMap;
use std::path::Path;

/// Build a prompt from a definition and input variables.
///
/// # Example
/// ```no_run
/// use aurora_prompt::{build_prompt, builtin_prompt};
/// use std::collections::HashMap;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = builtin_prompt("faq.smalltalk")?;
/// let mut vars = HashMap::new();
/// vars.insert("message".to_string(), "hello".to_string());
///
/// let built = build_prompt(&def, vars)?;
/// println!("{}", built.text);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    variables: HashMap<String, String>,
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let rendered = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt::new(rendered, definition.id.clone(), variables))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text prompt: FAQ answers must reach the model unescaped
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

/// The two prompts the answering pipeline renders.
#[derive(Debug, Clone)]
pub struct FaqPrompts {
    pub grounded: PromptDefinition,
    pub smalltalk: PromptDefinition,
}

impl FaqPrompts {
    /// Built-in prompts only.
    pub fn builtin() -> AppResult<Self> {
        Ok(Self {
            grounded: builtin_prompt(GROUNDED_PROMPT_ID)?,
            smalltalk: builtin_prompt(SMALLTALK_PROMPT_ID)?,
        })
    }

    /// Built-in prompts, each replaced by `<prompts_dir>/<id>.yml` if present.
    pub fn load(prompts_dir: &Path) -> AppResult<Self> {
        for id in list_prompts(prompts_dir)? {
            if id != GROUNDED_PROMPT_ID && id != SMALLTALK_PROMPT_ID {
                tracing::warn!("Ignoring unknown prompt override {:?} in {:?}", id, prompts_dir);
            }
        }

        Ok(Self {
            grounded: resolve_prompt(prompts_dir, GROUNDED_PROMPT_ID)?,
            smalltalk: resolve_prompt(prompts_dir, SMALLTALK_PROMPT_ID)?,
        })
    }

    /// Render the grounding prompt for `question` over formatted `context`.
    pub fn render_grounded(&self, question: &str, context: &str) -> AppResult<BuiltPrompt> {
        let variables = HashMap::from([
            ("question".to_string(), question.to_string()),
            ("context".to_string(), context.to_string()),
        ]);
        build_prompt(&self.grounded, variables)
    }

    /// Render the smalltalk prompt for the user's `message`.
    pub fn render_smalltalk(&self, message: &str) -> AppResult<BuiltPrompt> {
        let variables = HashMap::from([("message".to_string(), message.to_string())]);
        build_prompt(&self.smalltalk, variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(template: &str) -> PromptDefinition {
        PromptDefinition {
            id: "test.prompt".to_string(),
            title: "Test".to_string(),
            api_version: "1.0".to_string(),
            created_by: "test".to_string(),
            template: template.to_string(),
        }
    }

    #[test]
    fn test_render_simple_template() {
        let vars = HashMap::from([("question".to_string(), "Hello, world!".to_string())]);
        let result = render_template("Question: {{question}}", &vars).unwrap();
        assert_eq!(result, "Question: Hello, world!");
    }

    #[test]
    fn test_render_does_not_escape() {
        let vars = HashMap::from([("context".to_string(), "Taxes & fees <carrier>".to_string())]);
        let result = render_template("{{context}}", &vars).unwrap();
        assert_eq!(result, "Taxes & fees <carrier>");
    }

    #[test]
    fn test_render_template_missing_variable() {
        let vars = HashMap::new();
        // Handlebars renders missing variables as empty string
        assert_eq!(render_template("Q: {{missing}}", &vars).unwrap(), "Q: ");
    }

    #[test]
    fn test_build_prompt_metadata() {
        let def = definition("Q: {{question}}");
        let vars = HashMap::from([("question".to_string(), "bags?".to_string())]);

        let built = build_prompt(&def, vars).unwrap();
        assert_eq!(built.text, "Q: bags?");
        assert_eq!(built.metadata.source_prompt_id, "test.prompt");
        assert_eq!(
            built.metadata.resolved_variables.get("question"),
            Some(&"bags?".to_string())
        );
    }

    #[test]
    fn test_render_grounded_builtin() {
        let prompts = FaqPrompts::builtin().unwrap();
        let built = prompts
            .render_grounded("Can I get a refund?", "[FAQ:1] Q: Refund?\nA: Yes.")
            .unwrap();

        assert!(built.text.starts_with("You are a helpful airline customer-service assistant"));
        assert!(built.text.contains("Question:\nCan I get a refund?\n"));
        assert!(built.text.contains("Context:\n[FAQ:1] Q: Refund?\nA: Yes.\n"));
        assert!(built.text.ends_with("Write a factual, grounded answer:\n"));
    }

    #[test]
    fn test_render_smalltalk_builtin() {
        let prompts = FaqPrompts::builtin().unwrap();
        let built = prompts.render_smalltalk("thanks!").unwrap();

        assert!(built.text.contains("User: thanks!\nAssistant:"));
        assert!(built.text.ends_with("Assistant:"));
    }
}
