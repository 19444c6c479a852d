//! Prompt templates for Tutorbot.
//!
//! Prompts can be customized by placing an `answer.toml` file in the custom
//! prompts directory.

use crate::rag::PromptTemplate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub answer: AnswerPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for answering questions about the material.
///
/// Each template receives `{{context}}` and `{{question}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerPrompts {
    pub system: String,
    pub simple: String,
    pub sources: String,
    pub complex_system: String,
    pub complex: String,
}

impl Default for AnswerPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a teaching assistant for a course on machine learning fundamentals. Answer students' questions using the course material you are given."#.to_string(),

            simple: r#"Answer the question based on the context below, and if the question can't be answered based on the context, say "I don't know".

Context:
{{context}}

---

Question: {{question}}
Answer:"#.to_string(),

            sources: r#"Answer the question based on the numbered course sections below. After each claim, cite the section it came from using its number in square brackets, e.g. [2]. If the sections don't contain the answer, say "I don't know".

Sections:
{{context}}

---

Question: {{question}}
Answer:"#.to_string(),

            complex_system: r#"You are an experienced teaching assistant for a course on machine learning fundamentals. Students work through exercise sets and ask you about the material.

Guidelines:
- Ground your answer in the provided course excerpts and name the section you draw on
- Explain concepts step by step, with short code snippets where they help
- If an exercise solution appears in the excerpts, explain the reasoning instead of only restating the code
- If no excerpt is relevant, say so, then answer from general knowledge and mark it as such
- Be concise"#.to_string(),

            complex: r#"Course excerpts:

{{context}}

---

Student question: {{question}}"#.to_string(),
        }
    }
}

impl AnswerPrompts {
    /// The system prompt and user template for a prompt style.
    pub fn for_template(&self, template: PromptTemplate) -> (&str, &str) {
        match template {
            PromptTemplate::Simple => (self.system.as_str(), self.simple.as_str()),
            PromptTemplate::Sources => (self.system.as_str(), self.sources.as_str()),
            PromptTemplate::Complex => (self.complex_system.as_str(), self.complex.as_str()),
        }
    }
}

impl Prompts {
    /// Load prompts from the defaults, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let answer_path = custom_path.join("answer.toml");
            if answer_path.exists() {
                let content = std::fs::read_to_string(&answer_path)?;
                prompts.answer = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
