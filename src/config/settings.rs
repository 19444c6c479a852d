//! Configuration settings for Tutorbot.

use crate::corpus::{ContextScope, DEFAULT_SOLUTION_MARKER};
use crate::rag::{Model, PromptTemplate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub answer: AnswerSettings,
    pub embedding: EmbeddingSettings,
    pub prompts: PromptSettings,
}

/// Where the course material lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Name of the chapter directory the chatbot answers questions about.
    pub chapter: String,
    /// Embedding file, relative to the chapter directory.
    pub embeddings_path: String,
    /// Directory of course pages, relative to the chapter directory.
    pub pages_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            chapter: "chapter0_fundamentals".to_string(),
            embeddings_path: "instructions/my_embeddings.json".to_string(),
            pages_dir: "instructions/pages".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

/// What to do when the filters leave no context to answer from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmptyContextPolicy {
    /// Warn and still ask the model.
    #[default]
    Continue,
    /// Warn and skip the model call.
    Abort,
}

impl std::str::FromStr for EmptyContextPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "continue" => Ok(EmptyContextPolicy::Continue),
            "abort" => Ok(EmptyContextPolicy::Abort),
            _ => Err(format!("Unknown empty context policy: {}", s)),
        }
    }
}

/// Answer generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerSettings {
    /// Completion model.
    pub model: Model,
    /// Sampling temperature, between 0.0 and 2.0.
    pub temperature: f32,
    /// Prompt template (simple, sources, complex).
    pub prompt_template: PromptTemplate,
    /// Token budget for retrieved context.
    pub max_context_len: usize,
    /// Maximum tokens in the generated answer.
    pub max_output_tokens: u32,
    /// Include solution sections in the context.
    pub include_solutions: bool,
    /// Substring that marks solution sections in titles.
    pub solution_marker: String,
    /// Restore document order among selected sections.
    pub chronological: bool,
    pub on_empty_context: EmptyContextPolicy,
}

impl Default for AnswerSettings {
    fn default() -> Self {
        Self {
            model: Model::default(),
            temperature: 0.5,
            prompt_template: PromptTemplate::default(),
            max_context_len: 1500,
            max_output_tokens: 1500,
            include_solutions: false,
            solution_marker: DEFAULT_SOLUTION_MARKER.to_string(),
            chronological: true,
            on_empty_context: EmptyContextPolicy::Continue,
        }
    }
}

impl AnswerSettings {
    /// Build a context scope from these settings and the chosen exercise sets.
    pub fn scope(&self, exercise_sets: Vec<String>) -> ContextScope {
        ContextScope {
            include_solutions: self.include_solutions,
            exercise_sets,
            solution_marker: self.solution_marker.clone(),
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model. Must match the model the embedding file was built with.
    pub model: String,
    /// Requested dimensions, for models that support shortening.
    pub dimensions: Option<u32>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-ada-002".to_string(),
            dimensions: None,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the completion API would refuse.
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(0.0..=2.0).contains(&self.answer.temperature) {
            return Err(crate::error::TutorError::Config(format!(
                "answer.temperature must be between 0.0 and 2.0, got {}",
                self.answer.temperature
            )));
        }
        if self.answer.solution_marker.is_empty() {
            return Err(crate::error::TutorError::Config(
                "answer.solution_marker must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TutorError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tutorbot")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Embedding file path inside a resolved chapter directory.
    pub fn embeddings_path(&self, chapter_dir: &Path) -> PathBuf {
        chapter_dir.join(Self::expand_path(&self.general.embeddings_path))
    }

    /// Pages directory inside a resolved chapter directory.
    pub fn pages_dir(&self, chapter_dir: &Path) -> PathBuf {
        chapter_dir.join(Self::expand_path(&self.general.pages_dir))
    }
}
