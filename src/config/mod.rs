//! Configuration module for Tutorbot.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{AnswerPrompts, Prompts};
pub use settings::{
    AnswerSettings, EmbeddingSettings, EmptyContextPolicy, GeneralSettings, PromptSettings,
    Settings,
};
