//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod doctor;
mod index;
mod list;
mod sets;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use doctor::run_doctor;
pub use index::run_index;
pub use list::run_list;
pub use sets::run_sets;

use crate::cli::{GenerationArgs, ScopeArgs};
use crate::config::{EmptyContextPolicy, Prompts, Settings};
use crate::corpus::ContextScope;
use crate::embedding::OpenAIEmbedder;
use crate::error::Result;
use crate::rag::{AnswerRequest, OpenAIAnswerer};
use crate::session::QuestionOptions;
use crate::workspace::resolve_chapter_dir;
use std::path::PathBuf;
use std::sync::Arc;

/// Resolve the configured chapter directory from the current directory.
pub(crate) fn chapter_dir(settings: &Settings) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    resolve_chapter_dir(&cwd, &settings.general.chapter)
}

/// Context scope from the config, with `--include-solutions` or
/// `--no-include-solutions` taking precedence over `answer.include_solutions`.
pub(crate) fn context_scope(settings: &Settings, scope: &ScopeArgs) -> ContextScope {
    let mut context_scope = settings.answer.scope(scope.sets.clone());
    if scope.include_solutions {
        context_scope.include_solutions = true;
    } else if scope.no_include_solutions {
        context_scope.include_solutions = false;
    }
    context_scope
}

/// Combine configured defaults with command-line overrides.
pub(crate) fn question_options(
    settings: &Settings,
    scope: &ScopeArgs,
    generation: &GenerationArgs,
) -> QuestionOptions {
    let answer = &settings.answer;

    let mut request = AnswerRequest::new("");
    request.prompt_template = generation.template.unwrap_or(answer.prompt_template);
    request.model = generation.model.unwrap_or(answer.model);
    request.temperature = generation.temperature.unwrap_or(answer.temperature);
    request.max_context_len = answer.max_context_len;
    request.max_output_tokens = answer.max_output_tokens;

    let on_empty_context = if generation.abort_on_empty {
        EmptyContextPolicy::Abort
    } else {
        answer.on_empty_context
    };

    QuestionOptions {
        scope: context_scope(settings, scope),
        request,
        on_empty_context,
    }
}

/// Build the OpenAI-backed answerer from settings.
pub(crate) fn build_answerer(settings: &Settings) -> Result<OpenAIAnswerer> {
    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let embedder = Arc::new(OpenAIEmbedder::from_settings(&settings.embedding)?);

    Ok(OpenAIAnswerer::new(embedder)?
        .with_prompts(prompts)
        .with_chronological(settings.answer.chronological))
}
